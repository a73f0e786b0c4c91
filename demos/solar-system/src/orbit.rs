/// Parametric orbits, pure math, no engine dependencies.
///
/// f64 throughout: the angle grows without bound with session time, so it is
/// wrapped with `rem_euclid(TAU)` before any trig. Convert to f32 only when
/// writing entity positions in game.rs.

use std::f64::consts::TAU;
use std::fmt;

use glam::DVec3;

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Vertical amplitude of a comet's bob above the orbital plane.
pub const COMET_HEIGHT: f64 = 5.0;

/// Rejected orbital parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum OrbitError {
    /// Orbit radius must be finite and strictly positive.
    InvalidRadius { name: String, radius: f64 },
    /// Angular speeds must be finite.
    InvalidSpeed { name: String, speed: f64 },
    /// Eccentricity must lie in [0, 1).
    InvalidEccentricity { name: String, eccentricity: f64 },
    EmptyName,
}

impl fmt::Display for OrbitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrbitError::InvalidRadius { name, radius } => {
                write!(f, "{name}: orbit radius must be positive and finite, got {radius}")
            }
            OrbitError::InvalidSpeed { name, speed } => {
                write!(f, "{name}: orbit speed must be finite, got {speed}")
            }
            OrbitError::InvalidEccentricity { name, eccentricity } => {
                write!(f, "{name}: eccentricity must be in [0, 1), got {eccentricity}")
            }
            OrbitError::EmptyName => write!(f, "body name must not be empty"),
        }
    }
}

impl std::error::Error for OrbitError {}

/// A body on a circular orbit around the origin.
/// Radius and speed are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalBody {
    name: String,
    orbit_radius: f64,
    /// Radians per second; the sign picks the direction.
    orbit_speed: f64,
    /// Self-rotation in radians per frame.
    pub rotation_speed: f64,
    pub has_rings: bool,
    /// Axial tilt in degrees.
    pub tilt: f64,
    pub has_storms: bool,
}

impl OrbitalBody {
    pub fn new(name: impl Into<String>, orbit_radius: f64, orbit_speed: f64) -> Result<Self, OrbitError> {
        let name = name.into();
        if name.is_empty() {
            return Err(OrbitError::EmptyName);
        }
        if !orbit_radius.is_finite() || orbit_radius <= 0.0 {
            return Err(OrbitError::InvalidRadius { name, radius: orbit_radius });
        }
        if !orbit_speed.is_finite() {
            return Err(OrbitError::InvalidSpeed { name, speed: orbit_speed });
        }
        Ok(Self {
            name,
            orbit_radius,
            orbit_speed,
            rotation_speed: 0.0,
            has_rings: false,
            tilt: 0.0,
            has_storms: false,
        })
    }

    pub fn with_rotation_speed(mut self, speed: f64) -> Self {
        self.rotation_speed = if speed.is_finite() { speed } else { 0.0 };
        self
    }

    pub fn with_rings(mut self, has_rings: bool) -> Self {
        self.has_rings = has_rings;
        self
    }

    pub fn with_tilt(mut self, degrees: f64) -> Self {
        self.tilt = if degrees.is_finite() { degrees } else { 0.0 };
        self
    }

    pub fn with_storms(mut self, has_storms: bool) -> Self {
        self.has_storms = has_storms;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn orbit_radius(&self) -> f64 {
        self.orbit_radius
    }

    pub fn orbit_speed(&self) -> f64 {
        self.orbit_speed
    }

    pub fn tilt_radians(&self) -> f64 {
        self.tilt * DEG_TO_RAD
    }
}

/// Orbital angle at `time`, wrapped into [0, TAU).
pub fn orbit_angle(speed: f64, time: f64) -> f64 {
    (time * speed).rem_euclid(TAU)
}

/// Position on the circular orbit: `(cos θ · r, 0, sin θ · r)` with `θ = t · speed`.
/// Pure: the same body and time always give the same point.
pub fn compute_position(body: &OrbitalBody, time: f64) -> DVec3 {
    let theta = orbit_angle(body.orbit_speed, time);
    DVec3::new(
        theta.cos() * body.orbit_radius,
        0.0,
        theta.sin() * body.orbit_radius,
    )
}

/// An inclined elliptical orbit centred on the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct CometOrbit {
    name: String,
    /// Semi-major axis.
    semi_major: f64,
    speed: f64,
    /// Phase offset of the vertical bob, added to the angle as given.
    inclination: f64,
    eccentricity: f64,
}

impl CometOrbit {
    pub fn new(
        name: impl Into<String>,
        orbit_radius: f64,
        speed: f64,
        inclination: f64,
        eccentricity: f64,
    ) -> Result<Self, OrbitError> {
        let name = name.into();
        if name.is_empty() {
            return Err(OrbitError::EmptyName);
        }
        if !orbit_radius.is_finite() || orbit_radius <= 0.0 {
            return Err(OrbitError::InvalidRadius { name, radius: orbit_radius });
        }
        if !speed.is_finite() {
            return Err(OrbitError::InvalidSpeed { name, speed });
        }
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(OrbitError::InvalidEccentricity { name, eccentricity });
        }
        Ok(Self {
            name,
            semi_major: orbit_radius,
            speed,
            inclination: if inclination.is_finite() { inclination } else { 0.0 },
            eccentricity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn semi_major(&self) -> f64 {
        self.semi_major
    }

    pub fn semi_minor(&self) -> f64 {
        self.semi_major * (1.0 - self.eccentricity * self.eccentricity).sqrt()
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// `x = a cos τ`, `z = b sin τ`, `y = sin(τ + inclination) · 5` with `τ = t · speed`.
    pub fn position_at(&self, time: f64) -> DVec3 {
        let tau = orbit_angle(self.speed, time);
        DVec3::new(
            self.semi_major * tau.cos(),
            (tau + self.inclination).sin() * COMET_HEIGHT,
            self.semi_minor() * tau.sin(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn earth() -> OrbitalBody {
        OrbitalBody::new("Earth", 10.0, 0.01).unwrap()
    }

    #[test]
    fn earth_at_time_zero() {
        let p = compute_position(&earth(), 0.0);
        assert_eq!(p, DVec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn earth_quarter_orbit() {
        // θ = (π / 0.02) · 0.01 = π/2
        let p = compute_position(&earth(), PI / 0.02);
        assert!(p.x.abs() < 1e-9, "x = {}", p.x);
        assert_eq!(p.y, 0.0);
        assert!((p.z - 10.0).abs() < 1e-9, "z = {}", p.z);
    }

    #[test]
    fn position_is_deterministic() {
        let body = OrbitalBody::new("Mars", 15.0, 0.008).unwrap();
        for t in [0.0, 1.5, 1234.5678, 9.87e6] {
            assert_eq!(compute_position(&body, t), compute_position(&body, t));
        }
    }

    #[test]
    fn position_stays_on_circle() {
        let body = OrbitalBody::new("Jupiter", 25.0, -0.005).unwrap();
        for i in 0..500 {
            let t = i as f64 * 37.3;
            let p = compute_position(&body, t);
            assert_eq!(p.y, 0.0);
            assert!((p.length() - 25.0).abs() < 1e-9);
        }
    }

    #[test]
    fn long_sessions_match_exact_formula() {
        let body = OrbitalBody::new("Mercury", 5.0, 0.02).unwrap();
        let t = 1.0e7;
        let p = compute_position(&body, t);
        let exact = DVec3::new((t * 0.02).cos() * 5.0, 0.0, (t * 0.02).sin() * 5.0);
        // Tolerance scaled by the magnitude of the unwrapped angle
        let eps = 1e-12 * (t * 0.02) * 5.0;
        assert!((p - exact).length() < eps.max(1e-9), "drift = {}", (p - exact).length());
    }

    #[test]
    fn rejects_degenerate_bodies() {
        assert!(matches!(
            OrbitalBody::new("X", 0.0, 0.1),
            Err(OrbitError::InvalidRadius { .. })
        ));
        assert!(matches!(
            OrbitalBody::new("X", -3.0, 0.1),
            Err(OrbitError::InvalidRadius { .. })
        ));
        assert!(matches!(
            OrbitalBody::new("X", 3.0, f64::NAN),
            Err(OrbitError::InvalidSpeed { .. })
        ));
        assert_eq!(OrbitalBody::new("", 3.0, 0.1), Err(OrbitError::EmptyName));
    }

    #[test]
    fn comet_lies_on_its_ellipse() {
        let comet = CometOrbit::new("Halley", 80.0, 0.005, 15.0, 0.8).unwrap();
        let a = comet.semi_major();
        let b = comet.semi_minor();
        assert!((b - 80.0 * (1.0f64 - 0.64).sqrt()).abs() < 1e-12);
        for i in 0..200 {
            let p = comet.position_at(i as f64 * 11.0);
            let on = (p.x / a).powi(2) + (p.z / b).powi(2);
            assert!((on - 1.0).abs() < 1e-9, "ellipse residual {}", on - 1.0);
            assert!(p.y.abs() <= COMET_HEIGHT + 1e-12);
        }
    }

    #[test]
    fn comet_rejects_open_orbits() {
        assert!(matches!(
            CometOrbit::new("C", 80.0, 0.005, 15.0, 1.0),
            Err(OrbitError::InvalidEccentricity { .. })
        ));
        assert!(matches!(
            CometOrbit::new("C", 80.0, 0.005, 15.0, -0.1),
            Err(OrbitError::InvalidEccentricity { .. })
        ));
        assert!(CometOrbit::new("C", 80.0, 0.005, 15.0, 0.0).is_ok());
    }

    #[test]
    fn error_messages_name_the_body() {
        let err = OrbitalBody::new("Vulcan", -1.0, 0.1).unwrap_err();
        assert!(err.to_string().contains("Vulcan"));
    }
}
