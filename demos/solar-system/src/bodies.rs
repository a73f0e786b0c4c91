/// Built-in solar system: one sun and eight planets.
///
/// Orbit radii and speeds are scene units, not astronomy; facts are the
/// real-world figures shown in the info panel.

use std::f64::consts::TAU;

use serde::Serialize;

use crate::orbit::{CometOrbit, OrbitalBody};

pub const ASTRONOMICAL_UNIT_KM: f64 = 149_597_870.7;
pub const SOLAR_RADIUS_KM: f64 = 696_340.0;

/// Tone for bodies without an assigned one (Hz).
pub const DEFAULT_TONE: f32 = 440.0;

// ── Sun ──────────────────────────────────────────────────────────────

pub const SUN_NAME: &str = "Sun";
pub const SUN_RADIUS: f32 = 2.0;
pub const SUN_TEMPERATURE_K: f64 = 5778.0;
pub const SUN_COLOR: u32 = 0xFDB813;
pub const SUN_TONE: f32 = 220.0;

// ── Planets ──────────────────────────────────────────────────────────

/// Static description of one built-in planet.
pub struct PlanetDef {
    pub name: &'static str,
    pub radius: f32,
    pub orbit_radius: f64,
    pub orbit_speed: f64,
    pub rotation_speed: f64,
    pub color: u32,
    pub has_rings: bool,
    pub tilt: f64,
    pub has_storms: bool,
    pub moons: &'static [&'static str],
    /// Selection tone in Hz.
    pub tone: f32,
    pub facts: &'static [(&'static str, &'static str)],
}

pub const PLANETS: [PlanetDef; 8] = [
    PlanetDef {
        name: "Mercury", radius: 0.2, orbit_radius: 5.0, orbit_speed: 0.02, rotation_speed: 0.01,
        color: 0x8C7853, has_rings: false, tilt: 0.0, has_storms: false, moons: &[], tone: 330.0,
        facts: &[
            ("diameter", "4,879 km"),
            ("mass", "3.3011 × 10²³ kg"),
            ("distance", "57.9 million km from Sun"),
            ("day", "58.6 Earth days"),
            ("year", "88 Earth days"),
        ],
    },
    PlanetDef {
        name: "Venus", radius: 0.3, orbit_radius: 7.0, orbit_speed: 0.015, rotation_speed: 0.008,
        color: 0xFFC649, has_rings: false, tilt: 0.0, has_storms: false, moons: &[], tone: 370.0,
        facts: &[
            ("diameter", "12,104 km"),
            ("mass", "4.8675 × 10²⁴ kg"),
            ("distance", "108.2 million km from Sun"),
            ("day", "243 Earth days"),
            ("year", "225 Earth days"),
        ],
    },
    PlanetDef {
        name: "Earth", radius: 0.4, orbit_radius: 10.0, orbit_speed: 0.01, rotation_speed: 0.01,
        color: 0x6B93D6, has_rings: false, tilt: 0.0, has_storms: false, moons: &[], tone: 440.0,
        facts: &[
            ("diameter", "12,756 km"),
            ("mass", "5.972 × 10²⁴ kg"),
            ("distance", "149.6 million km from Sun"),
            ("day", "24 hours"),
            ("year", "365.25 days"),
        ],
    },
    PlanetDef {
        name: "Mars", radius: 0.25, orbit_radius: 15.0, orbit_speed: 0.008, rotation_speed: 0.01,
        color: 0xCD5C5C, has_rings: false, tilt: 0.0, has_storms: false, moons: &[], tone: 494.0,
        facts: &[
            ("diameter", "6,792 km"),
            ("mass", "6.4171 × 10²³ kg"),
            ("distance", "227.9 million km from Sun"),
            ("day", "24.6 hours"),
            ("year", "687 Earth days"),
        ],
    },
    PlanetDef {
        name: "Jupiter", radius: 1.2, orbit_radius: 25.0, orbit_speed: 0.005, rotation_speed: 0.02,
        color: 0xD8CA9D, has_rings: false, tilt: 0.0, has_storms: false,
        moons: &["Io", "Europa", "Ganymede", "Callisto"], tone: 262.0,
        facts: &[
            ("diameter", "142,984 km"),
            ("mass", "1.898 × 10²⁷ kg"),
            ("distance", "778.5 million km from Sun"),
            ("day", "9.9 hours"),
            ("year", "11.9 Earth years"),
            ("moons", "79 known moons"),
            ("features", "Great Red Spot storm"),
        ],
    },
    PlanetDef {
        name: "Saturn", radius: 1.0, orbit_radius: 35.0, orbit_speed: 0.003, rotation_speed: 0.018,
        color: 0xFAD5A5, has_rings: true, tilt: 0.0, has_storms: false,
        moons: &["Titan", "Enceladus"], tone: 294.0,
        facts: &[
            ("diameter", "120,536 km"),
            ("mass", "5.683 × 10²⁶ kg"),
            ("distance", "1.432 billion km from Sun"),
            ("day", "10.7 hours"),
            ("year", "29.5 Earth years"),
            ("moons", "82 known moons"),
            ("features", "Spectacular ring system"),
        ],
    },
    PlanetDef {
        name: "Uranus", radius: 0.6, orbit_radius: 45.0, orbit_speed: 0.002, rotation_speed: 0.015,
        color: 0x4FD0E7, has_rings: true, tilt: 98.0, has_storms: false, moons: &[], tone: 523.0,
        facts: &[
            ("diameter", "51,118 km"),
            ("mass", "8.681 × 10²⁵ kg"),
            ("distance", "2.867 billion km from Sun"),
            ("day", "17.2 hours"),
            ("year", "84 Earth years"),
            ("features", "Tilted 98° on its side"),
        ],
    },
    PlanetDef {
        name: "Neptune", radius: 0.58, orbit_radius: 55.0, orbit_speed: 0.001, rotation_speed: 0.016,
        color: 0x4B70DD, has_rings: false, tilt: 0.0, has_storms: true, moons: &[], tone: 587.0,
        facts: &[
            ("diameter", "49,528 km"),
            ("mass", "1.024 × 10²⁶ kg"),
            ("distance", "4.515 billion km from Sun"),
            ("day", "16.1 hours"),
            ("year", "165 Earth years"),
            ("features", "Fastest winds in solar system"),
        ],
    },
];

/// Index into the planet list, or the sun.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRef {
    Sun,
    Planet(usize),
}

/// A planet in the live scene: orbit plus visuals.
#[derive(Debug, Clone)]
pub struct Planet {
    pub orbit: OrbitalBody,
    pub radius: f32,
    pub color: u32,
    pub moons: Vec<String>,
}

impl Planet {
    pub fn name(&self) -> &str {
        self.orbit.name()
    }
}

/// The sun and planets currently in the scene.
#[derive(Debug, Clone)]
pub struct Bodies {
    pub sun_radius: f32,
    pub sun_temperature: f64,
    pub planets: Vec<Planet>,
}

impl Bodies {
    /// The built-in eight-planet system, without going through a scene config.
    #[cfg(test)]
    pub fn builtin() -> Result<Self, crate::orbit::OrbitError> {
        let planets = PLANETS
            .iter()
            .map(|def| {
                let orbit = OrbitalBody::new(def.name, def.orbit_radius, def.orbit_speed)?
                    .with_rotation_speed(def.rotation_speed)
                    .with_rings(def.has_rings)
                    .with_tilt(def.tilt)
                    .with_storms(def.has_storms);
                Ok(Planet {
                    orbit,
                    radius: def.radius,
                    color: def.color,
                    moons: def.moons.iter().map(|m| m.to_string()).collect(),
                })
            })
            .collect::<Result<Vec<_>, crate::orbit::OrbitError>>()?;
        Ok(Self {
            sun_radius: SUN_RADIUS,
            sun_temperature: SUN_TEMPERATURE_K,
            planets,
        })
    }

    /// Look a body up by display name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<BodyRef> {
        if name.eq_ignore_ascii_case(SUN_NAME) {
            return Some(BodyRef::Sun);
        }
        self.planets
            .iter()
            .position(|p| p.name().eq_ignore_ascii_case(name))
            .map(BodyRef::Planet)
    }

    pub fn name_of(&self, body: BodyRef) -> Option<&str> {
        match body {
            BodyRef::Sun => Some(SUN_NAME),
            BodyRef::Planet(i) => self.planets.get(i).map(|p| p.name()),
        }
    }

    /// Fact sheet for the info panel.
    pub fn info(&self, body: BodyRef) -> Option<BodyInfo> {
        match body {
            BodyRef::Sun => Some(self.sun_info()),
            BodyRef::Planet(i) => self.planets.get(i).map(planet_info),
        }
    }

    fn sun_info(&self) -> BodyInfo {
        let radius_km = self.sun_radius as f64 * SOLAR_RADIUS_KM;
        BodyInfo {
            name: SUN_NAME.to_string(),
            kind: BodyKind::Star,
            facts: vec![
                Fact::new("radius", format_distance(radius_km)),
                Fact::new("temperature", format!("{} K", self.sun_temperature)),
                Fact::new("mass", "1.989 × 10³⁰ kg"),
                Fact::new("composition", "Hydrogen (73%), Helium (25%), Other (2%)"),
                Fact::new("age", "4.6 billion years"),
            ],
            moons: Vec::new(),
        }
    }
}

fn planet_info(planet: &Planet) -> BodyInfo {
    let facts = match PLANETS.iter().find(|d| d.name == planet.name()) {
        Some(def) => def.facts.iter().map(|(k, v)| Fact::new(k, *v)).collect(),
        // Bodies from a scene config only have their scene parameters
        None => vec![
            Fact::new("orbit radius", format!("{} units", format_number(planet.orbit.orbit_radius()))),
            Fact::new("orbit speed", format!("{} rad/s", planet.orbit.orbit_speed())),
        ],
    };
    BodyInfo {
        name: planet.name().to_string(),
        kind: BodyKind::Planet,
        facts,
        moons: planet.moons.clone(),
    }
}

/// Fact sheet for the comet, derived from its orbit.
pub fn comet_info(orbit: &CometOrbit) -> BodyInfo {
    let speed = orbit.speed().abs();
    let period = if speed > 0.0 {
        format!("{} s", format_number((TAU / speed).round()))
    } else {
        "stationary".to_string()
    };
    BodyInfo {
        name: orbit.name().to_string(),
        kind: BodyKind::Comet,
        facts: vec![
            Fact::new("semi-major axis", format!("{:.1} units", orbit.semi_major())),
            Fact::new("semi-minor axis", format!("{:.1} units", orbit.semi_minor())),
            Fact::new("eccentricity", format!("{:.2}", orbit.eccentricity())),
            Fact::new("orbital period", period),
        ],
        moons: Vec::new(),
    }
}

/// Selection tone for a body name; 440 Hz when none is assigned.
pub fn selection_tone(name: &str) -> f32 {
    if name == SUN_NAME {
        return SUN_TONE;
    }
    PLANETS
        .iter()
        .find(|d| d.name == name)
        .map(|d| d.tone)
        .unwrap_or(DEFAULT_TONE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Star,
    Planet,
    Comet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fact {
    pub label: String,
    pub value: String,
}

impl Fact {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// Info-panel payload, serialized to JSON for the host HUD.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyInfo {
    pub name: String,
    pub kind: BodyKind,
    pub facts: Vec<Fact>,
    pub moons: Vec<String>,
}

// ── Formatting ───────────────────────────────────────────────────────

/// Compact count: `1.5K`, `2.0M`, `3.1B`.
pub fn format_number(n: f64) -> String {
    if n >= 1e9 {
        format!("{:.1}B", n / 1e9)
    } else if n >= 1e6 {
        format!("{:.1}M", n / 1e6)
    } else if n >= 1e3 {
        format!("{:.1}K", n / 1e3)
    } else {
        format!("{}", n)
    }
}

/// Human distance from kilometres, switching to AU at one astronomical unit.
pub fn format_distance(km: f64) -> String {
    if km >= ASTRONOMICAL_UNIT_KM {
        format!("{:.2} AU", km / ASTRONOMICAL_UNIT_KM)
    } else if km >= 1e6 {
        format!("{:.1} million km", km / 1e6)
    } else if km >= 1e3 {
        format!("{:.1} thousand km", km / 1e3)
    } else {
        format!("{:.0} km", km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_eight_planets_in_order() {
        let bodies = Bodies::builtin().unwrap();
        let names: Vec<&str> = bodies.planets.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            ["Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune"]
        );
        let uranus = &bodies.planets[6];
        assert!(uranus.orbit.has_rings);
        assert_eq!(uranus.orbit.tilt, 98.0);
        assert!(bodies.planets[7].orbit.has_storms);
    }

    #[test]
    fn find_is_case_insensitive_and_misses_cleanly() {
        let bodies = Bodies::builtin().unwrap();
        assert_eq!(bodies.find("earth"), Some(BodyRef::Planet(2)));
        assert_eq!(bodies.find("Sun"), Some(BodyRef::Sun));
        assert_eq!(bodies.find("Pluto"), None);
    }

    #[test]
    fn tones_follow_the_table() {
        assert_eq!(selection_tone("Sun"), 220.0);
        assert_eq!(selection_tone("Mars"), 494.0);
        assert_eq!(selection_tone("Neptune"), 587.0);
        assert_eq!(selection_tone("Vulcan"), DEFAULT_TONE);
    }

    #[test]
    fn sun_info_serializes_for_hud() {
        let bodies = Bodies::builtin().unwrap();
        let info = bodies.info(BodyRef::Sun).unwrap();
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"kind\":\"star\""));
        assert!(json.contains("5778 K"));
        // 2 × 696,340 km
        assert_eq!(info.facts[0].value, "1.4 million km");
    }

    #[test]
    fn jupiter_info_lists_moons() {
        let bodies = Bodies::builtin().unwrap();
        let info = bodies.info(BodyRef::Planet(4)).unwrap();
        assert_eq!(info.moons, ["Io", "Europa", "Ganymede", "Callisto"]);
        assert!(info.facts.iter().any(|f| f.value == "Great Red Spot storm"));
        assert!(bodies.info(BodyRef::Planet(99)).is_none());
    }

    #[test]
    fn comet_info_describes_the_ellipse() {
        let orbit = CometOrbit::new("Halley", 80.0, 0.005, 15.0, 0.8).unwrap();
        let info = comet_info(&orbit);
        assert_eq!(info.name, "Halley");
        assert_eq!(info.kind, BodyKind::Comet);
        let values: Vec<&str> = info.facts.iter().map(|f| f.value.as_str()).collect();
        // b = 80 · sqrt(1 - 0.64); period = 2π / 0.005
        assert_eq!(values, ["80.0 units", "48.0 units", "0.80", "1.3K s"]);

        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"kind\":\"comet\""));

        let parked = CometOrbit::new("Parked", 10.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(comet_info(&parked).facts[3].value, "stationary");
    }

    #[test]
    fn config_planets_fall_back_to_scene_facts() {
        let orbit = OrbitalBody::new("Vulcan", 3.0, 0.05).unwrap();
        let vulcan = Planet { orbit, radius: 0.3, color: 0xAAAAAA, moons: Vec::new() };
        let info = planet_info(&vulcan);
        assert_eq!(info.facts[0].value, "3 units");
        assert_eq!(info.facts[1].value, "0.05 rad/s");
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(950.0), "950");
        assert_eq!(format_number(1500.0), "1.5K");
        assert_eq!(format_number(2_000_000.0), "2.0M");
        assert_eq!(format_number(3.14e9), "3.1B");
    }

    #[test]
    fn distance_formatting() {
        assert_eq!(format_distance(500.0), "500 km");
        assert_eq!(format_distance(6_371.0), "6.4 thousand km");
        assert_eq!(format_distance(57.9e6), "57.9 million km");
        assert_eq!(format_distance(ASTRONOMICAL_UNIT_KM * 5.2), "5.20 AU");
    }
}
