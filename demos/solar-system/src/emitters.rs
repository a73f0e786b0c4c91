/// Particle emitters: nebula, solar wind and the wormhole tunnel.
///
/// Each emitter owns a fixed-capacity [`ParticlePool`] sized once at
/// construction. Emitters are built lazily the first time they are enabled
/// and kept afterwards; tier changes only toggle their visibility.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec3};
use stellar_engine::{ParticlePool, PointBuffer, PointVertex, QualityProfile, Rng};

// ── Point batch kinds (read by the host) ─────────────────────────────

pub const BATCH_NEBULA: u32 = 1;
pub const BATCH_SOLAR_WIND: u32 = 2;
pub const BATCH_WORMHOLE: u32 = 3;
pub const BATCH_COMET_TRAIL: u32 = 4;
pub const BATCH_STARS: u32 = 5;
pub const BATCH_ASTEROIDS: u32 = 6;

// ── Nebula ───────────────────────────────────────────────────────────

/// Slowly rotating, pulsing cloud far behind the system.
pub struct Nebula {
    pool: ParticlePool,
}

impl Nebula {
    pub const COUNT: usize = 200;
    pub const ORIGIN: Vec3 = Vec3::new(0.0, 0.0, -200.0);
    /// Rotation about Y per second of frame delta.
    const SPIN: f32 = 0.1;

    pub fn new(rng: &mut Rng) -> Self {
        let pool = ParticlePool::new(Self::COUNT, |_| {
            let radius = 50.0 + rng.next_f32() * 100.0;
            let theta = rng.angle();
            let phi = rng.next_f32() * PI;
            let pos = Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            );
            let color = [
                0.5 + rng.next_f32() * 0.5,
                0.2 + rng.next_f32() * 0.3,
                0.8 + rng.next_f32() * 0.2,
            ];
            let size = 2.0 + rng.next_f32() * 8.0;
            (PointVertex::new(pos, size, color, 0.8), Vec3::ZERO)
        });
        Self { pool }
    }

    /// One gated step: rotate about Y and re-pulse colors from the base.
    pub fn tick(&mut self, delta: f32, elapsed: f64) {
        let t = elapsed as f32;
        self.pool.for_each_mut(|i, p, _, base| {
            let radius = (p.x * p.x + p.z * p.z).sqrt();
            let angle = p.z.atan2(p.x) + delta * Self::SPIN;
            p.x = angle.cos() * radius;
            p.z = angle.sin() * radius;

            let pulse = nebula_pulse(t, i);
            p.set_color([base[0] * pulse, base[1] * pulse, base[2] * pulse]);
        });
    }

    pub fn points(&self) -> &[PointVertex] {
        self.pool.points()
    }
}

/// Color multiplier in [0.6, 1.0]: `sin(2t + 0.1i) · 0.2 + 0.8`.
pub fn nebula_pulse(t: f32, index: usize) -> f32 {
    (t * 2.0 + index as f32 * 0.1).sin() * 0.2 + 0.8
}

// ── Solar wind ───────────────────────────────────────────────────────

/// Particles streaming away from the sun, recycled near it once too far out.
pub struct SolarWind {
    pool: ParticlePool,
}

impl SolarWind {
    pub const COUNT: usize = 100;
    /// Particles strictly beyond this distance are recycled.
    pub const MAX_DISTANCE: f32 = 200.0;
    /// Distance from the sun where recycled particles restart.
    pub const RESPAWN_RADIUS: f32 = 5.0;

    pub fn new(rng: &mut Rng) -> Self {
        let pool = ParticlePool::new(Self::COUNT, |_| {
            let distance = 5.0 + rng.next_f32() * 200.0;
            let angle = rng.angle();
            let height = (rng.next_f32() - 0.5) * 20.0;
            let pos = Vec3::new(angle.cos() * distance, height, angle.sin() * distance);
            let color = [1.0, 0.8 + rng.next_f32() * 0.2, 0.2 + rng.next_f32() * 0.3];
            let size = 0.5 + rng.next_f32() * 2.0;
            let velocity = Vec3::new(
                angle.cos() * 0.1,
                (rng.next_f32() - 0.5) * 0.05,
                angle.sin() * 0.1,
            );
            (PointVertex::new(pos, size, color, 0.8), velocity)
        });
        Self { pool }
    }

    /// One gated step. Velocities are per 1/60 s, so they scale by `delta · 60`.
    pub fn tick(&mut self, delta: f32, rng: &mut Rng) {
        let step = delta * 60.0;
        self.pool.for_each_mut(|_, p, velocity, _| {
            let pos = p.position() + velocity * step;
            if pos.length() > Self::MAX_DISTANCE {
                let angle = rng.angle();
                p.set_position(Vec3::new(
                    angle.cos() * Self::RESPAWN_RADIUS,
                    (rng.next_f32() - 0.5) * 2.0,
                    angle.sin() * Self::RESPAWN_RADIUS,
                ));
            } else {
                p.set_position(pos);
            }
        });
    }

    pub fn points(&self) -> &[PointVertex] {
        self.pool.points()
    }
}

// ── Wormhole tunnel ──────────────────────────────────────────────────

/// Spiral of particles flowing through the wormhole ring.
pub struct Wormhole {
    pool: ParticlePool,
    radius: f32,
}

impl Wormhole {
    pub const ORIGIN: Vec3 = Vec3::new(80.0, 20.0, 0.0);
    pub const RADIUS: f32 = 6.0;
    /// Depth advance in units per second.
    pub const FLOW_SPEED: f32 = 12.0;
    pub const DEPTH: f32 = 10.0;

    /// `count` is fixed for the life of the emitter.
    pub fn new(count: usize, radius: f32, rng: &mut Rng) -> Self {
        let pool = ParticlePool::new(count, |i| {
            let pos = spiral_point(i, count, radius);
            let ct = i as f32 / count as f32;
            let color = [0.5 + ct * 0.5, 0.2 + ct * 0.3, 1.0];
            let size = 1.0 + rng.next_f32() * 3.0;
            (PointVertex::new(pos, size, color, 0.8), Vec3::ZERO)
        });
        Self { pool, radius }
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Advance every particle along the tunnel axis, wrapping at the far end.
    pub fn tick(&mut self, delta: f32) {
        let n = self.pool.len();
        let radius = self.radius;
        self.pool.for_each_mut(|i, p, _, _| {
            p.z += Self::FLOW_SPEED * delta;
            if p.z > Self::DEPTH {
                let home = spiral_point(i, n, radius);
                p.x = home.x;
                p.y = home.y;
                p.z = -Self::DEPTH;
            }
        });
    }

    pub fn points(&self) -> &[PointVertex] {
        self.pool.points()
    }
}

/// Particle `i` of `n` on the tunnel spiral: angle `(i/n)·4π`,
/// radius `R·(1 - 0.8·i/n)`, depth `(i/n)·20 - 10`.
pub fn spiral_point(i: usize, n: usize, radius: f32) -> Vec3 {
    if n == 0 {
        return Vec3::ZERO;
    }
    let f = i as f32 / n as f32;
    let t = f * 2.0 * TAU;
    let r = radius * (1.0 - f * 0.8);
    Vec3::new(t.cos() * r, t.sin() * r, f * 20.0 - 10.0)
}

// ── Emitter set ──────────────────────────────────────────────────────

/// Which emitters should be live this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitterSwitches {
    pub nebula: bool,
    pub solar_wind: bool,
    pub wormhole: bool,
}

impl EmitterSwitches {
    /// Combine the user's toggles with the active tier.
    /// Nebula and solar wind are ambient effects; the tunnel only needs particles.
    pub fn resolve(profile: &QualityProfile, nebula: bool, solar_wind: bool, warp: bool) -> Self {
        let particles = profile.particle_effects;
        let ambient = particles && profile.ambient_effects;
        Self {
            nebula: nebula && ambient,
            solar_wind: solar_wind && ambient,
            wormhole: warp && particles,
        }
    }
}

impl Default for Emitters {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazily constructed emitters.
pub struct Emitters {
    nebula: Option<Nebula>,
    solar_wind: Option<SolarWind>,
    wormhole: Option<Wormhole>,
    wormhole_radius: f32,
    switches: EmitterSwitches,
}

impl Emitters {
    pub fn new() -> Self {
        Self {
            nebula: None,
            solar_wind: None,
            wormhole: None,
            wormhole_radius: Wormhole::RADIUS,
            switches: EmitterSwitches::default(),
        }
    }

    pub fn with_wormhole_radius(mut self, radius: f32) -> Self {
        self.wormhole_radius = radius;
        self
    }

    pub fn wormhole_radius(&self) -> f32 {
        self.wormhole_radius
    }

    pub fn wormhole(&self) -> Option<&Wormhole> {
        self.wormhole.as_ref()
    }

    /// Number of emitters currently built.
    pub fn built(&self) -> usize {
        self.nebula.is_some() as usize + self.solar_wind.is_some() as usize + self.wormhole.is_some() as usize
    }

    /// Build any newly enabled emitter and step the enabled ones.
    ///
    /// Nebula and solar wind only move when `gate_fires`; the tunnel flows
    /// every frame. Disabled emitters are not touched at all.
    pub fn update(
        &mut self,
        switches: EmitterSwitches,
        profile: &QualityProfile,
        gate_fires: bool,
        delta: f32,
        elapsed: f64,
        rng: &mut Rng,
    ) {
        self.switches = switches;

        if switches.nebula {
            let nebula = self.nebula.get_or_insert_with(|| {
                log::debug!("Building nebula ({} particles)", Nebula::COUNT);
                Nebula::new(rng)
            });
            if gate_fires {
                nebula.tick(delta, elapsed);
            }
        }

        if switches.solar_wind {
            if self.solar_wind.is_none() {
                log::debug!("Building solar wind ({} particles)", SolarWind::COUNT);
                self.solar_wind = Some(SolarWind::new(rng));
            }
            if gate_fires {
                if let Some(wind) = self.solar_wind.as_mut() {
                    wind.tick(delta, rng);
                }
            }
        }

        if switches.wormhole {
            if self.wormhole.is_none() {
                let count = profile.wormhole_particles as usize;
                log::debug!("Building wormhole tunnel ({} particles)", count);
                self.wormhole = Some(Wormhole::new(count, self.wormhole_radius, rng));
            }
            if let Some(tunnel) = self.wormhole.as_mut() {
                tunnel.tick(delta);
            }
        }
    }

    /// Append the visible emitters to the frame's point buffer.
    /// `yaw` is the whole system's rotation about Y.
    pub fn write_points(&self, points: &mut PointBuffer, yaw: f32) {
        let turn = Quat::from_rotation_y(yaw);
        if let (true, Some(n)) = (self.switches.nebula, &self.nebula) {
            points.push_batch_rotated(BATCH_NEBULA, turn * Nebula::ORIGIN, 1.0, yaw, n.points());
        }
        if let (true, Some(w)) = (self.switches.solar_wind, &self.solar_wind) {
            points.push_batch_rotated(BATCH_SOLAR_WIND, Vec3::ZERO, 1.0, yaw, w.points());
        }
        if let (true, Some(t)) = (self.switches.wormhole, &self.wormhole) {
            points.push_batch_rotated(BATCH_WORMHOLE, turn * Wormhole::ORIGIN, 1.0, yaw, t.points());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stellar_engine::QualityTier;

    #[test]
    fn solar_wind_recycles_strictly_beyond_limit() {
        let mut rng = Rng::new(7);
        let mut wind = SolarWind::new(&mut rng);
        wind.pool.set_position(0, Vec3::new(201.0, 0.0, 0.0));
        wind.pool.set_position(1, Vec3::new(199.0, 0.0, 0.0));
        // Zero delta: no motion, only the recycling rule applies
        wind.tick(0.0, &mut rng);

        let recycled = wind.points()[0].position();
        let horizontal = Vec3::new(recycled.x, 0.0, recycled.z).length();
        assert!((horizontal - SolarWind::RESPAWN_RADIUS).abs() < 1e-4);
        assert!(recycled.y.abs() <= 1.0);

        assert_eq!(wind.points()[1].position(), Vec3::new(199.0, 0.0, 0.0));
    }

    #[test]
    fn solar_wind_moves_along_velocity() {
        let mut rng = Rng::new(3);
        let mut wind = SolarWind::new(&mut rng);
        wind.pool.set_position(0, Vec3::new(10.0, 0.0, 0.0));
        let v = wind.pool.velocity(0).unwrap();
        wind.tick(0.5, &mut rng);
        let expected = Vec3::new(10.0, 0.0, 0.0) + v * 30.0;
        assert!((wind.points()[0].position() - expected).length() < 1e-4);
    }

    #[test]
    fn nebula_rotation_preserves_radius_and_height() {
        let mut rng = Rng::new(11);
        let mut nebula = Nebula::new(&mut rng);
        let before: Vec<Vec3> = nebula.points().iter().map(|p| p.position()).collect();
        nebula.tick(0.2, 1.0);
        for (b, p) in before.iter().zip(nebula.points()) {
            let a = p.position();
            assert!((a.y - b.y).abs() < 1e-5);
            let ra = (a.x * a.x + a.z * a.z).sqrt();
            let rb = (b.x * b.x + b.z * b.z).sqrt();
            assert!((ra - rb).abs() < 1e-3);
        }
    }

    #[test]
    fn nebula_pulse_does_not_compound() {
        let mut rng = Rng::new(5);
        let mut nebula = Nebula::new(&mut rng);
        let base = nebula.pool.base_color(0).unwrap();
        for _ in 0..50 {
            nebula.tick(0.1, 0.0);
        }
        let pulse = nebula_pulse(0.0, 0);
        assert!((nebula.points()[0].r - base[0] * pulse).abs() < 1e-6);
    }

    #[test]
    fn wormhole_spiral_layout() {
        let p0 = spiral_point(0, 1000, 6.0);
        assert!((p0 - Vec3::new(6.0, 0.0, -10.0)).length() < 1e-5);
        let mid = spiral_point(500, 1000, 6.0);
        assert!((mid.z - 0.0).abs() < 1e-5);
        assert!((Vec3::new(mid.x, mid.y, 0.0).length() - 6.0 * 0.6).abs() < 1e-4);
    }

    #[test]
    fn wormhole_wraps_to_entrance() {
        let mut rng = Rng::new(1);
        let mut tunnel = Wormhole::new(100, 6.0, &mut rng);
        // Last particle starts at depth 9.8
        tunnel.tick(0.1);
        let last = tunnel.points()[99];
        assert_eq!(last.z, -Wormhole::DEPTH);
        let home = spiral_point(99, 100, 6.0);
        assert_eq!((last.x, last.y), (home.x, home.y));
        // First particle just moved forward
        assert!((tunnel.points()[0].z - (-10.0 + 1.2)).abs() < 1e-5);
    }

    #[test]
    fn switches_follow_tier() {
        let low = QualityTier::Low.profile();
        let medium = QualityTier::Medium.profile();
        let high = QualityTier::High.profile();

        assert_eq!(EmitterSwitches::resolve(&low, true, true, true), EmitterSwitches::default());
        let m = EmitterSwitches::resolve(&medium, true, true, true);
        assert!(!m.nebula && !m.solar_wind && m.wormhole);
        let h = EmitterSwitches::resolve(&high, true, false, false);
        assert!(h.nebula && !h.solar_wind && !h.wormhole);
    }

    #[test]
    fn emitters_are_lazy_and_keep_their_capacity() {
        let mut rng = Rng::new(9);
        let mut emitters = Emitters::new();
        let high = QualityTier::High.profile();
        let medium = QualityTier::Medium.profile();

        emitters.update(EmitterSwitches::default(), &high, true, 0.016, 1.0, &mut rng);
        assert_eq!(emitters.built(), 0);

        let on = EmitterSwitches { wormhole: true, ..Default::default() };
        emitters.update(on, &high, true, 0.016, 1.0, &mut rng);
        assert_eq!(emitters.wormhole().map(|w| w.len()), Some(2000));

        // A later tier change does not resize the live buffer
        emitters.update(on, &medium, true, 0.016, 1.0, &mut rng);
        assert_eq!(emitters.wormhole().map(|w| w.len()), Some(2000));
    }

    #[test]
    fn disabled_emitters_write_no_points() {
        let mut rng = Rng::new(9);
        let mut emitters = Emitters::new();
        let high = QualityTier::High.profile();
        let all = EmitterSwitches { nebula: true, solar_wind: true, wormhole: true };
        emitters.update(all, &high, true, 0.016, 1.0, &mut rng);

        let mut points = PointBuffer::with_capacity(8192);
        emitters.write_points(&mut points, 0.0);
        assert_eq!(points.batch_count(), 3);
        assert_eq!(points.point_count(), 200 + 100 + 2000);

        emitters.update(EmitterSwitches::default(), &high, true, 0.016, 1.0, &mut rng);
        points.clear();
        emitters.write_points(&mut points, 0.0);
        assert_eq!(points.point_count(), 0);
    }
}
