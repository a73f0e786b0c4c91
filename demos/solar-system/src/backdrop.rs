/// Static point clouds: background stars and the asteroid belt.
/// Both are rebuilt only when the quality tier changes their counts.

use glam::Vec3;
use stellar_engine::{MeshColor, PointVertex, Rng};

pub const STAR_RADIUS: f32 = 300.0;
/// Thickness of the star shell beyond `STAR_RADIUS`.
pub const STAR_DEPTH: f32 = 50.0;
const STAR_SIZE: f32 = 4.0;

pub const BELT_INNER: f32 = 20.0;
pub const BELT_WIDTH: f32 = 5.0;
const ASTEROID_COLOR: MeshColor = MeshColor::hex(0x8B4513);

/// White stars on a spherical shell, uniformly distributed in direction.
pub fn starfield(count: usize, rng: &mut Rng) -> Vec<PointVertex> {
    (0..count)
        .map(|_| {
            let r = STAR_RADIUS + rng.next_f32() * STAR_DEPTH;
            let theta = rng.angle();
            // Uniform in cos(phi) so the poles are not crowded
            let cos_phi = rng.next_f32() * 2.0 - 1.0;
            let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();
            let dir = Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin());
            let size = (0.5 + rng.next_f32() * 0.5) * STAR_SIZE;
            PointVertex::new(dir * r, size, [1.0, 1.0, 1.0], 1.0)
        })
        .collect()
}

/// Asteroids evenly spaced in angle between Mars and Jupiter.
pub fn asteroid_belt(count: usize, rng: &mut Rng) -> Vec<PointVertex> {
    let color = ASTEROID_COLOR.to_array();
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            let r = BELT_INNER + rng.next_f32() * BELT_WIDTH;
            let y = (rng.next_f32() - 0.5) * 2.0;
            let size = 0.02 + rng.next_f32() * 0.05;
            PointVertex::new(Vec3::new(angle.cos() * r, y, angle.sin() * r), size, color, 1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_sit_in_shell() {
        let mut rng = Rng::new(4);
        let stars = starfield(500, &mut rng);
        assert_eq!(stars.len(), 500);
        for s in &stars {
            let d = s.position().length();
            assert!(d >= STAR_RADIUS - 1e-3 && d <= STAR_RADIUS + STAR_DEPTH + 1e-3, "d = {}", d);
        }
    }

    #[test]
    fn belt_stays_between_mars_and_jupiter() {
        let mut rng = Rng::new(8);
        let belt = asteroid_belt(100, &mut rng);
        assert_eq!(belt.len(), 100);
        for a in &belt {
            let p = a.position();
            let r = (p.x * p.x + p.z * p.z).sqrt();
            assert!((BELT_INNER - 1e-3..=BELT_INNER + BELT_WIDTH + 1e-3).contains(&r));
            assert!(p.y.abs() <= 1.0);
        }
    }

    #[test]
    fn empty_belt() {
        let mut rng = Rng::new(1);
        assert!(asteroid_belt(0, &mut rng).is_empty());
    }
}
