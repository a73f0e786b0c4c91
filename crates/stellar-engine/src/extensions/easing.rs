// extensions/easing.rs
//
// Pure easing functions for camera flights and UI transitions.
// No dependencies on Entity/Scene, just math.

use glam::Vec3;

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// Slow start and end. Camera fly-to uses this.
    QuadInOut,
}

impl Easing {
    /// Apply the easing function to a normalized time value `t`, clamped to [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

/// Interpolate Vec3 with easing.
#[inline]
pub fn ease_vec3(a: Vec3, b: Vec3, t: f32, easing: Easing) -> Vec3 {
    a.lerp(b, easing.apply(t))
}

/// Frame-rate independent exponential approach toward `target`.
/// `damping` is the fraction closed per 1/60 s frame.
#[inline]
pub fn damp(current: f32, target: f32, damping: f32, dt: f32) -> f32 {
    let keep = (1.0 - damping.clamp(0.0, 1.0)).powf(dt * 60.0);
    target + (current - target) * keep
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for e in [Easing::Linear, Easing::QuadInOut] {
            assert!(e.apply(0.0).abs() < 1e-6);
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn quad_in_out_is_symmetric() {
        assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-6);
        let a = Easing::QuadInOut.apply(0.25);
        let b = Easing::QuadInOut.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-6);
        assert!(a < 0.25);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
    }

    #[test]
    fn ease_vec3_midpoint() {
        let v = ease_vec3(Vec3::ZERO, Vec3::new(10.0, 0.0, -10.0), 0.5, Easing::Linear);
        assert_eq!(v, Vec3::new(5.0, 0.0, -5.0));
    }

    #[test]
    fn damp_converges_without_overshoot() {
        let mut x = 0.0;
        for _ in 0..600 {
            x = damp(x, 1.0, 0.05, 1.0 / 60.0);
            assert!(x <= 1.0);
        }
        assert!((x - 1.0).abs() < 1e-3);
    }
}
