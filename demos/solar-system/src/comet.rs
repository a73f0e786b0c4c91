/// Comet: elliptical orbit plus a fading trail of recent positions.

use glam::Vec3;
use stellar_engine::{PointVertex, TrailRing};

use crate::orbit::CometOrbit;

pub const TRAIL_LENGTH: usize = 100;

pub struct Comet {
    orbit: CometOrbit,
    trail: TrailRing,
    /// Scratch for the render pass, sized once.
    vertices: Vec<PointVertex>,
    head: Vec3,
    /// Nucleus spin, radians.
    pub spin: Vec3,
}

impl Comet {
    pub fn new(orbit: CometOrbit) -> Self {
        let head = orbit.position_at(0.0).as_vec3();
        Self {
            orbit,
            trail: TrailRing::new(TRAIL_LENGTH),
            vertices: Vec::with_capacity(TRAIL_LENGTH),
            head,
            spin: Vec3::ZERO,
        }
    }

    pub fn orbit(&self) -> &CometOrbit {
        &self.orbit
    }

    pub fn head(&self) -> Vec3 {
        self.head
    }

    pub fn trail(&self) -> &TrailRing {
        &self.trail
    }

    /// Move the nucleus to its position at `time` and record it in the trail.
    pub fn advance(&mut self, time: f64) {
        self.head = self.orbit.position_at(time).as_vec3();
        self.trail.push(self.head);
        self.spin.x += 0.01;
        self.spin.y += 0.02;
    }

    /// Drop the trail, e.g. when the comet is toggled off.
    pub fn reset_trail(&mut self) {
        self.trail.clear();
    }

    /// Trail points, newest first, faded by recency.
    pub fn trail_vertices(&mut self) -> &[PointVertex] {
        self.vertices.clear();
        for (i, pos) in self.trail.iter().enumerate() {
            let alpha = self.trail.alpha_at(i);
            let size = (1.0 - i as f32 / TRAIL_LENGTH as f32) * 3.0;
            self.vertices.push(PointVertex::new(pos, size, trail_color(alpha), alpha));
        }
        &self.vertices
    }
}

/// Blue-white fade: `r = 0.5 + 0.5α`, `g = 0.7 + 0.3α`, `b = 1`.
pub fn trail_color(alpha: f32) -> [f32; 3] {
    [0.5 + alpha * 0.5, 0.7 + alpha * 0.3, 1.0]
}
