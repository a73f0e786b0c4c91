//! Fixed-capacity particle pool.

use glam::Vec3;

use crate::renderer::point::PointVertex;

/// A fixed-capacity particle buffer.
///
/// Capacity is chosen once at construction; particles are recycled in place
/// when they leave their valid domain, never reallocated. Render data lives in
/// a contiguous `PointVertex` slice so it can be copied straight to the host.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    points: Vec<PointVertex>,
    velocities: Vec<Vec3>,
    /// Unmodulated colors, for effects that pulse around a base.
    base_colors: Vec<[f32; 3]>,
}

impl ParticlePool {
    /// Build a pool of exactly `count` particles, initialized by `init(index)`.
    pub fn new(count: usize, mut init: impl FnMut(usize) -> (PointVertex, Vec3)) -> Self {
        let mut points = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);
        let mut base_colors = Vec::with_capacity(count);
        for i in 0..count {
            let (point, velocity) = init(i);
            base_colors.push(point.color());
            points.push(point);
            velocities.push(velocity);
        }
        Self {
            points,
            velocities,
            base_colors,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Capacity is the length; the pool never grows.
    pub fn capacity(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[PointVertex] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<&PointVertex> {
        self.points.get(index)
    }

    pub fn velocity(&self, index: usize) -> Option<Vec3> {
        self.velocities.get(index).copied()
    }

    pub fn base_color(&self, index: usize) -> Option<[f32; 3]> {
        self.base_colors.get(index).copied()
    }

    /// Overwrite a particle's position (recycling).
    pub fn set_position(&mut self, index: usize, position: Vec3) {
        if let Some(p) = self.points.get_mut(index) {
            p.set_position(position);
        }
    }

    /// Visit every particle mutably with its index, velocity and base color.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(usize, &mut PointVertex, Vec3, [f32; 3])) {
        for (i, ((p, v), c)) in self
            .points
            .iter_mut()
            .zip(self.velocities.iter())
            .zip(self.base_colors.iter())
            .enumerate()
        {
            f(i, p, *v, *c);
        }
    }
}
