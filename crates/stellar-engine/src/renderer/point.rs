use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Per-point render data for the additive point-sprite pipeline.
/// Written to shared memory for the host renderer.
/// 8 floats = 32 bytes per point.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub size: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub alpha: f32,
}

impl PointVertex {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn new(position: Vec3, size: f32, color: [f32; 3], alpha: f32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            size,
            r: color[0],
            g: color[1],
            b: color[2],
            alpha,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn set_position(&mut self, p: Vec3) {
        self.x = p.x;
        self.y = p.y;
        self.z = p.z;
    }

    pub fn color(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn set_color(&mut self, c: [f32; 3]) {
        self.r = c[0];
        self.g = c[1];
        self.b = c[2];
    }
}

/// A named run of points inside the [`PointBuffer`], so the host can draw
/// each emitter with its own transform and material.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointBatch {
    /// Game-defined batch kind (nebula, solar wind, ...).
    pub kind: f32,
    /// First point index.
    pub start: f32,
    /// Number of points.
    pub count: f32,
    /// Uniform scale applied by the host.
    pub scale: f32,
    /// Batch origin in world space.
    pub origin_x: f32,
    pub origin_y: f32,
    pub origin_z: f32,
    /// Rotation about world Y applied to the points before the origin offset.
    pub yaw: f32,
}

impl PointBatch {
    pub const FLOATS: usize = 8;
}

/// Per-frame point buffer, capped at a fixed capacity.
pub struct PointBuffer {
    points: Vec<PointVertex>,
    batches: Vec<PointBatch>,
    max_points: usize,
    max_batches: usize,
}

impl PointBuffer {
    pub fn with_capacity(max_points: usize) -> Self {
        Self::with_limits(max_points, 16)
    }

    pub fn with_limits(max_points: usize, max_batches: usize) -> Self {
        Self {
            points: Vec::with_capacity(max_points),
            batches: Vec::with_capacity(max_batches),
            max_points,
            max_batches,
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.batches.clear();
    }

    /// Append a batch of points. Truncates to the remaining capacity.
    /// Returns the number of points actually written.
    pub fn push_batch(&mut self, kind: u32, origin: Vec3, scale: f32, points: &[PointVertex]) -> usize {
        self.push_batch_rotated(kind, origin, scale, 0.0, points)
    }

    /// Like [`push_batch`](Self::push_batch), with the batch turned by `yaw` radians.
    pub fn push_batch_rotated(
        &mut self,
        kind: u32,
        origin: Vec3,
        scale: f32,
        yaw: f32,
        points: &[PointVertex],
    ) -> usize {
        let room = self.max_points.saturating_sub(self.points.len());
        let n = points.len().min(room);
        if n == 0 || self.batches.len() >= self.max_batches {
            return 0;
        }
        let start = self.points.len();
        self.points.extend_from_slice(&points[..n]);
        self.batches.push(PointBatch {
            kind: kind as f32,
            start: start as f32,
            count: n as f32,
            scale,
            origin_x: origin.x,
            origin_y: origin.y,
            origin_z: origin.z,
            yaw,
        });
        n
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    pub fn max_batches(&self) -> usize {
        self.max_batches
    }

    pub fn points(&self) -> &[PointVertex] {
        &self.points
    }

    pub fn batches(&self) -> &[PointBatch] {
        &self.batches
    }

    pub fn points_ptr(&self) -> *const f32 {
        self.points.as_ptr() as *const f32
    }

    pub fn batches_ptr(&self) -> *const f32 {
        self.batches.as_ptr() as *const f32
    }
}

impl Default for PointBuffer {
    fn default() -> Self {
        Self::with_capacity(4096)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_vertex_is_32_bytes() {
        assert_eq!(std::mem::size_of::<PointVertex>(), 32);
        assert_eq!(std::mem::size_of::<PointBatch>(), 32);
    }

    #[test]
    fn push_batch_records_ranges() {
        let mut buf = PointBuffer::with_capacity(10);
        let pts = [PointVertex::default(); 4];
        buf.push_batch(1, Vec3::ZERO, 1.0, &pts);
        buf.push_batch(2, Vec3::new(1.0, 2.0, 3.0), 2.0, &pts);
        assert_eq!(buf.point_count(), 8);
        assert_eq!(buf.batch_count(), 2);
        assert_eq!(buf.batches()[1].start, 4.0);
        assert_eq!(buf.batches()[1].origin_z, 3.0);
        assert_eq!(buf.batches()[1].yaw, 0.0);
    }

    #[test]
    fn rotated_batch_carries_yaw() {
        let mut buf = PointBuffer::with_capacity(4);
        buf.push_batch_rotated(6, Vec3::ZERO, 1.0, 0.25, &[PointVertex::default()]);
        assert_eq!(buf.batches()[0].yaw, 0.25);
    }

    #[test]
    fn push_batch_truncates_at_capacity() {
        let mut buf = PointBuffer::with_capacity(5);
        let pts = [PointVertex::default(); 4];
        assert_eq!(buf.push_batch(1, Vec3::ZERO, 1.0, &pts), 4);
        assert_eq!(buf.push_batch(1, Vec3::ZERO, 1.0, &pts), 1);
        assert_eq!(buf.push_batch(1, Vec3::ZERO, 1.0, &pts), 0);
        assert_eq!(buf.point_count(), 5);
        assert_eq!(buf.batch_count(), 2);
    }

    #[test]
    fn push_batch_stops_at_batch_limit() {
        let mut buf = PointBuffer::with_limits(100, 2);
        let pts = [PointVertex::default(); 2];
        buf.push_batch(1, Vec3::ZERO, 1.0, &pts);
        buf.push_batch(2, Vec3::ZERO, 1.0, &pts);
        assert_eq!(buf.push_batch(3, Vec3::ZERO, 1.0, &pts), 0);
        assert_eq!(buf.point_count(), 4);
    }

    #[test]
    fn pointer_reads_back_floats() {
        let mut buf = PointBuffer::with_capacity(4);
        let p = PointVertex::new(Vec3::new(1.0, 2.0, 3.0), 4.0, [0.5, 0.6, 0.7], 0.8);
        buf.push_batch(0, Vec3::ZERO, 1.0, &[p]);
        let ptr = buf.points_ptr();
        unsafe {
            assert_eq!(*ptr, 1.0);
            assert_eq!(*ptr.add(3), 4.0);
            assert_eq!(*ptr.add(7), 0.8);
        }
    }
}
