use bytemuck::{Pod, Zeroable};

/// Per-instance mesh data read by the host renderer.
/// Must match the host protocol: 20 floats = 80 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct MeshInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Euler rotation in radians.
    pub rot_x: f32,
    pub rot_y: f32,
    pub rot_z: f32,
    /// Uniform scale multiplier.
    pub scale: f32,
    /// Shape code (0 = sphere, 1 = ring, 2 = torus, 3 = cylinder).
    pub shape: f32,
    /// Shape parameters (sphere: radius; ring: inner/outer; torus: radius/tube;
    /// cylinder: radius/height).
    pub param0: f32,
    pub param1: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub emissive: f32,
    pub opacity: f32,
    /// Bit flags, see `MeshInstance::FLAG_*`.
    pub flags: f32,
    /// Owning entity, reported back by host-side picking.
    pub entity: f32,
    pub _pad: [f32; 3],
}

impl MeshInstance {
    pub const FLOATS: usize = 20;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    /// Casts shadows when the active tier enables them.
    pub const FLAG_SHADOW: u32 = 2;
    /// Hit-tested by the host; pointer events name this entity.
    pub const FLAG_PICKABLE: u32 = 4;
}

/// Mesh instances for the current frame.
pub struct MeshBuffer {
    instances: Vec<MeshInstance>,
    max_instances: usize,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::with_capacity(128)
    }

    pub fn with_capacity(max: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max),
            max_instances: max,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Push one instance. Returns false once the buffer is full.
    pub fn push(&mut self, instance: MeshInstance) -> bool {
        if self.instances.len() >= self.max_instances {
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn max_instances(&self) -> usize {
        self.max_instances
    }

    pub fn instances(&self) -> &[MeshInstance] {
        &self.instances
    }

    /// Raw pointer to instance data for host-side reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for MeshBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_instance_is_80_bytes() {
        assert_eq!(std::mem::size_of::<MeshInstance>(), 80);
        assert_eq!(MeshInstance::FLOATS, 20);
    }

    #[test]
    fn mesh_buffer_respects_capacity() {
        let mut buf = MeshBuffer::with_capacity(2);
        assert!(buf.push(MeshInstance::default()));
        assert!(buf.push(MeshInstance::default()));
        assert!(!buf.push(MeshInstance::default()));
        assert_eq!(buf.instance_count(), 2);
    }
}
