/// Linear RGB color for mesh rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl MeshColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From a packed 0xRRGGBB value.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn scaled(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }
}

impl Default for MeshColor {
    fn default() -> Self {
        Self { r: 0.6, g: 0.6, b: 0.8 }
    }
}

/// Mesh primitive. The host owns tessellation; only parameters cross the bridge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshShape {
    Sphere { radius: f32 },
    /// Flat annulus in the local XZ plane.
    Ring { inner: f32, outer: f32 },
    /// Torus in the local XY plane: major radius and tube radius.
    Torus { radius: f32, tube: f32 },
    /// Upright cylinder along local Y.
    Cylinder { radius: f32, height: f32 },
}

impl MeshShape {
    /// Wire code for the shape kind.
    pub fn code(&self) -> f32 {
        match self {
            MeshShape::Sphere { .. } => 0.0,
            MeshShape::Ring { .. } => 1.0,
            MeshShape::Torus { .. } => 2.0,
            MeshShape::Cylinder { .. } => 3.0,
        }
    }

    /// The two shape parameters in wire order.
    pub fn params(&self) -> [f32; 2] {
        match *self {
            MeshShape::Sphere { radius } => [radius, 0.0],
            MeshShape::Ring { inner, outer } => [inner, outer],
            MeshShape::Torus { radius, tube } => [radius, tube],
            MeshShape::Cylinder { radius, height } => [radius, height],
        }
    }
}

/// Component for rendered meshes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshComponent {
    pub shape: MeshShape,
    pub color: MeshColor,
    /// Glow multiplier (0 = unlit by itself).
    pub emissive: f32,
    pub opacity: f32,
    /// Receives pointer events from the host.
    pub pickable: bool,
}

impl Default for MeshComponent {
    fn default() -> Self {
        Self {
            shape: MeshShape::Sphere { radius: 1.0 },
            color: MeshColor::default(),
            emissive: 0.0,
            opacity: 1.0,
            pickable: false,
        }
    }
}

impl MeshComponent {
    pub fn new(shape: MeshShape, color: MeshColor) -> Self {
        Self {
            shape,
            color,
            ..Default::default()
        }
    }

    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_pickable(mut self, pickable: bool) -> Self {
        self.pickable = pickable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_unpacks_channels() {
        let c = MeshColor::hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn shape_params_in_wire_order() {
        let ring = MeshShape::Ring { inner: 2.0, outer: 3.5 };
        assert_eq!(ring.code(), 1.0);
        assert_eq!(ring.params(), [2.0, 3.5]);
    }

    #[test]
    fn opacity_is_clamped() {
        let m = MeshComponent::default().with_opacity(3.0);
        assert_eq!(m.opacity, 1.0);
    }
}
