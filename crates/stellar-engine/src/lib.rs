pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, SoundEvent, GameEvent};
pub use components::entity::Entity;
pub use components::mesh::{MeshComponent, MeshShape, MeshColor};
pub use core::scene::Scene;
pub use core::time::{FrameClock, UpdateGate};
pub use renderer::instance::{MeshInstance, MeshBuffer};
pub use renderer::point::{PointVertex, PointBatch, PointBuffer};
pub use renderer::camera::{OrbitCamera, CameraUniform};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use systems::effects::{Rng, ParticlePool, TrailRing};
pub use systems::performance::{FpsWindow, PerformanceMonitor, PerformancePolicy};
pub use systems::quality::{QualityTier, QualityProfile, QualityControl, QualityMode, ShadowQuality};
pub use systems::render::build_mesh_buffer;

pub use extensions::{Easing, lerp, ease, ease_vec3, damp};
