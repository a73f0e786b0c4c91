/// Shared-memory layout read by the host page.
/// Must stay in sync with the host's `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Meshes: max_meshes × 16 floats]
/// [Points: max_points × 8 floats]
/// [Batches: max_point_batches × 8 floats]
/// [Camera: 20 floats]
/// [Sounds: max_sounds × 1 float]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written into the header every frame.
/// The host reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;
use crate::api::types::GameEvent;
use crate::renderer::camera::CameraUniform;
use crate::renderer::instance::MeshInstance;
use crate::renderer::point::{PointBatch, PointVertex};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_MESHES: usize = 2;
pub const HEADER_MESH_COUNT: usize = 3;
pub const HEADER_MAX_POINTS: usize = 4;
pub const HEADER_POINT_COUNT: usize = 5;
pub const HEADER_MAX_BATCHES: usize = 6;
pub const HEADER_BATCH_COUNT: usize = 7;
pub const HEADER_MAX_SOUNDS: usize = 8;
pub const HEADER_SOUND_COUNT: usize = 9;
pub const HEADER_MAX_EVENTS: usize = 10;
pub const HEADER_EVENT_COUNT: usize = 11;
pub const HEADER_PROTOCOL_VERSION: usize = 12;
pub const HEADER_QUALITY_TIER: usize = 13;
/// Rolling average FPS, or 0 before the first sample.
pub const HEADER_AVG_FPS: usize = 14;
pub const HEADER_ELAPSED: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per mesh instance (wire format, never changes).
pub const MESH_FLOATS: usize = MeshInstance::FLOATS;
/// Floats per point vertex: x, y, z, size, r, g, b, alpha.
pub const POINT_FLOATS: usize = PointVertex::FLOATS;
/// Floats per point batch descriptor.
pub const BATCH_FLOATS: usize = PointBatch::FLOATS;
/// Floats in the camera block: view-projection plus eye.
pub const CAMERA_FLOATS: usize = CameraUniform::FLOATS;
/// Floats per game event: kind, a, b, c.
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_meshes: usize,
    pub max_points: usize,
    pub max_point_batches: usize,
    pub max_sounds: usize,
    pub max_events: usize,

    pub mesh_data_offset: usize,
    pub point_data_offset: usize,
    pub batch_data_offset: usize,
    pub camera_data_offset: usize,
    pub sound_data_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(
        max_meshes: usize,
        max_points: usize,
        max_point_batches: usize,
        max_sounds: usize,
        max_events: usize,
    ) -> Self {
        let mesh_data_offset = HEADER_FLOATS;
        let point_data_offset = mesh_data_offset + max_meshes * MESH_FLOATS;
        let batch_data_offset = point_data_offset + max_points * POINT_FLOATS;
        let camera_data_offset = batch_data_offset + max_point_batches * BATCH_FLOATS;
        let sound_data_offset = camera_data_offset + CAMERA_FLOATS;
        let event_data_offset = sound_data_offset + max_sounds;
        let buffer_total_floats = event_data_offset + max_events * EVENT_FLOATS;

        Self {
            max_meshes,
            max_points,
            max_point_batches,
            max_sounds,
            max_events,
            mesh_data_offset,
            point_data_offset,
            batch_data_offset,
            camera_data_offset,
            sound_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.max_meshes,
            config.max_points,
            config.max_point_batches,
            config.max_sounds,
            config.max_events,
        )
    }

    /// Write the static capacity fields into a header block.
    pub fn write_capacities(&self, header: &mut [f32; HEADER_FLOATS]) {
        header[HEADER_MAX_MESHES] = self.max_meshes as f32;
        header[HEADER_MAX_POINTS] = self.max_points as f32;
        header[HEADER_MAX_BATCHES] = self.max_point_batches as f32;
        header[HEADER_MAX_SOUNDS] = self.max_sounds as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
    }
}
