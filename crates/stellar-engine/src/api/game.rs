use crate::api::types::{EntityId, GameEvent, SoundEvent};
use crate::core::scene::Scene;
use crate::core::time::{FrameClock, UpdateGate};
use crate::input::queue::InputQueue;
use crate::renderer::camera::OrbitCamera;
use crate::renderer::point::PointBuffer;
use crate::systems::effects::Rng;
use crate::systems::performance::PerformanceMonitor;
use crate::systems::quality::{QualityControl, QualityTier};

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Maximum number of mesh instances (default: 128).
    pub max_meshes: usize,
    /// Maximum number of point vertices across all batches (default: 8192).
    pub max_points: usize,
    /// Maximum number of point batches (default: 16).
    pub max_point_batches: usize,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 64).
    pub max_events: usize,
    /// Tier the quality slot starts in (default: medium).
    pub initial_tier: QualityTier,
    /// Orbital recompute gate interval in seconds.
    pub orbit_interval: f32,
    /// Particle emitter gate interval in seconds.
    pub particle_interval: f32,
    /// Seed for the context RNG.
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_meshes: 128,
            max_points: 8192,
            max_point_batches: 16,
            max_sounds: 32,
            max_events: 64,
            initial_tier: QualityTier::Medium,
            orbit_interval: UpdateGate::ORBIT_INTERVAL,
            particle_interval: UpdateGate::PARTICLE_INTERVAL,
            rng_seed: 42,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    /// The clock carries the host epoch but has not advanced yet.
    fn init(&mut self, ctx: &mut EngineContext, clock: &FrameClock);

    /// One rendered frame. Runs after the clock advanced and the
    /// performance monitor had its say on the quality tier.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, clock: &FrameClock);

    /// Replace scene content from a JSON document.
    /// Returns false when the document was rejected; the current scene stays live.
    fn load_config(&mut self, _json: &str, _ctx: &mut EngineContext) -> bool {
        log::warn!("This game does not accept scene configs");
        false
    }
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    /// Point sprites for the current frame; cleared before every update.
    pub points: PointBuffer,
    pub camera: OrbitCamera,
    /// The single quality slot shared by the monitor and the user.
    pub quality: QualityControl,
    /// Fed by the runner every frame, before `Game::update`.
    pub monitor: PerformanceMonitor,
    pub rng: Rng,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    max_sounds: usize,
    max_events: usize,
    audio_available: bool,
    audio_warned: bool,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    pub fn with_config(config: &GameConfig) -> Self {
        Self {
            scene: Scene::with_capacity(config.max_meshes),
            points: PointBuffer::with_limits(config.max_points, config.max_point_batches),
            camera: OrbitCamera::default(),
            quality: QualityControl::new(config.initial_tier),
            monitor: PerformanceMonitor::new(),
            rng: Rng::new(config.rng_seed),
            sounds: Vec::with_capacity(config.max_sounds),
            events: Vec::with_capacity(config.max_events),
            max_sounds: config.max_sounds,
            max_events: config.max_events,
            audio_available: true,
            audio_warned: false,
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a sound event to be forwarded to the host.
    /// Dropped silently once the host reported audio as unavailable.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        if !self.audio_available {
            if !self.audio_warned {
                log::warn!("Audio unavailable, dropping sound events");
                self.audio_warned = true;
            }
            return;
        }
        if self.sounds.len() < self.max_sounds {
            self.sounds.push(event);
        }
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        if self.events.len() < self.max_events {
            self.events.push(event);
        } else {
            log::debug!("Event buffer full, dropping kind {}", event.kind);
        }
    }

    pub fn set_audio_available(&mut self, available: bool) {
        self.audio_available = available;
        if available {
            self.audio_warned = false;
        }
    }

    pub fn audio_available(&self) -> bool {
        self.audio_available
    }

    /// Count one rendered frame and let the monitor move the quality tier.
    /// Runs every frame, whether or not gated work fires.
    /// Returns the new tier when a transition was applied.
    pub fn sample_performance(&mut self, now: f64) -> Option<QualityTier> {
        let fps = self.monitor.record_frame(now)?;
        log::debug!("FPS sample: {}", fps);
        let from = self.quality.tier();
        let to = self.monitor.recommend(from)?;
        if !self.quality.apply_auto(to) {
            return None;
        }
        log::info!(
            "Quality: {} -> {} (avg {:.1} fps)",
            from.name(),
            to.name(),
            self.monitor.average_fps().unwrap_or(0.0)
        );
        Some(to)
    }

    /// Clear per-frame transient data (sounds, events, points).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
        self.points.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
