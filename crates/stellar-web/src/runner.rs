use stellar_engine::{
    Game, GameConfig, EngineContext,
    InputEvent, InputQueue, MeshBuffer,
    FrameClock, ProtocolLayout, CameraUniform,
};
use stellar_engine::bridge::protocol::{
    HEADER_FLOATS, HEADER_FRAME_COUNTER, HEADER_MESH_COUNT, HEADER_POINT_COUNT,
    HEADER_BATCH_COUNT, HEADER_SOUND_COUNT, HEADER_EVENT_COUNT, HEADER_QUALITY_TIER,
    HEADER_AVG_FPS, HEADER_ELAPSED,
};
use stellar_engine::systems::render::build_mesh_buffer;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    clock: FrameClock,
    meshes: MeshBuffer,
    camera: CameraUniform,
    header: [f32; HEADER_FLOATS],
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    /// Flat buffer of sound event IDs for host reads.
    sound_buffer: Vec<u8>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let layout = ProtocolLayout::from_config(&config);
        let ctx = EngineContext::with_config(&config);
        let camera = ctx.camera.uniform();

        Self {
            game,
            ctx,
            input: InputQueue::new(),
            clock: FrameClock::new(),
            meshes: MeshBuffer::with_capacity(config.max_meshes),
            camera,
            header: [0.0; HEADER_FLOATS],
            sound_buffer: Vec::with_capacity(config.max_sounds),
            layout,
            config,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.layout.write_capacities(&mut self.header);
        self.game.init(&mut self.ctx, &self.clock);
        self.initialized = true;
        self.publish();
    }

    /// Anchor the clock's wall time. Call before `init`.
    pub fn set_epoch(&mut self, epoch: f64) {
        self.clock.set_epoch(epoch);
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one rendered frame.
    ///
    /// Order: clock, performance sample, game update, camera, render buffers.
    /// The performance sample runs every frame so throttled frames still count.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.clock.advance(dt);
        self.ctx.sample_performance(self.clock.elapsed());

        self.ctx.clear_frame_data();
        self.game.update(&mut self.ctx, &self.input, &self.clock);
        self.input.clear();

        self.ctx.camera.update(self.clock.delta());
        self.publish();
    }

    /// Hand a JSON scene description to the game. Returns false if rejected.
    pub fn load_config(&mut self, json: &str) -> bool {
        if !self.initialized {
            log::warn!("load_config before init ignored");
            return false;
        }
        let accepted = self.game.load_config(json, &mut self.ctx);
        if accepted {
            self.publish();
        }
        accepted
    }

    pub fn set_audio_available(&mut self, available: bool) {
        self.ctx.set_audio_available(available);
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.ctx.camera.set_aspect(width, height);
        self.camera = self.ctx.camera.uniform();
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// Rebuild everything the host reads after a frame.
    fn publish(&mut self) {
        build_mesh_buffer(self.ctx.scene.visible(), &self.ctx.quality.profile(), &mut self.meshes);
        self.camera = self.ctx.camera.uniform();

        self.sound_buffer.clear();
        for sound in &self.ctx.sounds {
            self.sound_buffer.push(sound.0 as u8);
        }

        let h = &mut self.header;
        h[HEADER_FRAME_COUNTER] = self.clock.frame() as f32;
        h[HEADER_MESH_COUNT] = self.meshes.instance_count() as f32;
        h[HEADER_POINT_COUNT] = self.ctx.points.point_count() as f32;
        h[HEADER_BATCH_COUNT] = self.ctx.points.batch_count() as f32;
        h[HEADER_SOUND_COUNT] = self.sound_buffer.len() as f32;
        h[HEADER_EVENT_COUNT] = self.ctx.events.len() as f32;
        h[HEADER_QUALITY_TIER] = self.ctx.quality.tier().code() as f32;
        h[HEADER_AVG_FPS] = self.ctx.monitor.average_fps().unwrap_or(0.0);
        h[HEADER_ELAPSED] = self.clock.elapsed() as f32;
    }

    // ---- Pointer accessors for host reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn meshes_ptr(&self) -> *const f32 {
        self.meshes.instances_ptr()
    }

    pub fn mesh_count(&self) -> u32 {
        self.meshes.instance_count() as u32
    }

    pub fn points_ptr(&self) -> *const f32 {
        self.ctx.points.points_ptr()
    }

    pub fn point_count(&self) -> u32 {
        self.ctx.points.point_count() as u32
    }

    pub fn batches_ptr(&self) -> *const f32 {
        self.ctx.points.batches_ptr()
    }

    pub fn batch_count(&self) -> u32 {
        self.ctx.points.batch_count() as u32
    }

    pub fn camera_ptr(&self) -> *const f32 {
        &self.camera as *const CameraUniform as *const f32
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    /// Game events flattened as `kind, a, b, c` quadruples.
    pub fn game_events(&self) -> &[f32] {
        bytemuck::cast_slice(&self.ctx.events)
    }

    pub fn quality_tier(&self) -> u32 {
        self.ctx.quality.tier().code()
    }

    pub fn average_fps(&self) -> f32 {
        self.ctx.monitor.average_fps().unwrap_or(0.0)
    }

    // ---- Capacity accessors (read by the host via wasm_bindgen exports) ----

    pub fn max_meshes(&self) -> u32 {
        self.layout.max_meshes as u32
    }

    pub fn max_points(&self) -> u32 {
        self.layout.max_points as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stellar_engine::{Entity, MeshComponent, QualityTier, SoundEvent, GameEvent};

    /// Counts updates and mirrors every click back as an event.
    struct CountingGame {
        updates: u32,
        started_at: f64,
    }

    impl Game for CountingGame {
        fn init(&mut self, ctx: &mut EngineContext, clock: &FrameClock) {
            self.started_at = clock.wall_time();
            let id = ctx.next_id();
            ctx.scene.spawn(Entity::new(id).with_mesh(MeshComponent::default()));
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, _clock: &FrameClock) {
            self.updates += 1;
            for event in input.iter() {
                if let InputEvent::Click { entity } = event {
                    ctx.emit_event(GameEvent::new(1.0, entity.0 as f32, 0.0, 0.0));
                    ctx.emit_sound(SoundEvent(4));
                }
            }
        }
    }

    fn runner() -> GameRunner<CountingGame> {
        let mut r = GameRunner::new(CountingGame { updates: 0, started_at: 0.0 });
        r.init();
        r
    }

    #[test]
    fn epoch_reaches_init() {
        let mut r = GameRunner::new(CountingGame { updates: 0, started_at: 0.0 });
        r.set_epoch(1_234.5);
        r.init();
        assert_eq!(r.game().started_at, 1_234.5);
    }

    #[test]
    fn tick_before_init_is_ignored() {
        let mut r = GameRunner::new(CountingGame { updates: 0, started_at: 0.0 });
        r.tick(0.016);
        assert_eq!(r.game().updates, 0);
    }

    #[test]
    fn tick_builds_meshes_and_drains_input() {
        let mut r = runner();
        assert_eq!(r.mesh_count(), 1);
        r.push_input(InputEvent::Click { entity: stellar_engine::EntityId(1) });
        r.tick(0.016);
        assert_eq!(r.game_events(), &[1.0, 1.0, 0.0, 0.0]);
        assert_eq!(r.sound_events_len(), 1);

        // Input and per-frame events do not leak into the next frame
        r.tick(0.016);
        assert_eq!(r.game_events_len(), 0);
        assert_eq!(r.game().updates, 2);
    }

    #[test]
    fn slow_frames_degrade_quality_through_the_runner() {
        let mut r = runner();
        assert_eq!(r.quality_tier(), QualityTier::Medium.code());
        // Four seconds at 20 fps
        for _ in 0..80 {
            r.tick(0.05);
        }
        assert_eq!(r.quality_tier(), QualityTier::Low.code());
        assert!(r.average_fps() > 15.0 && r.average_fps() < 25.0);
    }

    #[test]
    fn default_game_rejects_config() {
        let mut r = runner();
        assert!(!r.load_config("{}"));
    }
}
