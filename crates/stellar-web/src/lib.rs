pub mod runner;

pub use runner::GameRunner;

// Re-exported for use inside `export_game!` expansions.
pub use js_sys;
pub use web_sys;

/// Whether the page exposes a Web Audio context constructor.
/// Only meaningful inside a browser; callers run it from `game_init`.
pub fn detect_audio() -> bool {
    let global = js_sys::global();
    ["AudioContext", "webkitAudioContext"].iter().any(|name| {
        js_sys::Reflect::has(&global, &wasm_bindgen::JsValue::from_str(name)).unwrap_or(false)
    })
}

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use stellar_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// stellar_web::export_game!(MyGame, "my-game");
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `stellar_engine::Game`
///   and has a `new()` constructor
/// - `$game_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        /// Run `f` against the live runner. None (with a console warning) before `game_init`.
        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        $crate::web_sys::console::warn_1(
                            &concat!($game_name, ": not initialized, call game_init() first").into(),
                        );
                        None
                    }
                }
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let mut runner = $crate::GameRunner::new(game);
            let audio = $crate::detect_audio();
            runner.set_audio_available(audio);
            runner.set_epoch($crate::js_sys::Date::now() / 1000.0);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized (audio {})", $game_name, if audio { "on" } else { "off" });
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_over(entity: u32) {
            with_runner(|r| r.push_input(InputEvent::PointerOver { entity: EntityId(entity) }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_out(entity: u32) {
            with_runner(|r| r.push_input(InputEvent::PointerOut { entity: EntityId(entity) }));
        }

        #[wasm_bindgen]
        pub fn game_click(entity: u32) {
            with_runner(|r| r.push_input(InputEvent::Click { entity: EntityId(entity) }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_orbit(dx: f32, dy: f32) {
            with_runner(|r| r.push_input(InputEvent::Orbit { dx, dy }));
        }

        #[wasm_bindgen]
        pub fn game_zoom(delta: f32) {
            with_runner(|r| r.push_input(InputEvent::Zoom { delta }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn game_load_config(json: &str) -> bool {
            with_runner(|r| r.load_config(json)).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn game_set_audio_available(available: bool) {
            with_runner(|r| r.set_audio_available(available));
        }

        #[wasm_bindgen]
        pub fn game_set_viewport(width: f32, height: f32) {
            with_runner(|r| r.set_viewport(width, height));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_header_ptr() -> *const f32 {
            with_runner(|r| r.header_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_meshes_ptr() -> *const f32 {
            with_runner(|r| r.meshes_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_mesh_count() -> u32 {
            with_runner(|r| r.mesh_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_points_ptr() -> *const f32 {
            with_runner(|r| r.points_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_point_count() -> u32 {
            with_runner(|r| r.point_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_batches_ptr() -> *const f32 {
            with_runner(|r| r.batches_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_batch_count() -> u32 {
            with_runner(|r| r.batch_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_camera_ptr() -> *const f32 {
            with_runner(|r| r.camera_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_ptr() -> *const u8 {
            with_runner(|r| r.sound_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_len() -> u32 {
            with_runner(|r| r.sound_events_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len()).unwrap_or(0)
        }

        /// Copy of this frame's game events, safe to keep across ticks.
        #[wasm_bindgen]
        pub fn get_game_events() -> $crate::js_sys::Float32Array {
            with_runner(|r| $crate::js_sys::Float32Array::from(r.game_events()))
                .unwrap_or_else(|| $crate::js_sys::Float32Array::new_with_length(0))
        }

        #[wasm_bindgen]
        pub fn get_quality_tier() -> u32 {
            with_runner(|r| r.quality_tier()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_average_fps() -> f32 {
            with_runner(|r| r.average_fps()).unwrap_or(0.0)
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_meshes() -> u32 {
            with_runner(|r| r.max_meshes()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_points() -> u32 {
            with_runner(|r| r.max_points()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_sounds() -> u32 {
            with_runner(|r| r.max_sounds()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
        }
    };
}
