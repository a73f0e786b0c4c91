use crate::api::types::EntityId;

/// Input event types the engine understands.
/// Picking is done host-side, so pointer events already name the entity hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The pointer entered an entity's mesh.
    PointerOver { entity: EntityId },
    /// The pointer left an entity's mesh.
    PointerOut { entity: EntityId },
    /// An entity was clicked.
    Click { entity: EntityId },
    /// A key was pressed. `key_code` is the character code, lowercased by the host.
    KeyDown { key_code: u32 },
    /// Camera drag in pixels.
    Orbit { dx: f32, dy: f32 },
    /// Wheel delta; positive zooms out.
    Zoom { delta: f32 },
    /// A custom event from the UI layer (HUD buttons, etc.).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
