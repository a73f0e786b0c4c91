// extensions/mod.rs
//
// Optional extension modules. Decoupled from core Entity/Scene;
// games opt in by calling them.

pub mod easing;

pub use easing::{Easing, lerp, ease, ease_vec3, damp};
