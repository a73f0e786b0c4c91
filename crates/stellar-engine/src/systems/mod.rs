pub mod effects;
pub mod performance;
pub mod quality;
pub mod render;
