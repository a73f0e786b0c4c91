pub mod camera;
pub mod instance;
pub mod point;
