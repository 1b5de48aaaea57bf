pub mod camera;
pub mod core;
pub mod scene;
pub mod surface;
pub mod systems;
