pub mod camera;
pub mod controls;
pub mod math;
pub mod mesh;
pub mod renderer;
pub mod scene;
