//! WebGPU rendering module
//!
//! The scene is built on the CPU as flat-colored triangles in canvas pixels
//! and mapped to clip space on upload.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{BlinkTimer, build_scene};
pub use vertex::Vertex;
