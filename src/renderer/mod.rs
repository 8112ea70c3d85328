//! WebGPU rendering module
//!
//! The scene is tessellated on the CPU into flat-colored triangles every
//! frame and drawn with a single pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState, playfield_to_ndc};
pub use vertex::Vertex;
