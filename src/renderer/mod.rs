//! Rendering
//!
//! `scene` builds a screen-space triangle list from the session without
//! touching it; `pipeline` uploads and draws that list with WebGPU.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
