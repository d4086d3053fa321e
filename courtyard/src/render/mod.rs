mod batch;
mod wgpu_backend;

pub use batch::{QuadBatch, QuadVertex, VERTICES_PER_QUAD};
pub use wgpu_backend::{Frame, Renderer, CLEAR_COLOR};
