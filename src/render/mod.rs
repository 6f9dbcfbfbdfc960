//! Rendering system and GPU interfaces

pub mod window;
pub mod context;
pub mod batch;
pub mod buffer;
pub mod pipeline;
pub mod texture;
pub mod renderer;

pub use renderer::ViewerRenderer;
