//! GPU textures

pub mod gpu_texture;

pub use gpu_texture::{GpuTexture, TextureBinder};
