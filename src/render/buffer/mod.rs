//! GPU buffers

pub mod screen_buffer;

pub use screen_buffer::{ScreenBuffer, ScreenUniform};
