//! Spine Viewer - a gesture-driven viewer for Spine skeletal animations

pub mod core;
pub mod gesture;
pub mod host;
pub mod viewer;
pub mod picker;
pub mod render;
#[cfg(feature = "spine")]
pub mod spine;
