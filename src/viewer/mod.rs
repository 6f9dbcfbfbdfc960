//! Viewer session: file selection, skeleton state and gesture handling

pub mod config;
pub mod controller;
pub mod layout;
pub mod session;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ViewerConfig;
pub use controller::{FrameTickable, ViewerController};
pub use layout::{cover_rect, cover_scale, Rect};
pub use session::{LoadedSkeleton, SessionPhase, SessionState, ViewerSession};
pub use source::{SkeletonFormat, SkeletonSource};
