//! Viewer session state

use std::path::{Path, PathBuf};

use crate::host::PosedSkeleton;

/// A successfully loaded skeleton and its current selection
pub struct LoadedSkeleton<P> {
    pose: P,
    skin_index: usize,
    animation_index: usize,
    skin_count: usize,
    animation_count: usize,
}

impl<P: PosedSkeleton> LoadedSkeleton<P> {
    /// Wrap a fresh pose with selection (0, 0)
    pub fn new(pose: P) -> Self {
        let skin_count = pose.skin_count();
        let animation_count = pose.animation_count();
        Self {
            pose,
            skin_index: 0,
            animation_index: 0,
            skin_count,
            animation_count,
        }
    }
}

impl<P> LoadedSkeleton<P> {
    pub fn pose(&self) -> &P {
        &self.pose
    }

    pub fn pose_mut(&mut self) -> &mut P {
        &mut self.pose
    }

    pub fn skin_index(&self) -> usize {
        self.skin_index
    }

    pub fn animation_index(&self) -> usize {
        self.animation_index
    }

    pub fn skin_count(&self) -> usize {
        self.skin_count
    }

    pub fn animation_count(&self) -> usize {
        self.animation_count
    }

    /// Advance the skin selection cyclically
    ///
    /// Returns the new index, or `None` when fewer than two skins exist.
    pub fn next_skin(&mut self) -> Option<usize> {
        self.skin_index = next_index(self.skin_index, self.skin_count)?;
        Some(self.skin_index)
    }

    /// Advance the animation selection cyclically
    ///
    /// Returns the new index, or `None` when fewer than two animations exist.
    pub fn next_animation(&mut self) -> Option<usize> {
        self.animation_index = next_index(self.animation_index, self.animation_count)?;
        Some(self.animation_index)
    }
}

fn next_index(current: usize, count: usize) -> Option<usize> {
    if count < 2 {
        return None;
    }
    Some((current + 1) % count)
}

/// Whether a skeleton is available
pub enum SessionState<P> {
    Empty,
    Loaded(LoadedSkeleton<P>),
}

impl<P> SessionState<P> {
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Empty => SessionPhase::Empty,
            SessionState::Loaded(_) => SessionPhase::Loaded,
        }
    }
}

/// Coarse session phase, for logging and assertions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Empty,
    Loaded,
}

/// Everything the viewer knows about the current file selection
///
/// `P` is the engine's pose type and `T` the host's texture type; both are
/// owned exclusively and replaced wholesale.
pub struct ViewerSession<P, T> {
    pub(crate) current_file: Option<PathBuf>,
    pub(crate) current_background: Option<PathBuf>,
    pub(crate) last_applied_scale: f32,
    pub(crate) state: SessionState<P>,
    pub(crate) background: Option<T>,
    pub(crate) last_error: Option<String>,
}

impl<P, T> ViewerSession<P, T> {
    pub fn new() -> Self {
        Self {
            current_file: None,
            current_background: None,
            last_applied_scale: 1.0,
            state: SessionState::Empty,
            background: None,
            last_error: None,
        }
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn current_background(&self) -> Option<&Path> {
        self.current_background.as_deref()
    }

    pub fn last_applied_scale(&self) -> f32 {
        self.last_applied_scale
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn is_file_selected(&self) -> bool {
        self.current_file.is_some()
    }

    pub fn loaded(&self) -> Option<&LoadedSkeleton<P>> {
        match &self.state {
            SessionState::Loaded(loaded) => Some(loaded),
            SessionState::Empty => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut LoadedSkeleton<P>> {
        match &mut self.state {
            SessionState::Loaded(loaded) => Some(loaded),
            SessionState::Empty => None,
        }
    }

    pub fn pose(&self) -> Option<&P> {
        self.loaded().map(LoadedSkeleton::pose)
    }

    pub fn background(&self) -> Option<&T> {
        self.background.as_ref()
    }

    /// Diagnostic from the most recent failed skeleton load
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl<P, T> Default for ViewerSession<P, T> {
    fn default() -> Self {
        Self::new()
    }
}
