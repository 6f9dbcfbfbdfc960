//! Contracts the viewer consumes from its collaborators
//!
//! - [`AnimationEngine`] / [`PosedSkeleton`]: decodes skeleton files and
//!   poses, skins and animates them.
//! - [`RenderHost`] / [`Texture`]: owns the screen, loads textures and accepts
//!   draw calls.
//! - [`FilePicker`]: reports the selected skeleton and background files.

pub mod mesh;

pub use mesh::{BlendMode, MeshData, MeshVertex};

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::viewer::layout::Rect;
use crate::viewer::source::SkeletonSource;

/// How constraint physics advance during a pose update
///
/// Passed through to the engine unmodified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhysicsMode {
    /// Physics are not updated or applied
    None,
    /// Physics are reset to the current pose
    Reset,
    /// Physics are updated and applied
    #[default]
    Update,
    /// Physics are only applied, not advanced
    Pose,
}

/// Decodes skeleton definitions into live poses
pub trait AnimationEngine {
    type Pose: PosedSkeleton;

    /// Parse the atlas and skeleton definition and instantiate a pose in its
    /// setup state
    fn load(&mut self, source: &SkeletonSource) -> Result<Self::Pose>;
}

/// A live, mutable instantiation of a skeleton definition
///
/// Positions are in world units with y pointing up; the viewer uses screen
/// pixels as world units.
pub trait PosedSkeleton {
    /// Names of the definition's skins, in definition order
    fn skin_names(&self) -> Vec<String>;

    /// Names of the definition's animations, in definition order
    fn animation_names(&self) -> Vec<String>;

    fn skin_count(&self) -> usize {
        self.skin_names().len()
    }

    fn animation_count(&self) -> usize {
        self.animation_names().len()
    }

    /// Make the skin at `index` active
    fn set_skin(&mut self, index: usize) -> Result<()>;

    /// Reset slot attachments and colors to the setup pose
    fn set_slots_to_setup_pose(&mut self);

    /// Replace the animation on the main track
    fn set_animation(&mut self, index: usize, looping: bool) -> Result<()>;

    /// Advance animation time, apply it and recompute world transforms
    fn update(&mut self, delta_seconds: f32, physics: PhysicsMode);

    fn position(&self) -> Vec2;

    fn set_position(&mut self, position: Vec2);

    /// Horizontal scale; the viewer always scales uniformly
    fn scale(&self) -> f32;

    fn set_scale(&mut self, scale: f32);

    /// Drawable meshes for the current world transforms, in draw order
    fn meshes(&self) -> Vec<MeshData>;
}

/// A GPU texture owned by the host
pub trait Texture {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }
}

/// Screen, texture loading and draw submission
///
/// Draw coordinates are screen pixels with the origin at the bottom-left
/// corner and y pointing up.
pub trait RenderHost {
    type Texture: Texture;

    /// Current drawable size in pixels
    fn screen_size(&self) -> Vec2;

    fn load_texture(&mut self, path: &Path) -> Result<Self::Texture>;

    /// Free a texture's resources
    fn release_texture(&mut self, texture: Self::Texture) {
        drop(texture);
    }

    /// Free textures cached for skeleton meshes (atlas pages)
    fn release_mesh_textures(&mut self) {}

    fn clear(&mut self, color: [f32; 4]);

    fn draw_texture(&mut self, texture: &Self::Texture, rect: Rect);

    fn draw_mesh(&mut self, mesh: &MeshData);
}

/// Source of the user's file selection
pub trait FilePicker {
    /// Skeleton definition file; a sibling `.atlas` must exist next to it
    fn current_file(&self) -> Option<PathBuf>;

    fn current_background(&self) -> Option<PathBuf>;

    /// Start a file import; results show up through later `current_*` calls
    fn import_files(&mut self);
}
