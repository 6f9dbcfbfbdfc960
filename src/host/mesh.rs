//! Mesh data handed from the animation engine to the render host

use std::path::PathBuf;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// One skinned vertex (must match the batch shader's vertex layout)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Position in world units (y up)
    pub position: [f32; 2],
    /// Texture coordinates (0..1, v down)
    pub uv: [f32; 2],
    /// RGBA tint, straight alpha
    pub color: [f32; 4],
}

/// Slot blend modes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    Normal,
    Additive,
    Multiply,
    Screen,
}

/// A batch of triangles sharing one texture and blend state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
    /// Atlas page image, `None` for untextured meshes
    pub texture: Option<PathBuf>,
    pub blend_mode: BlendMode,
    pub premultiplied_alpha: bool,
}

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() || self.vertices.is_empty()
    }
}
