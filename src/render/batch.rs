//! CPU-side draw batching
//!
//! Meshes and quads are appended to one vertex and one index list per frame.
//! Consecutive draws sharing a texture and pipeline collapse into a single
//! command.

use std::ops::Range;

use crate::host::{BlendMode, MeshData, MeshVertex};
use crate::render::pipeline::batch::PipelineKey;
use crate::viewer::layout::Rect;

/// One indexed draw call
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub texture: u64,
    pub key: PipelineKey,
    pub indices: Range<u32>,
}

/// Geometry collected for one frame
#[derive(Debug, Default)]
pub struct DrawBatch {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    commands: Vec<DrawCommand>,
}

impl DrawBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.commands.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Append a skeleton mesh drawn with `texture`
    ///
    /// Indices past the mesh's vertices and trailing partial triangles are
    /// dropped. Premultiplied meshes get their tint premultiplied too.
    pub fn push_mesh(&mut self, texture: u64, mesh: &MeshData) {
        let vertex_count = mesh.vertices.len();
        let base = self.vertices.len() as u32;
        let key = PipelineKey {
            blend_mode: mesh.blend_mode,
            premultiplied_alpha: mesh.premultiplied_alpha,
        };

        let start = self.indices.len() as u32;
        for triangle in mesh.indices.chunks_exact(3) {
            if triangle.iter().all(|&i| (i as usize) < vertex_count) {
                self.indices.extend(triangle.iter().map(|&i| base + i as u32));
            }
        }
        if self.indices.len() as u32 == start {
            return;
        }

        self.vertices.extend(mesh.vertices.iter().map(|v| {
            if mesh.premultiplied_alpha {
                premultiply(*v)
            } else {
                *v
            }
        }));
        self.push_command(texture, key, start);
    }

    /// Append an untinted textured rectangle, image top at the rect's top
    pub fn push_quad(&mut self, texture: u64, rect: Rect) {
        let base = self.vertices.len() as u32;
        let (x0, y0) = (rect.x, rect.y);
        let (x1, y1) = (rect.x + rect.width, rect.y + rect.height);
        let white = [1.0; 4];

        self.vertices.extend([
            MeshVertex { position: [x0, y0], uv: [0.0, 1.0], color: white },
            MeshVertex { position: [x1, y0], uv: [1.0, 1.0], color: white },
            MeshVertex { position: [x1, y1], uv: [1.0, 0.0], color: white },
            MeshVertex { position: [x0, y1], uv: [0.0, 0.0], color: white },
        ]);

        let start = self.indices.len() as u32;
        self.indices.extend([0, 1, 2, 2, 3, 0].map(|i| base + i));
        let key = PipelineKey { blend_mode: BlendMode::Normal, premultiplied_alpha: false };
        self.push_command(texture, key, start);
    }

    fn push_command(&mut self, texture: u64, key: PipelineKey, start: u32) {
        let end = self.indices.len() as u32;
        if let Some(last) = self.commands.last_mut() {
            if last.texture == texture && last.key == key && last.indices.end == start {
                last.indices.end = end;
                return;
            }
        }
        self.commands.push(DrawCommand { texture, key, indices: start..end });
    }
}

fn premultiply(mut vertex: MeshVertex) -> MeshVertex {
    let alpha = vertex.color[3];
    for channel in &mut vertex.color[..3] {
        *channel *= alpha;
    }
    vertex
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(blend_mode: BlendMode, premultiplied_alpha: bool) -> MeshData {
        MeshData {
            vertices: vec![
                MeshVertex { color: [1.0, 0.5, 0.25, 0.5], ..Default::default() };
                3
            ],
            indices: vec![0, 1, 2],
            texture: None,
            blend_mode,
            premultiplied_alpha,
        }
    }

    #[test]
    fn test_consecutive_meshes_merge() {
        let mut batch = DrawBatch::new();
        batch.push_mesh(1, &triangle(BlendMode::Normal, false));
        batch.push_mesh(1, &triangle(BlendMode::Normal, false));

        assert_eq!(batch.commands().len(), 1);
        assert_eq!(batch.commands()[0].indices, 0..6);
        assert_eq!(batch.indices(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_state_change_splits_commands() {
        let mut batch = DrawBatch::new();
        batch.push_mesh(1, &triangle(BlendMode::Normal, false));
        batch.push_mesh(2, &triangle(BlendMode::Normal, false));
        batch.push_mesh(2, &triangle(BlendMode::Additive, false));

        let commands = batch.commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[1].texture, 2);
        assert_eq!(commands[2].key.blend_mode, BlendMode::Additive);
        assert_eq!(commands[2].indices, 6..9);
    }

    #[test]
    fn test_premultiplied_tint() {
        let mut batch = DrawBatch::new();
        batch.push_mesh(1, &triangle(BlendMode::Normal, true));
        assert_eq!(batch.vertices()[0].color, [0.5, 0.25, 0.125, 0.5]);

        batch.clear();
        batch.push_mesh(1, &triangle(BlendMode::Normal, false));
        assert_eq!(batch.vertices()[0].color, [1.0, 0.5, 0.25, 0.5]);
    }

    #[test]
    fn test_out_of_range_indices_are_dropped() {
        let mut mesh = triangle(BlendMode::Normal, false);
        mesh.indices = vec![0, 1, 7, 2, 1];

        let mut batch = DrawBatch::new();
        batch.push_mesh(1, &mesh);
        assert!(batch.is_empty());
        assert!(batch.vertices().is_empty());
    }

    #[test]
    fn test_quad_covers_rect() {
        let mut batch = DrawBatch::new();
        batch.push_quad(9, Rect::new(-100.0, 0.0, 600.0, 300.0));

        let positions: Vec<[f32; 2]> = batch.vertices().iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![[-100.0, 0.0], [500.0, 0.0], [500.0, 300.0], [-100.0, 300.0]]);
        // Top edge samples the first image row
        assert_eq!(batch.vertices()[2].uv, [1.0, 0.0]);
        assert_eq!(batch.commands()[0].indices, 0..6);
    }
}
