//! Textured triangle pipelines, one per blend state

use std::collections::HashMap;

use crate::host::{BlendMode, MeshVertex};

/// Blend mode plus whether colors arrive premultiplied by alpha
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub blend_mode: BlendMode,
    pub premultiplied_alpha: bool,
}

impl PipelineKey {
    pub const ALL: [PipelineKey; 8] = [
        PipelineKey { blend_mode: BlendMode::Normal, premultiplied_alpha: false },
        PipelineKey { blend_mode: BlendMode::Normal, premultiplied_alpha: true },
        PipelineKey { blend_mode: BlendMode::Additive, premultiplied_alpha: false },
        PipelineKey { blend_mode: BlendMode::Additive, premultiplied_alpha: true },
        PipelineKey { blend_mode: BlendMode::Multiply, premultiplied_alpha: false },
        PipelineKey { blend_mode: BlendMode::Multiply, premultiplied_alpha: true },
        PipelineKey { blend_mode: BlendMode::Screen, premultiplied_alpha: false },
        PipelineKey { blend_mode: BlendMode::Screen, premultiplied_alpha: true },
    ];

    /// Blend state matching the slot blend modes of the runtime
    pub fn blend_state(&self) -> wgpu::BlendState {
        use wgpu::BlendFactor::*;

        let source = if self.premultiplied_alpha { One } else { SrcAlpha };
        let (src_factor, dst_factor) = match self.blend_mode {
            BlendMode::Normal => (source, OneMinusSrcAlpha),
            BlendMode::Additive => (source, One),
            BlendMode::Multiply => (Dst, OneMinusSrcAlpha),
            BlendMode::Screen => (One, OneMinusSrc),
        };

        wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor,
                dst_factor,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: One,
                dst_factor: OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
        }
    }
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

/// Render pipelines for every [`PipelineKey`]
pub struct BatchPipeline {
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

impl BatchPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        screen_layout: &wgpu::BindGroupLayout,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("batch_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/batch.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("batch_pipeline_layout"),
            bind_group_layouts: &[screen_layout, texture_layout],
            immediate_size: 0,
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRIBUTES,
        };

        let pipelines = PipelineKey::ALL
            .iter()
            .map(|key| {
                let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("batch_pipeline"),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        buffers: &[vertex_layout.clone()],
                        compilation_options: Default::default(),
                    },
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        // Mirrored attachments flip winding
                        cull_mode: None,
                        ..Default::default()
                    },
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState::default(),
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some("fs_main"),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: surface_format,
                            blend: Some(key.blend_state()),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                        compilation_options: Default::default(),
                    }),
                    multiview_mask: None,
                    cache: None,
                });
                (*key, pipeline)
            })
            .collect();

        Self { pipelines }
    }

    pub fn get(&self, key: PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::BlendFactor;

    #[test]
    fn test_normal_blend_respects_premultiplication() {
        let straight = PipelineKey { blend_mode: BlendMode::Normal, premultiplied_alpha: false };
        let pma = PipelineKey { blend_mode: BlendMode::Normal, premultiplied_alpha: true };

        assert_eq!(straight.blend_state().color.src_factor, BlendFactor::SrcAlpha);
        assert_eq!(pma.blend_state().color.src_factor, BlendFactor::One);
        assert_eq!(pma.blend_state().color.dst_factor, BlendFactor::OneMinusSrcAlpha);
    }

    #[test]
    fn test_additive_and_screen() {
        let additive = PipelineKey { blend_mode: BlendMode::Additive, premultiplied_alpha: true };
        assert_eq!(additive.blend_state().color.dst_factor, BlendFactor::One);

        let screen = PipelineKey { blend_mode: BlendMode::Screen, premultiplied_alpha: false };
        assert_eq!(screen.blend_state().color.src_factor, BlendFactor::One);
        assert_eq!(screen.blend_state().color.dst_factor, BlendFactor::OneMinusSrc);
    }

    #[test]
    fn test_all_keys_are_distinct() {
        let unique: std::collections::HashSet<_> = PipelineKey::ALL.iter().collect();
        assert_eq!(unique.len(), PipelineKey::ALL.len());
    }
}
