//! GPU uniform buffer for the screen projection

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Screen uniform data for GPU (must match shader struct exactly)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct ScreenUniform {
    /// Drawable size in pixels (8 bytes, offset 0)
    pub size: [f32; 2],
    /// Padding to 16 bytes for uniform alignment
    pub _pad: [f32; 2],
}

impl ScreenUniform {
    pub fn new(size: Vec2) -> Self {
        Self {
            size: size.to_array(),
            _pad: [0.0; 2],
        }
    }
}

/// GPU buffer for the screen uniform
pub struct ScreenBuffer {
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl ScreenBuffer {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("screen_uniform"),
            size: std::mem::size_of::<ScreenUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("screen_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("screen_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    /// Update buffer with the current drawable size
    pub fn update(&self, queue: &wgpu::Queue, size: Vec2) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&ScreenUniform::new(size)));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<ScreenUniform>(), 16);
        assert_eq!(ScreenUniform::new(Vec2::new(720.0, 1280.0)).size, [720.0, 1280.0]);
    }
}
