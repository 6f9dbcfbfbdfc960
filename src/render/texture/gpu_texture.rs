//! Sampled RGBA textures and their bind groups

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::error::Error;
use crate::core::Result;
use crate::host::Texture;

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// An uploaded texture, ready to bind for drawing
pub struct GpuTexture {
    id: u64,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl GpuTexture {
    /// Unique id for batching draws that share this texture
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Free GPU memory now rather than when the last reference drops
    pub fn destroy(self) {
        self.texture.destroy();
    }
}

impl Texture for GpuTexture {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// Creates textures sharing one bind group layout and sampler
pub struct TextureBinder {
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl TextureBinder {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            bind_group_layout,
            sampler,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Decode an image file and upload it as RGBA8
    pub fn load(&self, device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> Result<GpuTexture> {
        if !path.is_file() {
            return Err(Error::MissingFile(path.to_path_buf()));
        }
        let image = image::open(path)
            .map_err(|e| Error::Texture(format!("{}: {}", path.display(), e)))?
            .to_rgba8();
        let (width, height) = image.dimensions();

        let max = device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(Error::Texture(format!(
                "{}: {}x{} exceeds the GPU limit of {}",
                path.display(),
                width,
                height,
                max
            )));
        }

        let label = path.file_name().map(|n| n.to_string_lossy().into_owned());
        Ok(self.upload(device, queue, label.as_deref(), width, height, image.as_raw()))
    }

    /// A 1x1 white texture for untextured meshes
    pub fn white(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> GpuTexture {
        self.upload(device, queue, Some("white"), 1, 1, &[255, 255, 255, 255])
    }

    /// Upload tightly packed RGBA8 pixels
    pub fn upload(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: Option<&str>,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> GpuTexture {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label,
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        GpuTexture {
            id: NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed),
            texture,
            bind_group,
            width,
            height,
        }
    }
}
