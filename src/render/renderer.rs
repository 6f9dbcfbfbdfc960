//! Render host backed by wgpu
//!
//! Draw calls are collected into a [`DrawBatch`] during the frame and
//! submitted in one render pass by [`ViewerRenderer::render`].

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use glam::Vec2;
use wgpu::util::DeviceExt;

use crate::core::Result;
use crate::host::{MeshData, RenderHost, Texture};
use crate::render::batch::DrawBatch;
use crate::render::buffer::ScreenBuffer;
use crate::render::context::GpuContext;
use crate::render::pipeline::batch::BatchPipeline;
use crate::render::texture::{GpuTexture, TextureBinder};
use crate::viewer::layout::Rect;

pub struct ViewerRenderer {
    context: GpuContext,
    screen: ScreenBuffer,
    binder: TextureBinder,
    pipeline: BatchPipeline,
    white: GpuTexture,
    /// Atlas pages by image path
    pages: HashMap<PathBuf, GpuTexture>,
    /// Pages that failed to load, so the error is logged once
    failed_pages: HashSet<PathBuf>,
    batch: DrawBatch,
    /// Bind groups referenced by this frame's batch, by texture id
    frame_textures: HashMap<u64, wgpu::BindGroup>,
    clear_color: wgpu::Color,
}

impl ViewerRenderer {
    pub fn new(context: GpuContext) -> Self {
        let screen = ScreenBuffer::new(&context.device);
        let binder = TextureBinder::new(&context.device);
        let pipeline = BatchPipeline::new(
            &context.device,
            context.format(),
            screen.bind_group_layout(),
            binder.bind_group_layout(),
        );
        let white = binder.white(&context.device, &context.queue);

        let (width, height) = context.size();
        log::info!("Renderer ready: {:?} surface, {}x{}", context.format(), width, height);

        Self {
            context,
            screen,
            binder,
            pipeline,
            white,
            pages: HashMap::new(),
            failed_pages: HashSet::new(),
            batch: DrawBatch::new(),
            frame_textures: HashMap::new(),
            clear_color: wgpu::Color::BLACK,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
    }

    fn page_texture(&mut self, path: &Path) -> Option<&GpuTexture> {
        if !self.pages.contains_key(path) {
            if self.failed_pages.contains(path) {
                return None;
            }
            match self.binder.load(&self.context.device, &self.context.queue, path) {
                Ok(texture) => {
                    log::debug!("Loaded atlas page {} ({}x{})", path.display(), texture.width(), texture.height());
                    self.pages.insert(path.to_path_buf(), texture);
                }
                Err(e) => {
                    log::error!("Failed to load atlas page: {}", e);
                    self.failed_pages.insert(path.to_path_buf());
                    return None;
                }
            }
        }
        self.pages.get(path)
    }

    /// Submit the frame's batch and present it
    pub fn render(&mut self) -> Result<()> {
        let frame = match self.context.get_current_texture() {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                self.context.reconfigure();
                self.end_frame();
                return Ok(());
            }
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.screen.update(&self.context.queue, self.screen_size());

        let buffers = (!self.batch.is_empty()).then(|| {
            let device = &self.context.device;
            let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("batch_vertices"),
                contents: bytemuck::cast_slice(self.batch.vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("batch_indices"),
                contents: bytemuck::cast_slice(self.batch.indices()),
                usage: wgpu::BufferUsages::INDEX,
            });
            (vertices, indices)
        });

        let mut encoder = self.context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("viewer_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("viewer_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some((vertices, indices)) = &buffers {
                pass.set_bind_group(0, self.screen.bind_group(), &[]);
                pass.set_vertex_buffer(0, vertices.slice(..));
                pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);

                for command in self.batch.commands() {
                    let (Some(pipeline), Some(bind_group)) =
                        (self.pipeline.get(command.key), self.frame_textures.get(&command.texture))
                    else {
                        continue;
                    };
                    pass.set_pipeline(pipeline);
                    pass.set_bind_group(1, bind_group, &[]);
                    pass.draw_indexed(command.indices.clone(), 0, 0..1);
                }
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        self.end_frame();
        Ok(())
    }

    fn end_frame(&mut self) {
        self.batch.clear();
        self.frame_textures.clear();
    }
}

impl RenderHost for ViewerRenderer {
    type Texture = GpuTexture;

    fn screen_size(&self) -> Vec2 {
        let (width, height) = self.context.size();
        Vec2::new(width as f32, height as f32)
    }

    fn load_texture(&mut self, path: &Path) -> Result<GpuTexture> {
        self.binder.load(&self.context.device, &self.context.queue, path)
    }

    fn release_texture(&mut self, texture: GpuTexture) {
        texture.destroy();
    }

    fn release_mesh_textures(&mut self) {
        let count = self.pages.len();
        for (_, texture) in self.pages.drain() {
            texture.destroy();
        }
        self.failed_pages.clear();
        log::debug!("Released {} atlas pages", count);
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.end_frame();
        self.clear_color = wgpu::Color {
            r: color[0] as f64,
            g: color[1] as f64,
            b: color[2] as f64,
            a: color[3] as f64,
        };
    }

    fn draw_texture(&mut self, texture: &GpuTexture, rect: Rect) {
        self.frame_textures.insert(texture.id(), texture.bind_group().clone());
        self.batch.push_quad(texture.id(), rect);
    }

    fn draw_mesh(&mut self, mesh: &MeshData) {
        let texture = match &mesh.texture {
            Some(path) => match self.page_texture(path) {
                Some(texture) => texture,
                None => return,
            },
            None => &self.white,
        };
        let (id, bind_group) = (texture.id(), texture.bind_group().clone());
        self.frame_textures.insert(id, bind_group);
        self.batch.push_mesh(id, mesh);
    }
}
