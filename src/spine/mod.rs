//! Animation engine backed by the Spine C runtime

use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec2;
use rusty_spine::controller::SkeletonController;
use rusty_spine::{AnimationStateData, Atlas, Physics, SkeletonBinary, SkeletonData, SkeletonJson};

use crate::core::error::Error;
use crate::core::Result;
use crate::host::{AnimationEngine, BlendMode, MeshData, MeshVertex, PhysicsMode, PosedSkeleton};
use crate::viewer::source::{SkeletonFormat, SkeletonSource};

/// Renderer object attached to every atlas page: the page image path
struct PageImage(PathBuf);

/// Loads skeletons with rusty_spine
pub struct SpineEngine;

impl SpineEngine {
    pub fn new() -> Self {
        rusty_spine::extension::set_create_texture_cb(|page, path| {
            page.renderer_object().set(PageImage(PathBuf::from(path)));
        });
        rusty_spine::extension::set_dispose_texture_cb(|page| unsafe {
            page.renderer_object().dispose::<PageImage>();
        });
        Self
    }
}

impl Default for SpineEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationEngine for SpineEngine {
    type Pose = SpinePose;

    fn load(&mut self, source: &SkeletonSource) -> Result<SpinePose> {
        if let Some(missing) = source.missing_file() {
            return Err(Error::MissingFile(missing.to_path_buf()));
        }

        let atlas = Arc::new(Atlas::new_from_file(&source.atlas).map_err(engine_error)?);
        let premultiplied_alpha = atlas.pages().any(|page| page.pma());

        let data = match source.format {
            SkeletonFormat::Binary => SkeletonBinary::new(atlas).read_skeleton_data_file(&source.skeleton),
            SkeletonFormat::Json => SkeletonJson::new(atlas).read_skeleton_data_file(&source.skeleton),
        }
        .map_err(engine_error)?;
        let data = Arc::new(data);

        let state_data = Arc::new(AnimationStateData::new(data.clone()));
        let mut controller = SkeletonController::new(data.clone(), state_data);
        controller.settings.premultiplied_alpha = premultiplied_alpha;

        Ok(SpinePose {
            skins: data.skins().map(|skin| skin.name().to_string()).collect(),
            animations: data.animations().map(|animation| animation.name().to_string()).collect(),
            controller,
        })
    }
}

fn engine_error(e: rusty_spine::SpineError) -> Error {
    Error::Engine(e.to_string())
}

/// A posed skeleton with its animation state
pub struct SpinePose {
    controller: SkeletonController,
    skins: Vec<String>,
    animations: Vec<String>,
}

impl PosedSkeleton for SpinePose {
    fn skin_names(&self) -> Vec<String> {
        self.skins.clone()
    }

    fn animation_names(&self) -> Vec<String> {
        self.animations.clone()
    }

    fn skin_count(&self) -> usize {
        self.skins.len()
    }

    fn animation_count(&self) -> usize {
        self.animations.len()
    }

    fn set_skin(&mut self, index: usize) -> Result<()> {
        let name = self
            .skins
            .get(index)
            .ok_or_else(|| Error::Engine(format!("No skin at index {}", index)))?;
        self.controller.skeleton.set_skin_by_name(name).map_err(engine_error)
    }

    fn set_slots_to_setup_pose(&mut self) {
        self.controller.skeleton.set_slots_to_setup_pose();
    }

    fn set_animation(&mut self, index: usize, looping: bool) -> Result<()> {
        let name = self
            .animations
            .get(index)
            .ok_or_else(|| Error::Engine(format!("No animation at index {}", index)))?;
        self.controller
            .animation_state
            .set_animation_by_name(0, name, looping)
            .map(|_| ())
            .map_err(engine_error)
    }

    fn update(&mut self, delta_seconds: f32, physics: PhysicsMode) {
        let physics = match physics {
            PhysicsMode::None => Physics::None,
            PhysicsMode::Reset => Physics::Reset,
            PhysicsMode::Update => Physics::Update,
            PhysicsMode::Pose => Physics::Pose,
        };
        self.controller.update(delta_seconds, physics);
    }

    fn position(&self) -> Vec2 {
        let skeleton = &self.controller.skeleton;
        Vec2::new(skeleton.x(), skeleton.y())
    }

    fn set_position(&mut self, position: Vec2) {
        let skeleton = &mut self.controller.skeleton;
        skeleton.set_x(position.x);
        skeleton.set_y(position.y);
    }

    fn scale(&self) -> f32 {
        self.controller.skeleton.scale_x()
    }

    fn set_scale(&mut self, scale: f32) {
        let skeleton = &mut self.controller.skeleton;
        skeleton.set_scale_x(scale);
        skeleton.set_scale_y(scale);
    }

    fn meshes(&self) -> Vec<MeshData> {
        self.controller
            .combined_renderables()
            .into_iter()
            .map(|renderable| {
                let vertices = renderable
                    .vertices
                    .iter()
                    .zip(&renderable.uvs)
                    .zip(&renderable.colors)
                    .map(|((position, uv), color)| MeshVertex {
                        position: *position,
                        uv: *uv,
                        color: *color,
                    })
                    .collect();

                // Set by the create-texture callback for every atlas page.
                let texture = renderable
                    .attachment_renderer_object
                    .map(|object| unsafe { &*(object as *const PageImage) }.0.clone());

                let blend_mode = match renderable.blend_mode {
                    rusty_spine::BlendMode::Normal => BlendMode::Normal,
                    rusty_spine::BlendMode::Additive => BlendMode::Additive,
                    rusty_spine::BlendMode::Multiply => BlendMode::Multiply,
                    rusty_spine::BlendMode::Screen => BlendMode::Screen,
                };

                MeshData {
                    vertices,
                    indices: renderable.indices,
                    texture,
                    blend_mode,
                    premultiplied_alpha: renderable.premultiplied_alpha,
                }
            })
            .collect()
    }
}
