//! In-memory collaborators for controller tests

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use glam::Vec2;

use crate::core::{Error, Result};
use crate::host::{
    AnimationEngine, FilePicker, MeshData, MeshVertex, PhysicsMode, PosedSkeleton, RenderHost,
    Texture,
};
use crate::viewer::layout::Rect;
use crate::viewer::source::SkeletonSource;

#[derive(Debug, Default)]
pub struct MockPose {
    pub skins: Vec<String>,
    pub animations: Vec<String>,
    pub active_skin: Option<usize>,
    pub active_animation: Option<(usize, bool)>,
    pub setup_pose_resets: usize,
    pub updates: Vec<(f32, PhysicsMode)>,
    pub position: Vec2,
    pub scale: f32,
}

impl MockPose {
    pub fn with_counts(skins: usize, animations: usize) -> Self {
        Self {
            skins: (0..skins).map(|i| format!("skin-{i}")).collect(),
            animations: (0..animations).map(|i| format!("anim-{i}")).collect(),
            scale: 1.0,
            ..Default::default()
        }
    }
}

impl PosedSkeleton for MockPose {
    fn skin_names(&self) -> Vec<String> {
        self.skins.clone()
    }

    fn animation_names(&self) -> Vec<String> {
        self.animations.clone()
    }

    fn set_skin(&mut self, index: usize) -> Result<()> {
        if index >= self.skins.len() {
            return Err(Error::Engine(format!("no skin {index}")));
        }
        self.active_skin = Some(index);
        Ok(())
    }

    fn set_slots_to_setup_pose(&mut self) {
        self.setup_pose_resets += 1;
    }

    fn set_animation(&mut self, index: usize, looping: bool) -> Result<()> {
        if index >= self.animations.len() {
            return Err(Error::Engine(format!("no animation {index}")));
        }
        self.active_animation = Some((index, looping));
        Ok(())
    }

    fn update(&mut self, delta_seconds: f32, physics: PhysicsMode) {
        self.updates.push((delta_seconds, physics));
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn meshes(&self) -> Vec<MeshData> {
        vec![MeshData {
            vertices: vec![MeshVertex::default(); 3],
            indices: vec![0, 1, 2],
            texture: Some(PathBuf::from("page.png")),
            ..Default::default()
        }]
    }
}

/// Engine producing [`MockPose`]s with configurable counts per file
#[derive(Debug)]
pub struct MockEngine {
    pub loads: Vec<SkeletonSource>,
    pub failing: HashSet<PathBuf>,
    pub counts: HashMap<PathBuf, (usize, usize)>,
    pub default_counts: (usize, usize),
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            loads: Vec::new(),
            failing: HashSet::new(),
            counts: HashMap::new(),
            default_counts: (3, 2),
        }
    }
}

impl AnimationEngine for MockEngine {
    type Pose = MockPose;

    fn load(&mut self, source: &SkeletonSource) -> Result<MockPose> {
        self.loads.push(source.clone());
        if self.failing.contains(&source.skeleton) {
            return Err(Error::MissingFile(source.atlas.clone()));
        }
        let (skins, animations) = self
            .counts
            .get(&source.skeleton)
            .copied()
            .unwrap_or(self.default_counts);
        Ok(MockPose::with_counts(skins, animations))
    }
}

#[derive(Debug, Default)]
pub struct MockPicker {
    pub file: Option<PathBuf>,
    pub background: Option<PathBuf>,
    pub imports: usize,
}

impl FilePicker for MockPicker {
    fn current_file(&self) -> Option<PathBuf> {
        self.file.clone()
    }

    fn current_background(&self) -> Option<PathBuf> {
        self.background.clone()
    }

    fn import_files(&mut self) {
        self.imports += 1;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockTexture {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Texture for MockTexture {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear([f32; 4]),
    Texture(PathBuf, Rect),
    Mesh(Option<PathBuf>),
}

#[derive(Debug)]
pub struct MockHost {
    pub screen: Vec2,
    pub texture_size: (u32, u32),
    pub failing_textures: HashSet<PathBuf>,
    pub textures_loaded: Vec<PathBuf>,
    pub textures_released: Vec<PathBuf>,
    pub mesh_texture_releases: usize,
    pub calls: Vec<DrawCall>,
}

impl MockHost {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            screen: Vec2::new(width, height),
            texture_size: (100, 50),
            failing_textures: HashSet::new(),
            textures_loaded: Vec::new(),
            textures_released: Vec::new(),
            mesh_texture_releases: 0,
            calls: Vec::new(),
        }
    }
}

impl RenderHost for MockHost {
    type Texture = MockTexture;

    fn screen_size(&self) -> Vec2 {
        self.screen
    }

    fn load_texture(&mut self, path: &Path) -> Result<MockTexture> {
        if self.failing_textures.contains(path) {
            return Err(Error::Texture(format!("cannot decode {}", path.display())));
        }
        self.textures_loaded.push(path.to_path_buf());
        Ok(MockTexture {
            path: path.to_path_buf(),
            width: self.texture_size.0,
            height: self.texture_size.1,
        })
    }

    fn release_texture(&mut self, texture: MockTexture) {
        self.textures_released.push(texture.path);
    }

    fn release_mesh_textures(&mut self) {
        self.mesh_texture_releases += 1;
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.calls.push(DrawCall::Clear(color));
    }

    fn draw_texture(&mut self, texture: &MockTexture, rect: Rect) {
        self.calls.push(DrawCall::Texture(texture.path.clone(), rect));
    }

    fn draw_mesh(&mut self, mesh: &MeshData) {
        self.calls.push(DrawCall::Mesh(mesh.texture.clone()));
    }
}
