//! Viewer session controller
//!
//! Translates lifecycle callbacks and gestures into session transitions and
//! draw calls. All animation work is delegated to the [`AnimationEngine`],
//! all drawing to the [`RenderHost`].

use std::path::Path;

use glam::Vec2;

use crate::core::Result;
use crate::gesture::{GestureHandler, PointerButton};
use crate::host::{AnimationEngine, FilePicker, PosedSkeleton, RenderHost, Texture};
use crate::viewer::config::ViewerConfig;
use crate::viewer::layout::cover_rect;
use crate::viewer::session::{LoadedSkeleton, SessionState, ViewerSession};
use crate::viewer::source::SkeletonSource;

/// Something driven once per frame by the host
pub trait FrameTickable<H> {
    fn frame(&mut self, delta_seconds: f32, host: &mut H);
}

/// Owns the viewer session and its collaborators
pub struct ViewerController<E, F, H>
where
    E: AnimationEngine,
    F: FilePicker,
    H: RenderHost,
{
    config: ViewerConfig,
    engine: E,
    picker: F,
    session: ViewerSession<E::Pose, H::Texture>,
    /// Set when a tap asked the picker for files
    import_requested: bool,
}

impl<E, F, H> ViewerController<E, F, H>
where
    E: AnimationEngine,
    F: FilePicker,
    H: RenderHost,
{
    pub fn new(config: ViewerConfig, engine: E, picker: F) -> Self {
        Self {
            config,
            engine,
            picker,
            session: ViewerSession::new(),
            import_requested: false,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn session(&self) -> &ViewerSession<E::Pose, H::Texture> {
        &self.session
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn picker(&self) -> &F {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut F {
        &mut self.picker
    }

    /// Whether a tap requested an import since the last call
    ///
    /// The host resumes the session after an import so the new selection is
    /// picked up.
    pub fn take_import_request(&mut self) -> bool {
        std::mem::take(&mut self.import_requested)
    }

    /// Reconcile the session with the picker's current selection
    ///
    /// Called when the application resumes or regains focus. Only changed
    /// paths cause I/O.
    pub fn resume(&mut self, host: &mut H) {
        let reported_file = self.picker.current_file();
        if reported_file != self.session.current_file {
            self.session.current_file = reported_file;
            let file = self.session.current_file.clone();
            self.load_skeleton(file.as_deref(), host);
        }

        let reported_background = self.picker.current_background();
        if reported_background != self.session.current_background {
            self.session.current_background = reported_background;
            let background = self.session.current_background.clone();
            self.load_background(background.as_deref(), host);
        }
    }

    /// Release everything the session owns
    ///
    /// A later [`resume`](Self::resume) reloads the picker's selection from
    /// scratch.
    pub fn dispose(&mut self, host: &mut H) {
        if let Some(texture) = self.session.background.take() {
            host.release_texture(texture);
        }
        if let SessionState::Loaded(_) = std::mem::replace(&mut self.session.state, SessionState::Empty) {
            host.release_mesh_textures();
        }
        self.session.current_file = None;
        self.session.current_background = None;
        log::debug!("Viewer session disposed");
    }

    /// Zoom by scrolled mouse wheel lines, as one complete pinch
    pub fn wheel_zoom(&mut self, lines: f32) -> bool {
        if self.session.loaded().is_none() || !lines.is_finite() {
            return false;
        }
        let factor = (1.0 + self.config.wheel_zoom_step * lines).max(0.01);
        self.zoom(1.0, factor);
        self.pinch_stop();
        true
    }

    fn load_skeleton(&mut self, file: Option<&Path>, host: &mut H) {
        // The old pose goes before the new one is created.
        if let SessionState::Loaded(_) = std::mem::replace(&mut self.session.state, SessionState::Empty) {
            host.release_mesh_textures();
        }

        let Some(file) = file else {
            log::info!("Skeleton selection cleared");
            return;
        };

        let source = SkeletonSource::from_path(file);
        log::info!("Loading skeleton {} ({:?})", source.skeleton.display(), source.format);

        let loaded = self
            .engine
            .load(&source)
            .and_then(|pose| Self::prepare(pose, host.screen_size()));

        match loaded {
            Ok(loaded) => {
                log::info!(
                    "Loaded {}: {} skins, {} animations",
                    source.skeleton.display(),
                    loaded.skin_count(),
                    loaded.animation_count()
                );
                self.session.state = SessionState::Loaded(loaded);
                self.session.last_applied_scale = 1.0;
                self.session.last_error = None;
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", source.skeleton.display(), e);
                self.session.last_error = Some(e.to_string());
            }
        }
        log::debug!("Session phase: {:?}", self.session.phase());
    }

    /// Put a fresh pose into its initial state: centered, unscaled, first
    /// skin and first animation looping
    fn prepare(pose: E::Pose, screen: Vec2) -> Result<LoadedSkeleton<E::Pose>> {
        let mut loaded = LoadedSkeleton::new(pose);
        let skin_count = loaded.skin_count();
        let animation_count = loaded.animation_count();

        let pose = loaded.pose_mut();
        pose.set_position(screen / 2.0);
        pose.set_scale(1.0);
        if skin_count > 0 {
            pose.set_skin(0)?;
        }
        pose.set_slots_to_setup_pose();
        if animation_count > 0 {
            pose.set_animation(0, true)?;
        }
        Ok(loaded)
    }

    fn load_background(&mut self, path: Option<&Path>, host: &mut H) {
        if let Some(old) = self.session.background.take() {
            host.release_texture(old);
        }

        let Some(path) = path else {
            log::info!("Background cleared");
            return;
        };

        match host.load_texture(path) {
            Ok(texture) => {
                log::info!(
                    "Loaded background {} ({}x{})",
                    path.display(),
                    texture.width(),
                    texture.height()
                );
                self.session.background = Some(texture);
            }
            Err(e) => log::error!("Failed to load background {}: {}", path.display(), e),
        }
    }
}

impl<E, F, H> FrameTickable<H> for ViewerController<E, F, H>
where
    E: AnimationEngine,
    F: FilePicker,
    H: RenderHost,
{
    fn frame(&mut self, delta_seconds: f32, host: &mut H) {
        host.clear(self.config.clear_color);

        let physics = self.config.physics;
        if let Some(loaded) = self.session.loaded_mut() {
            loaded.pose_mut().update(delta_seconds.max(0.0), physics);
        }

        if let Some(background) = &self.session.background {
            if let Some(rect) = cover_rect(background.size(), host.screen_size()) {
                host.draw_texture(background, rect);
            }
        }

        if let Some(pose) = self.session.pose() {
            for mesh in pose.meshes().iter().filter(|m| !m.is_empty()) {
                host.draw_mesh(mesh);
            }
        }
    }
}

impl<E, F, H> GestureHandler for ViewerController<E, F, H>
where
    E: AnimationEngine,
    F: FilePicker,
    H: RenderHost,
{
    /// Outside the left hot zone a tap cycles skins; inside it, or with no
    /// file selected, it asks the picker for new files.
    fn tap(&mut self, x: f32, _y: f32, _count: u32, _button: PointerButton) -> bool {
        if self.session.is_file_selected() && x > self.config.hot_zone_width {
            let Some(loaded) = self.session.loaded_mut() else {
                return false;
            };
            let Some(index) = loaded.next_skin() else {
                return false;
            };
            let pose = loaded.pose_mut();
            if let Err(e) = pose.set_skin(index) {
                log::warn!("Cannot switch to skin {}: {}", index, e);
                return false;
            }
            pose.set_slots_to_setup_pose();
            log::debug!("Skin {} selected", index);
            return true;
        }

        log::info!("Requesting file import");
        self.picker.import_files();
        self.import_requested = true;
        true
    }

    fn long_press(&mut self, _x: f32, _y: f32) -> bool {
        let Some(loaded) = self.session.loaded_mut() else {
            return false;
        };
        let Some(index) = loaded.next_animation() else {
            return false;
        };
        match loaded.pose_mut().set_animation(index, true) {
            Ok(()) => {
                log::debug!("Animation {} selected", index);
                true
            }
            Err(e) => {
                log::warn!("Cannot switch to animation {}: {}", index, e);
                false
            }
        }
    }

    /// Screen y grows downwards, world y upwards.
    fn pan(&mut self, _x: f32, _y: f32, delta_x: f32, delta_y: f32) -> bool {
        let Some(loaded) = self.session.loaded_mut() else {
            return false;
        };
        let pose = loaded.pose_mut();
        pose.set_position(pose.position() + Vec2::new(delta_x, -delta_y));
        true
    }

    fn zoom(&mut self, initial_distance: f32, distance: f32) -> bool {
        let base = self.session.last_applied_scale;
        let Some(loaded) = self.session.loaded_mut() else {
            return false;
        };

        let ratio = if initial_distance > 0.0 && initial_distance.is_finite() {
            distance / initial_distance
        } else {
            1.0
        };
        let ratio = if ratio.is_finite() { ratio } else { 1.0 };
        let scale = self.config.clamp_scale(base * ratio);
        loaded.pose_mut().set_scale(scale);
        false
    }

    fn pinch_stop(&mut self) {
        if let Some(pose) = self.session.pose() {
            self.session.last_applied_scale = pose.scale();
        }
    }
}
