//! Spine Viewer - view Spine skeletons on top of a background image
//!
//! Usage:
//!   cargo run --release --features spine -- --file <skeleton.skel|json>
//!   cargo run --release --features spine -- --file <path> --background <image>
//!   cargo run --release --features spine -- --import-dir <dir> --config <viewer.json>
//!
//! Controls:
//!   Tap left edge - Import files
//!   Tap - Next skin
//!   Long press - Next animation
//!   Drag - Move skeleton
//!   Pinch / mouse wheel - Zoom
//!   Drop files - Select skeleton or background
//!   O - Import files
//!   Escape - Exit

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::KeyCode,
    window::{Window, WindowId},
};

use spine_viewer::core::{
    input::{InputState, PointerEvent},
    logging,
    time::FrameTimer,
};
use spine_viewer::gesture::GestureDetector;
use spine_viewer::host::FilePicker;
use spine_viewer::picker::DesktopFilePicker;
use spine_viewer::render::{context::GpuContext, ViewerRenderer};
use spine_viewer::spine::SpineEngine;
use spine_viewer::viewer::{FrameTickable, ViewerConfig, ViewerController};

type Controller = ViewerController<SpineEngine, DesktopFilePicker, ViewerRenderer>;

struct App {
    config: ViewerConfig,
    controller: Controller,
    window: Option<Arc<Window>>,
    renderer: Option<ViewerRenderer>,
    input: InputState,
    detector: GestureDetector,
    timer: FrameTimer,
    title: String,
}

impl App {
    fn new(config: ViewerConfig, picker: DesktopFilePicker) -> Self {
        let controller = ViewerController::new(config.clone(), SpineEngine::new(), picker);
        Self {
            detector: GestureDetector::new(config.gesture.clone()),
            title: config.window.title.clone(),
            config,
            controller,
            window: None,
            renderer: None,
            input: InputState::new(),
            timer: FrameTimer::new(),
        }
    }

    /// Pick up selection changes from the picker
    fn sync_selection(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else { return };
        self.controller.resume(renderer);

        let title = self.config.window.title_for(self.controller.session().current_file());
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Wheel { lines } => {
                self.controller.wheel_zoom(lines);
            }
            other => {
                other.dispatch(&mut self.detector, &mut self.controller, Instant::now());
            }
        }
        if self.controller.take_import_request() {
            self.sync_selection();
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_mut() {
            self.controller.dispose(renderer);
        }
        event_loop.exit();
    }

    fn redraw(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else { return };

        self.timer.tick();
        self.controller.frame(self.timer.delta_secs(), renderer);
        if let Err(e) = renderer.render() {
            log::error!("Render failed: {}", e);
        }

        if self.timer.frame_count() % 600 == 0 {
            log::debug!("FPS: {:.1}", self.timer.fps());
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            self.sync_selection();
            return;
        }

        let window = match event_loop.create_window(self.config.window.attributes()) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let gpu = match pollster::block_on(GpuContext::new(window)) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("Failed to create GPU context: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.renderer = Some(ViewerRenderer::new(gpu));
        self.timer = FrameTimer::new();
        self.sync_selection();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(pointer) = self.input.process_event(&event) {
            self.handle_pointer(pointer);
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(focused) => {
                log::debug!("Window focus changed: {}", focused);
                if focused {
                    self.sync_selection();
                } else {
                    self.detector.cancel();
                }
            }
            WindowEvent::DroppedFile(path) => {
                if self.controller.picker_mut().accept_dropped(&path).is_some() {
                    self.sync_selection();
                } else {
                    log::warn!("Ignoring dropped file {}", path.display());
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.input.is_key_just_pressed(KeyCode::Escape) {
            self.shutdown(event_loop);
            return;
        }
        if self.input.is_key_just_pressed(KeyCode::KeyO) {
            self.controller.picker_mut().import_files();
            self.sync_selection();
        }
        self.input.end_frame();

        if self.detector.update(&mut self.controller, Instant::now()) {
            log::debug!("Long press handled");
        }

        // Request redraw to keep animating
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn arg_path(args: &[String], flag: &str) -> Option<PathBuf> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}

fn main() {
    logging::init();
    log::info!("Spine Viewer starting...");

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let config = match arg_path(&args, "--config") {
        Some(path) => ViewerConfig::load(&path).unwrap_or_else(|e| {
            log::error!("Failed to load config {}: {}, using defaults", path.display(), e);
            ViewerConfig::default()
        }),
        None => ViewerConfig::default(),
    };

    let picker = DesktopFilePicker::new(
        arg_path(&args, "--file"),
        arg_path(&args, "--background"),
        arg_path(&args, "--import-dir"),
    );
    if picker.current_file().is_none() {
        log::info!("No skeleton selected: tap the left edge, press O or drop a file");
    }

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = App::new(config, picker);

    event_loop.run_app(&mut app).expect("Event loop error");
}
