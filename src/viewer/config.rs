//! Viewer configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::gesture::GestureConfig;
use crate::host::PhysicsMode;
use crate::render::window::WindowConfig;

/// Tunables for the viewer session and its host
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Width in pixels of the left-edge strip where taps always import files
    pub hot_zone_width: f32,
    /// Lower bound of the pinch scale
    pub min_scale: f32,
    /// Upper bound of the pinch scale
    pub max_scale: f32,
    /// Color the screen is cleared to every frame (RGBA)
    pub clear_color: [f32; 4],
    /// Physics mode passed to every pose update
    pub physics: PhysicsMode,
    /// Mouse wheel zoom factor per scrolled line
    pub wheel_zoom_step: f32,
    pub gesture: GestureConfig,
    pub window: WindowConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            hot_zone_width: 128.0,
            min_scale: 0.5,
            max_scale: 8.0,
            clear_color: [0.15, 0.15, 0.2, 1.0],
            physics: PhysicsMode::Update,
            wheel_zoom_step: 0.1,
            gesture: GestureConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Clamp a pinch scale into the configured range
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        let (lo, hi) = if self.min_scale <= self.max_scale {
            (self.min_scale, self.max_scale)
        } else {
            (self.max_scale, self.min_scale)
        };
        scale.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{ "hot_zone_width": 200.0, "gesture": { "long_press_duration": 0.5 } }"#)
                .expect("parse failed");
        assert_eq!(config.hot_zone_width, 200.0);
        assert_eq!(config.max_scale, 8.0);
        assert_eq!(config.gesture.long_press_duration, 0.5);
        assert_eq!(config.gesture.tap_square_size, 20.0);
        assert_eq!(config.physics, PhysicsMode::Update);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("nested").join("viewer.json");

        let config = ViewerConfig {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            physics: PhysicsMode::Pose,
            ..Default::default()
        };
        config.save(&path).expect("save failed");

        let loaded = ViewerConfig::load(&path).expect("load failed");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write failed");

        assert!(matches!(ViewerConfig::load(&path), Err(crate::core::Error::Config(_))));
    }

    #[test]
    fn test_clamp_scale() {
        let config = ViewerConfig::default();
        assert_eq!(config.clamp_scale(0.0), 0.5);
        assert_eq!(config.clamp_scale(3.0), 3.0);
        assert_eq!(config.clamp_scale(1e9), 8.0);

        let inverted = ViewerConfig { min_scale: 4.0, max_scale: 2.0, ..Default::default() };
        assert_eq!(inverted.clamp_scale(10.0), 4.0);
    }
}
