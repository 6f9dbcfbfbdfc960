//! Window configuration for winit

use serde::{Deserialize, Serialize};
use winit::{dpi::PhysicalSize, window::WindowAttributes};

/// Window configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Spine Viewer".to_string(),
            width: 720,
            height: 1280,
        }
    }
}

impl WindowConfig {
    /// Attributes for creating the viewer window
    pub fn attributes(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(self.width.max(1), self.height.max(1)))
    }

    /// Title shown while `file` is selected
    pub fn title_for(&self, file: Option<&std::path::Path>) -> String {
        match file.and_then(|f| f.file_name()) {
            Some(name) => format!("{} - {}", self.title, name.to_string_lossy()),
            None => self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_title_for_file() {
        let config = WindowConfig::default();
        assert_eq!(config.title_for(None), "Spine Viewer");
        assert_eq!(
            config.title_for(Some(Path::new("/tmp/assets/spineboy.skel"))),
            "Spine Viewer - spineboy.skel"
        );
    }
}
