//! Error types for the viewer

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the viewer
#[derive(Debug, Error)]
pub enum Error {
    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Animation engine error: {0}")]
    Engine(String),

    #[error("Texture error: {0}")]
    Texture(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),
}
