//! Error type shared by the loader, the playlist, settings and the renderer.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("invalid settings: {0}")]
    Config(String),

    #[error("settings parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
