use std::path::PathBuf;

use thiserror::Error;

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or rendering a room
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed room {room}: {reason}")]
    MalformedInput { room: String, reason: String },

    #[error("Failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse config {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to load font {}: {reason}", .path.display())]
    Font { path: PathBuf, reason: String },

    #[error("Canvas of {width}x{height} pixels is too large")]
    CanvasSize { width: usize, height: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn malformed(room: &str, reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            room: room.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
