//! Error types shared across apngkit crates.

use std::path::PathBuf;

/// Top-level error type for apngkit operations.
#[derive(Debug, thiserror::Error)]
pub enum ApngkitError {
    #[error("Sequence error: {message}")]
    Sequence { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Invalid playback speed: {speed} (must be a finite value above zero)")]
    InvalidSpeed { speed: f64 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Image error: {message}")]
    Image { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ApngkitError.
pub type ApngkitResult<T> = Result<T, ApngkitError>;

impl ApngkitError {
    pub fn sequence(msg: impl Into<String>) -> Self {
        Self::Sequence {
            message: msg.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image {
            message: msg.into(),
        }
    }
}
