//! Error types for the chat core.
//!
//! Nothing in the streaming path is fatal: marker anomalies and unknown
//! sections degrade to no-ops. Errors only surface at the edges, where raw
//! frames, recordings and configuration enter the crate.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("malformed inbound frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    #[error("recording not found: {}", .0.display())]
    RecordingNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("invalid marker {0:?}: must not be whitespace")]
    InvalidMarker(char),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChatError {
    pub fn error_code(&self) -> &str {
        match self {
            Self::MalformedFrame(_) => "malformed_frame",
            Self::RecordingNotFound(_) => "recording_not_found",
            Self::Config(_) => "invalid_config",
            Self::InvalidMarker(_) => "invalid_marker",
            Self::Io(_) => "io",
        }
    }
}

impl From<figment::Error> for ChatError {
    fn from(err: figment::Error) -> Self {
        ChatError::Config(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
