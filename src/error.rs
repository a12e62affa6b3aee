// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for pose decoding.

use std::fmt;

use crate::keypoint::KeypointClass;

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, PoseError>;

/// Main error type for the decoder library.
#[derive(Debug)]
pub enum PoseError {
    /// Score or offset tensor dimensions disagree with the grid extent or class count.
    ShapeMismatch(String),
    /// Keypoint set handed to the assembler lacks a class the skeleton needs.
    MissingKeypoint(KeypointClass),
    /// Invalid configuration provided.
    ConfigError(String),
    /// Tensor dump could not be parsed.
    TensorFormat(String),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch(msg) => write!(f, "Shape mismatch: {msg}"),
            Self::MissingKeypoint(class) => write!(f, "Missing keypoint: {class}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::TensorFormat(msg) => write!(f, "Tensor format error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for PoseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PoseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PoseError {
    fn from(err: serde_json::Error) -> Self {
        Self::TensorFormat(err.to_string())
    }
}
