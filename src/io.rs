// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Tensor dump loading.
//!
//! Offline decoding reads the engine's output tensors from JSON files of the form
//! `{"shape": [1, 23, 17, 17], "data": [...]}` with `data` in row-major order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PoseError, Result};
use crate::grid::{OffsetGrid, ScoreGrid};

/// A dumped tensor: its shape and flat row-major values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorFile {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl TensorFile {
    /// Parse a tensor dump from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::TensorFormat` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a tensor dump from disk.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::Io` if the file cannot be read, or
    /// `PoseError::TensorFormat` if it is not a valid dump.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents).map_err(|e| match e {
            PoseError::TensorFormat(msg) => {
                PoseError::TensorFormat(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Write the dump as JSON.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::Io` if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Load a score grid from a tensor dump.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its shape is invalid.
pub fn load_scores<P: AsRef<Path>>(path: P) -> Result<ScoreGrid> {
    let tensor = TensorFile::load(path)?;
    ScoreGrid::from_raw(&tensor.data, &tensor.shape)
}

/// Load an offset grid from a tensor dump.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its shape is invalid.
pub fn load_offsets<P: AsRef<Path>>(path: P) -> Result<OffsetGrid> {
    let tensor = TensorFile::load(path)?;
    OffsetGrid::from_raw(&tensor.data, &tensor.shape)
}
