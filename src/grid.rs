// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Score and offset grids produced by the pose model.
//!
//! Both grids are stored as `(rows, cols, depth)` arrays. Engines usually hand out
//! NHWC tensors with a leading batch axis of 1; the constructors here accept that
//! layout as well as flat buffers with an explicit shape.

use ndarray::{Array3, Array4, ArrayView3, Axis};

use crate::error::{PoseError, Result};

/// Per-cell, per-class heatmap scores with shape `(rows, cols, classes)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreGrid {
    data: Array3<f32>,
}

impl ScoreGrid {
    /// Wrap a `(rows, cols, classes)` array.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::ShapeMismatch` if the grid has no cells.
    pub fn new(data: Array3<f32>) -> Result<Self> {
        check_extent(&data, "score")?;
        Ok(Self { data })
    }

    /// Build from a `(1, rows, cols, classes)` tensor.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::ShapeMismatch` if the batch size is not 1 or the grid is empty.
    pub fn from_nhwc(tensor: Array4<f32>) -> Result<Self> {
        Self::new(squeeze_batch(tensor, "score")?)
    }

    /// Build from a flat row-major buffer.
    ///
    /// # Arguments
    ///
    /// * `data` - Raw tensor values.
    /// * `shape` - `[1, rows, cols, classes]` or `[rows, cols, classes]`.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::ShapeMismatch` if the shape is unsupported or disagrees with
    /// the buffer length.
    pub fn from_raw(data: &[f32], shape: &[usize]) -> Result<Self> {
        Self::new(array_from_raw(data, shape, "score")?)
    }

    /// Number of grid rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.data.shape()[0]
    }

    /// Number of grid columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.data.shape()[1]
    }

    /// Number of keypoint classes (depth of the grid).
    #[must_use]
    pub fn classes(&self) -> usize {
        self.data.shape()[2]
    }

    /// Score of `class` at cell `(row, col)`.
    #[must_use]
    pub fn score(&self, row: usize, col: usize, class: usize) -> f32 {
        self.data[[row, col, class]]
    }

    /// Borrow the underlying array.
    #[must_use]
    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }
}

/// Sub-cell displacement vectors with shape `(rows, cols, 2 × classes)`.
///
/// Channels `0..classes` hold vertical offsets, `classes..2 × classes` horizontal ones.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetGrid {
    data: Array3<f32>,
}

impl OffsetGrid {
    /// Wrap a `(rows, cols, 2 × classes)` array.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::ShapeMismatch` if the grid has no cells or an odd depth.
    pub fn new(data: Array3<f32>) -> Result<Self> {
        check_extent(&data, "offset")?;
        let depth = data.shape()[2];
        if depth % 2 != 0 {
            return Err(PoseError::ShapeMismatch(format!(
                "offset tensor depth {depth} is odd, expected 2 x classes"
            )));
        }
        Ok(Self { data })
    }

    /// Build from a `(1, rows, cols, 2 × classes)` tensor.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::ShapeMismatch` if the batch size is not 1 or the grid is invalid.
    pub fn from_nhwc(tensor: Array4<f32>) -> Result<Self> {
        Self::new(squeeze_batch(tensor, "offset")?)
    }

    /// Build from a flat row-major buffer.
    ///
    /// # Arguments
    ///
    /// * `data` - Raw tensor values.
    /// * `shape` - `[1, rows, cols, depth]` or `[rows, cols, depth]`.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::ShapeMismatch` if the shape is unsupported or disagrees with
    /// the buffer length.
    pub fn from_raw(data: &[f32], shape: &[usize]) -> Result<Self> {
        Self::new(array_from_raw(data, shape, "offset")?)
    }

    /// Number of grid rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.data.shape()[0]
    }

    /// Number of grid columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.data.shape()[1]
    }

    /// Full depth of the grid (`2 × classes`).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.data.shape()[2]
    }

    /// Number of keypoint classes the grid carries offsets for.
    #[must_use]
    pub fn classes(&self) -> usize {
        self.depth() / 2
    }

    /// Vertical offset of `class` at cell `(row, col)`.
    #[must_use]
    pub fn vertical(&self, row: usize, col: usize, class: usize) -> f32 {
        self.data[[row, col, class]]
    }

    /// Horizontal offset of `class` at cell `(row, col)`.
    #[must_use]
    pub fn horizontal(&self, row: usize, col: usize, class: usize) -> f32 {
        self.data[[row, col, class + self.classes()]]
    }

    /// Borrow the underlying array.
    #[must_use]
    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }
}

fn check_extent(data: &Array3<f32>, name: &str) -> Result<()> {
    let shape = data.shape();
    if shape[0] == 0 || shape[1] == 0 {
        return Err(PoseError::ShapeMismatch(format!(
            "{name} grid has no cells: {shape:?}"
        )));
    }
    Ok(())
}

fn squeeze_batch(tensor: Array4<f32>, name: &str) -> Result<Array3<f32>> {
    let batch = tensor.shape()[0];
    if batch != 1 {
        return Err(PoseError::ShapeMismatch(format!(
            "{name} tensor has batch size {batch}, expected 1"
        )));
    }
    Ok(tensor.index_axis_move(Axis(0), 0))
}

fn array_from_raw(data: &[f32], shape: &[usize], name: &str) -> Result<Array3<f32>> {
    let (rows, cols, depth) = match *shape {
        [1, rows, cols, depth] | [rows, cols, depth] => (rows, cols, depth),
        [batch, _, _, _] => {
            return Err(PoseError::ShapeMismatch(format!(
                "{name} tensor has batch size {batch}, expected 1"
            )));
        }
        _ => {
            return Err(PoseError::ShapeMismatch(format!(
                "{name} tensor shape {shape:?} is not [1, rows, cols, depth] or [rows, cols, depth]"
            )));
        }
    };

    let expected = rows
        .checked_mul(cols)
        .and_then(|n| n.checked_mul(depth))
        .ok_or_else(|| {
            PoseError::ShapeMismatch(format!("{name} tensor shape {shape:?} overflows usize"))
        })?;
    if data.len() != expected {
        return Err(PoseError::ShapeMismatch(format!(
            "{name} tensor has {} values, shape {shape:?} needs {expected}",
            data.len()
        )));
    }

    Array3::from_shape_vec((rows, cols, depth), data.to_vec())
        .map_err(|e| PoseError::ShapeMismatch(format!("{name} tensor: {e}")))
}
