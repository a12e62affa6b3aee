// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Decoding configuration.
//!
//! This module defines the [`PoseConfig`] struct, which holds the grid geometry of
//! the model and the confidence thresholds used when assembling the skeleton.

use crate::error::{PoseError, Result};
use crate::keypoint::KeypointClass;

/// Configuration for keypoint decoding and skeleton assembly.
///
/// Uses a builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use posenet_decoder::PoseConfig;
///
/// let config = PoseConfig::new()
///     .with_stride(16.0)
///     .with_joint_threshold(0.5)
///     .with_keypoint_threshold(0.1)
///     .with_input_size(353, 257);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PoseConfig {
    /// Number of source-image pixels spanned by one grid cell.
    pub grid_stride: f32,
    /// Model input size (height, width) in pixels.
    pub input_size: (u32, u32),
    /// A joint is valid only if both endpoint confidences exceed this value.
    pub joint_threshold: f32,
    /// A face point is drawable only if its confidence exceeds this value.
    pub keypoint_threshold: f32,
    /// Replaces the derived horizontal extent (`classes × stride`) when set.
    pub x_extent: Option<f32>,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            grid_stride: 16.0,
            input_size: (353, 257),
            joint_threshold: 0.5,
            keypoint_threshold: 0.1,
            x_extent: None,
        }
    }
}

impl PoseConfig {
    /// Create a new configuration with default values.
    ///
    /// # Returns
    ///
    /// * A new `PoseConfig` instance with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid stride.
    ///
    /// # Arguments
    ///
    /// * `stride` - Pixels per grid cell, a property of the model architecture (e.g. 16 or 32).
    ///
    /// # Returns
    ///
    /// * The modified `PoseConfig`.
    #[must_use]
    pub const fn with_stride(mut self, stride: f32) -> Self {
        self.grid_stride = stride;
        self
    }

    /// Set the model input size.
    ///
    /// # Arguments
    ///
    /// * `height` - Input tensor height.
    /// * `width` - Input tensor width.
    ///
    /// # Returns
    ///
    /// * The modified `PoseConfig`.
    #[must_use]
    pub const fn with_input_size(mut self, height: u32, width: u32) -> Self {
        self.input_size = (height, width);
        self
    }

    /// Set the joint confidence threshold.
    ///
    /// # Arguments
    ///
    /// * `threshold` - Minimum endpoint confidence (exclusive, 0.0 to 1.0).
    ///
    /// # Returns
    ///
    /// * The modified `PoseConfig`.
    #[must_use]
    pub const fn with_joint_threshold(mut self, threshold: f32) -> Self {
        self.joint_threshold = threshold;
        self
    }

    /// Set the face keypoint confidence threshold.
    ///
    /// # Arguments
    ///
    /// * `threshold` - Minimum confidence (exclusive, 0.0 to 1.0).
    ///
    /// # Returns
    ///
    /// * The modified `PoseConfig`.
    #[must_use]
    pub const fn with_keypoint_threshold(mut self, threshold: f32) -> Self {
        self.keypoint_threshold = threshold;
        self
    }

    /// Override the horizontal extent used by the x-coordinate flip.
    ///
    /// `None` keeps the derived `classes × stride` value.
    #[must_use]
    pub const fn with_x_extent(mut self, extent: Option<f32>) -> Self {
        self.x_extent = extent;
        self
    }

    /// Horizontal extent that decoded x coordinates are mirrored against.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn image_x_extent(&self) -> f32 {
        self.x_extent
            .unwrap_or(KeypointClass::COUNT as f32 * self.grid_stride)
    }

    /// Check that all values are usable.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::ConfigError` for a non-positive or non-finite stride,
    /// thresholds outside `[0, 1]`, a zero input size, or a non-finite extent override.
    pub fn validate(&self) -> Result<()> {
        self.validate_geometry()?;
        self.validate_thresholds()?;
        if self.input_size.0 == 0 || self.input_size.1 == 0 {
            return Err(PoseError::ConfigError(format!(
                "input size must be non-zero, got {}x{}",
                self.input_size.0, self.input_size.1
            )));
        }
        Ok(())
    }

    /// Check the values the decoder reads: stride and extent override.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::ConfigError` for a non-positive or non-finite stride, or a
    /// non-finite extent override.
    pub fn validate_geometry(&self) -> Result<()> {
        if !self.grid_stride.is_finite() || self.grid_stride <= 0.0 {
            return Err(PoseError::ConfigError(format!(
                "grid stride must be a positive number, got {}",
                self.grid_stride
            )));
        }
        match self.x_extent {
            Some(extent) if !extent.is_finite() => Err(PoseError::ConfigError(format!(
                "x extent must be finite, got {extent}"
            ))),
            _ => Ok(()),
        }
    }

    /// Check the values the skeleton assembler reads: both confidence thresholds.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::ConfigError` if a threshold lies outside `[0, 1]`.
    pub fn validate_thresholds(&self) -> Result<()> {
        for (name, value) in [
            ("joint threshold", self.joint_threshold),
            ("keypoint threshold", self.keypoint_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PoseError::ConfigError(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
