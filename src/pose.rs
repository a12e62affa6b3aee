// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Decoded pose container.
//!
//! [`Pose`] bundles one decode and assembly pass: all keypoints, every skeleton
//! joint with its validity flag, and the face points.

use serde::Serialize;

use crate::config::PoseConfig;
use crate::decoder::decode;
use crate::error::Result;
use crate::grid::{OffsetGrid, ScoreGrid};
use crate::keypoint::{Keypoint, KeypointClass};
use crate::skeleton::{FacePoint, Joint, assemble, face_points};

/// Result of decoding a single inference cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pose {
    /// One keypoint per class, in class order.
    pub keypoints: Vec<Keypoint>,
    /// One joint per skeleton entry.
    pub joints: Vec<Joint>,
    /// Face points with their visibility.
    pub face: Vec<FacePoint>,
    /// Model input size (height, width) the coordinates refer to.
    pub input_size: (u32, u32),
}

impl Pose {
    /// Decode the grids and assemble the skeleton in one pass.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::ShapeMismatch` for inconsistent grids and
    /// `PoseError::ConfigError` for an invalid configuration.
    pub fn estimate(scores: &ScoreGrid, offsets: &OffsetGrid, config: &PoseConfig) -> Result<Self> {
        let keypoints = decode(scores, offsets, config)?;
        Self::from_keypoints(keypoints, config)
    }

    /// Assemble a pose from already decoded keypoints.
    ///
    /// # Errors
    ///
    /// Returns `PoseError::MissingKeypoint` if a class is absent.
    pub fn from_keypoints(keypoints: Vec<Keypoint>, config: &PoseConfig) -> Result<Self> {
        let joints = assemble(&keypoints, config)?;
        let face = face_points(&keypoints, config)?;
        Ok(Self {
            keypoints,
            joints,
            face,
            input_size: config.input_size,
        })
    }

    /// Get a keypoint by class.
    #[must_use]
    pub fn keypoint(&self, class: KeypointClass) -> Option<&Keypoint> {
        self.keypoints.iter().find(|kp| kp.class == class)
    }

    /// Joints whose endpoints both passed the joint threshold.
    pub fn valid_joints(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter().filter(|joint| joint.valid)
    }

    /// Face points that passed the keypoint threshold.
    pub fn visible_face_points(&self) -> impl Iterator<Item = &FacePoint> {
        self.face.iter().filter(|point| point.visible)
    }

    /// Mean keypoint confidence.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score(&self) -> f32 {
        if self.keypoints.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.keypoints.iter().map(|kp| kp.confidence).sum();
        sum / self.keypoints.len() as f32
    }

    /// Coordinates of `keypoint` relative to the model input size.
    #[must_use]
    pub fn normalized(&self, keypoint: &Keypoint) -> (f32, f32) {
        keypoint.normalized(self.input_size)
    }

    /// Generate a one-line summary (e.g. "17 keypoints, 3/12 joints, 2/5 face points").
    #[must_use]
    pub fn verbose(&self) -> String {
        format!(
            "{} keypoints, {}/{} joints, {}/{} face points",
            self.keypoints.len(),
            self.valid_joints().count(),
            self.joints.len(),
            self.visible_face_points().count(),
            self.face.len()
        )
    }
}
