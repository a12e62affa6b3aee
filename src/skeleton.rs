// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Skeleton topology and assembly.
//!
//! Limbs and torso form joints between two keypoints; face points stand alone and
//! are only checked against the lower keypoint threshold.

use serde::Serialize;

use crate::config::PoseConfig;
use crate::error::{PoseError, Result};
use crate::keypoint::{Keypoint, KeypointClass};

/// Body region a joint belongs to. Renderers typically pick one color per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimbGroup {
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    Torso,
}

impl LimbGroup {
    /// Returns the snake_case name of the group.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LeftArm => "left_arm",
            Self::RightArm => "right_arm",
            Self::LeftLeg => "left_leg",
            Self::RightLeg => "right_leg",
            Self::Torso => "torso",
        }
    }
}

/// Keypoint pairs that form the drawable skeleton, with their body region.
pub const SKELETON: [(KeypointClass, KeypointClass, LimbGroup); 12] = [
    (KeypointClass::LeftShoulder, KeypointClass::LeftElbow, LimbGroup::LeftArm),
    (KeypointClass::LeftElbow, KeypointClass::LeftWrist, LimbGroup::LeftArm),
    (KeypointClass::RightShoulder, KeypointClass::RightElbow, LimbGroup::RightArm),
    (KeypointClass::RightElbow, KeypointClass::RightWrist, LimbGroup::RightArm),
    (KeypointClass::LeftHip, KeypointClass::LeftKnee, LimbGroup::LeftLeg),
    (KeypointClass::LeftKnee, KeypointClass::LeftAnkle, LimbGroup::LeftLeg),
    (KeypointClass::RightHip, KeypointClass::RightKnee, LimbGroup::RightLeg),
    (KeypointClass::RightKnee, KeypointClass::RightAnkle, LimbGroup::RightLeg),
    (KeypointClass::LeftShoulder, KeypointClass::RightShoulder, LimbGroup::Torso),
    (KeypointClass::LeftShoulder, KeypointClass::LeftHip, LimbGroup::Torso),
    (KeypointClass::RightShoulder, KeypointClass::RightHip, LimbGroup::Torso),
    (KeypointClass::LeftHip, KeypointClass::RightHip, LimbGroup::Torso),
];

/// Face points drawn as standalone dots.
pub const FACE_KEYPOINTS: [KeypointClass; 5] = [
    KeypointClass::Nose,
    KeypointClass::LeftEye,
    KeypointClass::RightEye,
    KeypointClass::LeftEar,
    KeypointClass::RightEar,
];

/// A connection between two keypoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Joint {
    /// First endpoint, as listed in [`SKELETON`].
    pub from: Keypoint,
    /// Second endpoint.
    pub to: Keypoint,
    /// Body region of the joint.
    pub group: LimbGroup,
    /// Both endpoint confidences are above the joint threshold.
    pub valid: bool,
}

impl Joint {
    /// Name in the form `from-to`, e.g. `left_shoulder-left_elbow`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}-{}", self.from.class, self.to.class)
    }

    /// Pixel length of the joint.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.from.distance(&self.to)
    }
}

/// A face keypoint with its drawability flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FacePoint {
    /// The decoded face keypoint.
    pub keypoint: Keypoint,
    /// Confidence is above the keypoint threshold.
    pub visible: bool,
}

/// Build one joint per [`SKELETON`] entry.
///
/// A joint is valid if and only if both endpoint confidences are strictly greater
/// than `config.joint_threshold`. Invalid joints are still returned.
///
/// # Errors
///
/// Returns `PoseError::MissingKeypoint` if a class used by the skeleton is absent
/// from `keypoints`, or `PoseError::ConfigError` if a threshold lies outside `[0, 1]`.
pub fn assemble(keypoints: &[Keypoint], config: &PoseConfig) -> Result<Vec<Joint>> {
    config.validate_thresholds()?;

    SKELETON
        .iter()
        .map(|&(a, b, group)| {
            let from = lookup(keypoints, a)?;
            let to = lookup(keypoints, b)?;
            let valid = from.is_visible(config.joint_threshold)
                && to.is_visible(config.joint_threshold);
            Ok(Joint {
                from,
                to,
                group,
                valid,
            })
        })
        .collect()
}

/// Check each face keypoint against `config.keypoint_threshold` (strict).
///
/// # Errors
///
/// Returns `PoseError::MissingKeypoint` if a face class is absent from `keypoints`,
/// or `PoseError::ConfigError` if a threshold lies outside `[0, 1]`.
pub fn face_points(keypoints: &[Keypoint], config: &PoseConfig) -> Result<Vec<FacePoint>> {
    config.validate_thresholds()?;

    FACE_KEYPOINTS
        .iter()
        .map(|&class| {
            let keypoint = lookup(keypoints, class)?;
            Ok(FacePoint {
                keypoint,
                visible: keypoint.is_visible(config.keypoint_threshold),
            })
        })
        .collect()
}

fn lookup(keypoints: &[Keypoint], class: KeypointClass) -> Result<Keypoint> {
    keypoints
        .iter()
        .find(|kp| kp.class == class)
        .copied()
        .ok_or(PoseError::MissingKeypoint(class))
}
