// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Keypoint classes and decoded keypoints.
//!
//! The class order matches the depth axis of the model's score tensor, so
//! `KeypointClass::index` doubles as the channel index into the grids.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Anatomical landmark predicted by the pose model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum KeypointClass {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointClass {
    /// Number of keypoint classes in the model output.
    pub const COUNT: usize = 17;

    /// All classes in channel order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Channel index of this class in the score grid.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a class by channel index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Returns the snake_case name of the class.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Returns whether this is a face point (nose, eyes, ears).
    ///
    /// Face points are never part of a joint.
    #[must_use]
    pub const fn is_facial(self) -> bool {
        (self as usize) < 5
    }
}

impl fmt::Display for KeypointClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for KeypointClass {
    type Err = KeypointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();

        Self::ALL
            .iter()
            .find(|class| class.as_str().replace('_', "") == normalized)
            .copied()
            .ok_or_else(|| KeypointParseError(s.to_string()))
    }
}

/// Error returned when parsing an invalid keypoint name.
#[derive(Debug, Clone)]
pub struct KeypointParseError(String);

impl fmt::Display for KeypointParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid keypoint '{}', expected a name such as nose, left_shoulder or right_ankle",
            self.0
        )
    }
}

impl std::error::Error for KeypointParseError {}

/// A decoded keypoint in source-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Keypoint {
    /// Horizontal pixel coordinate.
    pub x: f32,
    /// Vertical pixel coordinate.
    pub y: f32,
    /// Raw best score for the class (not normalized).
    pub confidence: f32,
    /// Landmark this keypoint belongs to.
    pub class: KeypointClass,
}

impl Keypoint {
    /// Create a keypoint at pixel `(x, y)`.
    #[must_use]
    pub const fn new(x: f32, y: f32, confidence: f32, class: KeypointClass) -> Self {
        Self {
            x,
            y,
            confidence,
            class,
        }
    }

    /// Whether the confidence is strictly above `threshold`.
    #[must_use]
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.confidence > threshold
    }

    /// Euclidean pixel distance to another keypoint.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Coordinates divided by the model input size.
    ///
    /// # Arguments
    ///
    /// * `input_size` - Model input (height, width).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn normalized(&self, input_size: (u32, u32)) -> (f32, f32) {
        let (h, w) = (input_size.0 as f32, input_size.1 as f32);
        (self.x / w, self.y / h)
    }
}
