// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]

//! # PoseNet Decoder
//!
//! Decodes the raw output tensors of a heatmap-based keypoint model (PoseNet,
//! `multi_person_mobilenet_v1_075_float`) into one pixel-space keypoint per class and
//! assembles them into a thresholded human skeleton.
//!
//! The model produces two tensors per frame:
//!
//! - a **score grid** of shape `(1, rows, cols, 17)`, one heatmap channel per keypoint;
//! - an **offset grid** of shape `(1, rows, cols, 34)`, vertical offsets in the first 17
//!   channels and horizontal offsets in the last 17.
//!
//! For each class the highest scoring cell is picked and refined with its offsets.
//! Only the single strongest response per class is used, so one pose is decoded per
//! frame even when the model sees several people.
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::Array3;
//! use posenet_decoder::{KeypointClass, OffsetGrid, Pose, PoseConfig, ScoreGrid};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut scores = Array3::<f32>::zeros((23, 17, 17));
//! scores[[10, 8, KeypointClass::LeftShoulder.index()]] = 0.9;
//! scores[[12, 8, KeypointClass::LeftElbow.index()]] = 0.8;
//!
//! let scores = ScoreGrid::new(scores)?;
//! let offsets = OffsetGrid::new(Array3::zeros((23, 17, 34)))?;
//!
//! let pose = Pose::estimate(&scores, &offsets, &PoseConfig::default())?;
//! let shoulder = pose.keypoint(KeypointClass::LeftShoulder).unwrap();
//! assert_eq!((shoulder.x, shoulder.y), (120.0, 152.0));
//! assert_eq!(pose.valid_joints().count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Decode tensors dumped by the inference engine
//! posenet-decoder decode --scores heatmaps.json --offsets offsets.json
//!
//! # Stride-32 model, JSON output
//! posenet-decoder decode -s heatmaps.json -o offsets.json --stride 32 --format json
//!
//! # Show the skeleton topology
//! posenet-decoder skeleton
//! ```
//!
//! Tensor dumps are JSON objects `{"shape": [1, 23, 17, 17], "data": [...]}` with
//! `data` in row-major order.
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`grid`] | [`ScoreGrid`] and [`OffsetGrid`] tensor wrappers |
//! | [`decoder`] | [`decode`] heatmap + offset decoding |
//! | [`skeleton`] | Topology table, [`assemble`] and [`face_points`] |
//! | [`pose`] | [`Pose`] container for one decoded frame |
//! | [`config`] | [`PoseConfig`] stride, input size and thresholds |
//! | [`keypoint`] | [`KeypointClass`] and [`Keypoint`] |
//! | [`io`] | Tensor dump loading |
//! | [`error`] | Error types ([`PoseError`], [`Result`]) |

// Modules
pub mod cli;
pub mod config;
pub mod decoder;
pub mod error;
pub mod grid;
pub mod io;
pub mod keypoint;
pub mod pose;
pub mod skeleton;

// Re-export main types for convenience
pub use config::PoseConfig;
pub use decoder::{decode, decode_raw};
pub use error::{PoseError, Result};
pub use grid::{OffsetGrid, ScoreGrid};
pub use io::TensorFile;
pub use keypoint::{Keypoint, KeypointClass};
pub use pose::Pose;
pub use skeleton::{FACE_KEYPOINTS, FacePoint, Joint, LimbGroup, SKELETON, assemble, face_points};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
