// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Heatmap and offset decoding.
//!
//! The pose model emits a coarse score grid with one channel per keypoint class and
//! a matching grid of sub-cell displacement vectors. Decoding picks, per class, the
//! highest scoring cell and refines its position with the offsets stored there.
//!
//! Only the single strongest response per class is kept, so the result always
//! describes one pose even when several people are in view.

use crate::config::PoseConfig;
use crate::error::{PoseError, Result};
use crate::grid::{OffsetGrid, ScoreGrid};
use crate::keypoint::{Keypoint, KeypointClass};

/// Decode one keypoint per class from the model's score and offset grids.
///
/// For each class the grid is scanned in row-major order and the first cell holding
/// the maximum score wins. Its position is mapped to pixels as
///
/// ```text
/// y = row * stride + dy - stride / 2
/// x = x_extent - ((col + 1) * stride + dx + stride / 2)
/// ```
///
/// where `dy`/`dx` are the vertical and horizontal offsets at that cell and
/// `x_extent` defaults to `classes * stride`. The subtraction from `x_extent` undoes the
/// horizontal mirroring in the model's output convention.
///
/// # Arguments
///
/// * `scores` - Score grid with 17 class channels.
/// * `offsets` - Offset grid with the same cell extent and 34 channels.
/// * `config` - Grid stride and geometry.
///
/// # Returns
///
/// * Exactly `KeypointClass::COUNT` keypoints in class order. Confidence is the raw
///   best score; nothing is filtered.
///
/// # Errors
///
/// Returns `PoseError::ShapeMismatch` if the grid extents or depths are inconsistent,
/// or `PoseError::ConfigError` for a non-positive stride or non-finite extent override.
pub fn decode(
    scores: &ScoreGrid,
    offsets: &OffsetGrid,
    config: &PoseConfig,
) -> Result<Vec<Keypoint>> {
    config.validate_geometry()?;
    check_shapes(scores, offsets)?;

    let stride = config.grid_stride;
    let x_extent = config.image_x_extent();

    let keypoints = KeypointClass::ALL
        .iter()
        .map(|&class| {
            let k = class.index();
            let (row, col, confidence) = best_cell(scores, k);

            let dy = offsets.vertical(row, col, k);
            let dx = offsets.horizontal(row, col, k);

            #[allow(clippy::cast_precision_loss)]
            let (r, c) = (row as f32, col as f32);
            let y = r * stride + dy - stride / 2.0;
            let x = x_extent - ((c + 1.0) * stride + dx + stride / 2.0);

            Keypoint::new(x, y, confidence, class)
        })
        .collect();

    Ok(keypoints)
}

/// Decode from flat engine output buffers.
///
/// # Arguments
///
/// * `scores` - Raw score values.
/// * `score_shape` - `[1, rows, cols, 17]` or `[rows, cols, 17]`.
/// * `offsets` - Raw offset values.
/// * `offset_shape` - `[1, rows, cols, 34]` or `[rows, cols, 34]`.
/// * `config` - Grid stride and geometry.
///
/// # Errors
///
/// Returns `PoseError::ShapeMismatch` if either buffer disagrees with its shape or the
/// shapes disagree with each other.
pub fn decode_raw(
    scores: &[f32],
    score_shape: &[usize],
    offsets: &[f32],
    offset_shape: &[usize],
    config: &PoseConfig,
) -> Result<Vec<Keypoint>> {
    let scores = ScoreGrid::from_raw(scores, score_shape)?;
    let offsets = OffsetGrid::from_raw(offsets, offset_shape)?;
    decode(&scores, &offsets, config)
}

fn check_shapes(scores: &ScoreGrid, offsets: &OffsetGrid) -> Result<()> {
    if scores.classes() != KeypointClass::COUNT {
        return Err(PoseError::ShapeMismatch(format!(
            "score grid has {} channels, expected {}",
            scores.classes(),
            KeypointClass::COUNT
        )));
    }
    if offsets.depth() != 2 * KeypointClass::COUNT {
        return Err(PoseError::ShapeMismatch(format!(
            "offset grid has {} channels, expected {}",
            offsets.depth(),
            2 * KeypointClass::COUNT
        )));
    }
    if (scores.rows(), scores.cols()) != (offsets.rows(), offsets.cols()) {
        return Err(PoseError::ShapeMismatch(format!(
            "score grid is {}x{} but offset grid is {}x{}",
            scores.rows(),
            scores.cols(),
            offsets.rows(),
            offsets.cols()
        )));
    }
    Ok(())
}

/// Row-major argmax over one class channel. Ties keep the earliest cell.
fn best_cell(scores: &ScoreGrid, class: usize) -> (usize, usize, f32) {
    let channel = scores.view();
    let mut best = (0, 0, sanitize(channel[[0, 0, class]]));

    for row in 0..scores.rows() {
        for col in 0..scores.cols() {
            let score = sanitize(channel[[row, col, class]]);
            if score > best.2 {
                best = (row, col, score);
            }
        }
    }

    best
}

fn sanitize(score: f32) -> f32 {
    if score.is_nan() { 0.0 } else { score }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    const K: usize = KeypointClass::COUNT;

    fn grids(rows: usize, cols: usize) -> (Array3<f32>, Array3<f32>) {
        (
            Array3::zeros((rows, cols, K)),
            Array3::zeros((rows, cols, 2 * K)),
        )
    }

    fn run(scores: Array3<f32>, offsets: Array3<f32>, config: &PoseConfig) -> Vec<Keypoint> {
        let scores = ScoreGrid::new(scores).unwrap();
        let offsets = OffsetGrid::new(offsets).unwrap();
        decode(&scores, &offsets, config).unwrap()
    }

    #[test]
    fn test_one_keypoint_per_class_in_order() {
        let (scores, offsets) = grids(23, 17);
        let keypoints = run(scores, offsets, &PoseConfig::default());

        assert_eq!(keypoints.len(), K);
        for (kp, class) in keypoints.iter().zip(KeypointClass::ALL) {
            assert_eq!(kp.class, class);
        }
    }

    #[test]
    fn test_peak_location_and_offsets() {
        let (mut scores, mut offsets) = grids(23, 17);
        let k = KeypointClass::RightWrist.index();
        scores[[4, 2, k]] = 0.7;
        offsets[[4, 2, k]] = 3.0;
        offsets[[4, 2, k + K]] = -5.0;

        let keypoints = run(scores, offsets, &PoseConfig::default());
        let wrist = keypoints[k];

        // y = 4 * 16 + 3 - 8, x = 272 - (3 * 16 - 5 + 8)
        assert!((wrist.y - 59.0).abs() < 1e-6);
        assert!((wrist.x - 221.0).abs() < 1e-6);
        assert!((wrist.confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_tie_keeps_first_cell_in_scan_order() {
        let (mut scores, offsets) = grids(5, 5);
        let k = KeypointClass::Nose.index();
        scores[[1, 3, k]] = 0.6;
        scores[[1, 4, k]] = 0.6;
        scores[[3, 0, k]] = 0.6;

        let keypoints = run(scores, offsets, &PoseConfig::default());
        let nose = keypoints[k];

        assert!((nose.y - (16.0 - 8.0)).abs() < 1e-6);
        assert!((nose.x - (272.0 - (4.0 * 16.0 + 8.0))).abs() < 1e-6);
    }

    #[test]
    fn test_all_zero_scores_decode_origin_cell() {
        let (scores, offsets) = grids(23, 17);
        let keypoints = run(scores, offsets, &PoseConfig::default());

        for kp in &keypoints {
            assert!((kp.y + 8.0).abs() < 1e-6);
            assert!((kp.x - (272.0 - 24.0)).abs() < 1e-6);
            assert!(kp.confidence.abs() < 1e-6);
        }
    }

    #[test]
    fn test_single_cell_grid() {
        let (mut scores, mut offsets) = grids(1, 1);
        for k in 0..K {
            #[allow(clippy::cast_precision_loss)]
            let v = k as f32;
            scores[[0, 0, k]] = 0.05 * v;
            offsets[[0, 0, k]] = v;
            offsets[[0, 0, k + K]] = -v;
        }

        let keypoints = run(scores, offsets, &PoseConfig::default());
        for (k, kp) in keypoints.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let v = k as f32;
            assert!((kp.y - (v - 8.0)).abs() < 1e-5);
            assert!((kp.x - (272.0 - (16.0 - v + 8.0))).abs() < 1e-5);
            assert!((kp.confidence - 0.05 * v).abs() < 1e-6);
        }
    }

    #[test]
    fn test_stride_and_extent_override() {
        let (mut scores, offsets) = grids(3, 3);
        let k = KeypointClass::LeftHip.index();
        scores[[2, 1, k]] = 0.9;

        let config = PoseConfig::new().with_stride(32.0);
        let hip = run(scores.clone(), offsets.clone(), &config)[k];
        assert!((hip.y - (64.0 - 16.0)).abs() < 1e-6);
        assert!((hip.x - (544.0 - (64.0 + 16.0))).abs() < 1e-6);

        let config = config.with_x_extent(Some(257.0));
        let hip = run(scores, offsets, &config)[k];
        assert!((hip.x - (257.0 - 80.0)).abs() < 1e-6);
    }

    #[test]
    fn test_nan_scores_never_win() {
        let (mut scores, offsets) = grids(2, 2);
        let k = KeypointClass::LeftEye.index();
        scores[[0, 0, k]] = f32::NAN;
        scores[[0, 1, k]] = f32::NAN;
        scores[[1, 1, k]] = 0.3;

        let eye = run(scores, offsets, &PoseConfig::default())[k];
        assert!((eye.confidence - 0.3).abs() < 1e-6);
        assert!((eye.y - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_depth_mismatch() {
        let scores = ScoreGrid::new(Array3::zeros((23, 17, 16))).unwrap();
        let offsets = OffsetGrid::new(Array3::zeros((23, 17, 30))).unwrap();
        let result = decode(&scores, &offsets, &PoseConfig::default());
        assert!(matches!(result, Err(PoseError::ShapeMismatch(_))));
    }

    #[test]
    fn test_offset_depth_mismatch() {
        let scores = ScoreGrid::new(Array3::zeros((23, 17, K))).unwrap();
        let offsets = OffsetGrid::new(Array3::zeros((23, 17, 30))).unwrap();
        let result = decode(&scores, &offsets, &PoseConfig::default());
        assert!(matches!(result, Err(PoseError::ShapeMismatch(_))));
    }

    #[test]
    fn test_extent_mismatch() {
        let scores = ScoreGrid::new(Array3::zeros((23, 17, K))).unwrap();
        let offsets = OffsetGrid::new(Array3::zeros((23, 16, 2 * K))).unwrap();
        let result = decode(&scores, &offsets, &PoseConfig::default());
        assert!(matches!(result, Err(PoseError::ShapeMismatch(_))));
    }

    #[test]
    fn test_invalid_config() {
        let (scores, offsets) = grids(2, 2);
        let scores = ScoreGrid::new(scores).unwrap();
        let offsets = OffsetGrid::new(offsets).unwrap();
        let config = PoseConfig::new().with_stride(-1.0);
        assert!(matches!(
            decode(&scores, &offsets, &config),
            Err(PoseError::ConfigError(_))
        ));
    }

    #[test]
    fn test_decode_ignores_assembly_settings() {
        let (mut scores, offsets) = grids(2, 2);
        scores[[1, 0, KeypointClass::Nose.index()]] = 0.8;
        let config = PoseConfig::new()
            .with_joint_threshold(1.5)
            .with_keypoint_threshold(-1.0)
            .with_input_size(0, 0);

        let keypoints = run(scores, offsets, &config);
        assert_eq!(keypoints.len(), K);
        assert!((keypoints[0].confidence - 0.8).abs() < 1e-6);
        assert!((keypoints[0].y - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_raw() {
        let rows = 2;
        let cols = 3;
        let mut scores = vec![0.0; rows * cols * K];
        let offsets = vec![0.0; rows * cols * 2 * K];
        let k = KeypointClass::RightKnee.index();
        scores[(cols + 2) * K + k] = 0.4; // cell (1, 2)

        let keypoints = decode_raw(
            &scores,
            &[1, rows, cols, K],
            &offsets,
            &[1, rows, cols, 2 * K],
            &PoseConfig::default(),
        )
        .unwrap();

        let knee = keypoints[k];
        assert!((knee.y - 8.0).abs() < 1e-6);
        assert!((knee.x - (272.0 - 56.0)).abs() < 1e-6);

        let truncated = decode_raw(
            &scores[..scores.len() - 1],
            &[1, rows, cols, K],
            &offsets,
            &[1, rows, cols, 2 * K],
            &PoseConfig::default(),
        );
        assert!(truncated.is_err());
    }

    #[test]
    fn test_decode_is_deterministic() {
        let (mut scores, mut offsets) = grids(23, 17);
        for ((r, c, k), v) in scores.indexed_iter_mut() {
            #[allow(clippy::cast_precision_loss)]
            let seed = ((r * 31 + c * 17 + k * 7) % 97) as f32;
            *v = seed / 97.0;
        }
        offsets.fill(1.25);

        let config = PoseConfig::default();
        let a = run(scores.clone(), offsets.clone(), &config);
        let b = run(scores, offsets, &config);
        for (ka, kb) in a.iter().zip(&b) {
            assert_eq!(ka.x.to_bits(), kb.x.to_bits());
            assert_eq!(ka.y.to_bits(), kb.y.to_bits());
            assert_eq!(ka.confidence.to_bits(), kb.confidence.to_bits());
        }
    }
}
