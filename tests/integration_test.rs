// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Integration tests for the decoder library

use ndarray::{Array3, Array4};
use posenet_decoder::{
    KeypointClass, LimbGroup, OffsetGrid, Pose, PoseConfig, PoseError, SKELETON, ScoreGrid,
    TensorFile, assemble, decode, decode_raw, face_points,
};

const K: usize = KeypointClass::COUNT;

fn reference_grids() -> (Array3<f32>, Array3<f32>) {
    (Array3::zeros((23, 17, K)), Array3::zeros((23, 17, 2 * K)))
}

#[test]
fn test_shoulder_elbow_end_to_end() {
    let (mut scores, offsets) = reference_grids();
    scores[[10, 8, KeypointClass::LeftShoulder.index()]] = 0.9;
    scores[[12, 8, KeypointClass::LeftElbow.index()]] = 0.8;

    let config = PoseConfig::new().with_stride(16.0);
    let scores = ScoreGrid::new(scores).unwrap();
    let offsets = OffsetGrid::new(offsets).unwrap();
    let keypoints = decode(&scores, &offsets, &config).unwrap();

    assert_eq!(keypoints.len(), K);

    let shoulder = keypoints[KeypointClass::LeftShoulder.index()];
    assert!((shoulder.y - 152.0).abs() < 1e-6);
    assert!((shoulder.x - 120.0).abs() < 1e-6);
    assert!((shoulder.confidence - 0.9).abs() < 1e-6);

    let elbow = keypoints[KeypointClass::LeftElbow.index()];
    assert!((elbow.y - 184.0).abs() < 1e-6);
    assert!((elbow.x - 120.0).abs() < 1e-6);

    let joints = assemble(&keypoints, &config).unwrap();
    assert_eq!(joints.len(), SKELETON.len());

    let upper_arm = joints
        .iter()
        .find(|j| {
            j.from.class == KeypointClass::LeftShoulder && j.to.class == KeypointClass::LeftElbow
        })
        .unwrap();
    assert!(upper_arm.valid);
    assert_eq!(upper_arm.group, LimbGroup::LeftArm);
    assert!((upper_arm.length() - 32.0).abs() < 1e-6);

    assert_eq!(joints.iter().filter(|j| j.valid).count(), 1);
}

#[test]
fn test_depth_mismatch_is_rejected() {
    let scores = ScoreGrid::new(Array3::zeros((23, 17, 16))).unwrap();
    let offsets = OffsetGrid::new(Array3::zeros((23, 17, 30))).unwrap();

    let result = decode(&scores, &offsets, &PoseConfig::default());
    assert!(matches!(result, Err(PoseError::ShapeMismatch(_))));
}

#[test]
fn test_engine_buffers() {
    let rows = 23;
    let cols = 17;
    let mut scores = vec![0.0_f32; rows * cols * K];
    let mut offsets = vec![0.0_f32; rows * cols * 2 * K];

    // Nose peak at (3, 5) with offsets (dy, dx) = (2, 4)
    let k = KeypointClass::Nose.index();
    let cell = 3 * cols + 5;
    scores[cell * K + k] = 0.95;
    offsets[cell * 2 * K + k] = 2.0;
    offsets[cell * 2 * K + k + K] = 4.0;

    let keypoints = decode_raw(
        &scores,
        &[1, rows, cols, K],
        &offsets,
        &[1, rows, cols, 2 * K],
        &PoseConfig::default(),
    )
    .unwrap();

    let nose = keypoints[k];
    assert!((nose.y - (48.0 + 2.0 - 8.0)).abs() < 1e-6);
    assert!((nose.x - (272.0 - (96.0 + 4.0 + 8.0))).abs() < 1e-6);

    let face = face_points(&keypoints, &PoseConfig::default()).unwrap();
    assert!(face[0].visible);
    assert!(face[1..].iter().all(|p| !p.visible));
}

#[test]
fn test_nhwc_tensors() {
    let mut scores = Array4::<f32>::zeros((1, 23, 17, K));
    scores[[0, 20, 3, KeypointClass::RightAnkle.index()]] = 0.7;
    let offsets = Array4::<f32>::zeros((1, 23, 17, 2 * K));

    let pose = Pose::estimate(
        &ScoreGrid::from_nhwc(scores).unwrap(),
        &OffsetGrid::from_nhwc(offsets).unwrap(),
        &PoseConfig::default(),
    )
    .unwrap();

    let ankle = pose.keypoint(KeypointClass::RightAnkle).unwrap();
    assert!((ankle.y - (320.0 - 8.0)).abs() < 1e-6);
    assert!((ankle.x - (272.0 - (64.0 + 8.0))).abs() < 1e-6);
    assert_eq!(pose.valid_joints().count(), 0);
}

#[test]
fn test_single_cell_grid_decodes_every_class_to_that_cell() {
    let mut scores = Array3::<f32>::zeros((1, 1, K));
    scores.fill(0.4);
    let mut offsets = Array3::<f32>::zeros((1, 1, 2 * K));
    offsets.fill(1.0);

    let keypoints = decode(
        &ScoreGrid::new(scores).unwrap(),
        &OffsetGrid::new(offsets).unwrap(),
        &PoseConfig::default(),
    )
    .unwrap();

    for kp in &keypoints {
        assert!((kp.y - (1.0 - 8.0)).abs() < 1e-6);
        assert!((kp.x - (272.0 - (16.0 + 1.0 + 8.0))).abs() < 1e-6);
    }
}

#[test]
fn test_tensor_dump_round_trip_through_pose() {
    let (mut scores, offsets) = reference_grids();
    for class in KeypointClass::ALL {
        scores[[11, 8, class.index()]] = 0.6;
    }

    let dir = std::env::temp_dir();
    let score_path = dir.join(format!("posenet-it-{}-scores.json", std::process::id()));
    let offset_path = dir.join(format!("posenet-it-{}-offsets.json", std::process::id()));

    TensorFile {
        shape: vec![1, 23, 17, K],
        data: scores.iter().copied().collect(),
    }
    .save(&score_path)
    .unwrap();
    TensorFile {
        shape: vec![1, 23, 17, 2 * K],
        data: offsets.iter().copied().collect(),
    }
    .save(&offset_path)
    .unwrap();

    let pose = Pose::estimate(
        &posenet_decoder::io::load_scores(&score_path).unwrap(),
        &posenet_decoder::io::load_offsets(&offset_path).unwrap(),
        &PoseConfig::default(),
    )
    .unwrap();

    assert_eq!(pose.valid_joints().count(), SKELETON.len());
    assert_eq!(pose.visible_face_points().count(), 5);
    assert_eq!(pose.verbose(), "17 keypoints, 12/12 joints, 5/5 face points");

    let _ = std::fs::remove_file(score_path);
    let _ = std::fs::remove_file(offset_path);
}

#[test]
fn test_missing_keypoint() {
    let (scores, offsets) = reference_grids();
    let mut keypoints = decode(
        &ScoreGrid::new(scores).unwrap(),
        &OffsetGrid::new(offsets).unwrap(),
        &PoseConfig::default(),
    )
    .unwrap();
    keypoints.retain(|kp| kp.class != KeypointClass::LeftHip);

    assert!(matches!(
        assemble(&keypoints, &PoseConfig::default()),
        Err(PoseError::MissingKeypoint(KeypointClass::LeftHip))
    ));
}
