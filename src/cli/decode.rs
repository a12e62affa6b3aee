// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::time::Instant;

use crate::cli::args::{DecodeArgs, OutputFormat};
use crate::cli::logging::{Verbosity, set_verbosity};
use crate::io::{load_offsets, load_scores};
use crate::keypoint::KeypointClass;
use crate::skeleton::{FACE_KEYPOINTS, SKELETON};
use crate::{Pose, PoseConfig, Result, VERSION};
use crate::{info, section, verbose, warn};

/// Build the decoding configuration from command-line flags.
///
/// # Errors
///
/// Returns `PoseError::ConfigError` if the resulting configuration is invalid.
pub fn config_from_args(args: &DecodeArgs) -> Result<PoseConfig> {
    let mut config = PoseConfig::new()
        .with_stride(args.stride)
        .with_joint_threshold(args.joint_conf)
        .with_keypoint_threshold(args.keypoint_conf)
        .with_x_extent(args.x_extent);

    if let Some(&[height, width]) = args.imgsz.as_deref() {
        config = config.with_input_size(height, width);
    }

    config.validate()?;
    Ok(config)
}

/// Run the decode command.
///
/// # Errors
///
/// Returns an error if the tensor dumps cannot be loaded or decoded.
#[allow(clippy::cast_precision_loss)]
pub fn run_decode(args: &DecodeArgs) -> Result<()> {
    set_verbosity(Verbosity::from_flags(args.quiet, args.verbose));
    let config = config_from_args(args)?;

    info!(
        "posenet-decoder {VERSION} 🚀 stride={} imgsz=({}, {})",
        config.grid_stride, config.input_size.0, config.input_size.1
    );

    let start = Instant::now();
    let scores = load_scores(&args.scores)?;
    let offsets = load_offsets(&args.offsets)?;
    let load_ms = start.elapsed().as_secs_f64() * 1000.0;

    verbose!(
        "score grid {}x{}x{}, offset grid {}x{}x{}",
        scores.rows(),
        scores.cols(),
        scores.classes(),
        offsets.rows(),
        offsets.cols(),
        offsets.depth()
    );

    // A grid far from input_height / stride usually means the wrong --stride.
    let expected_rows = config.input_size.0 as f32 / config.grid_stride;
    if (scores.rows() as f32 - expected_rows).abs() > 2.0 {
        warn!(
            "{} grid rows do not match input height {} at stride {}",
            scores.rows(),
            config.input_size.0,
            config.grid_stride
        );
    }

    let start = Instant::now();
    let pose = Pose::estimate(&scores, &offsets, &config)?;
    let decode_ms = start.elapsed().as_secs_f64() * 1000.0;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&pose)?;
            println!("{json}");
        }
        OutputFormat::Text => print_pose(&pose, &args.keypoints),
    }

    info!("{}", pose.verbose());
    info!("Speed: {load_ms:.1}ms load, {decode_ms:.3}ms decode");
    Ok(())
}

fn print_pose(pose: &Pose, only: &[KeypointClass]) {
    section!("Keypoints");
    for kp in &pose.keypoints {
        if !only.is_empty() && !only.contains(&kp.class) {
            continue;
        }
        let (xn, yn) = pose.normalized(kp);
        println!(
            "{:<16} x={:>8.2} y={:>8.2} conf={:.3} (xn={xn:.3}, yn={yn:.3})",
            kp.class.as_str(),
            kp.x,
            kp.y,
            kp.confidence
        );
    }

    section!("Joints");
    for joint in &pose.joints {
        if joint.valid {
            println!("{:<32} {:>8.2}px", joint.name(), joint.length());
        } else {
            verbose!(
                "{:<32} invalid (conf {:.3} / {:.3})",
                joint.name(),
                joint.from.confidence,
                joint.to.confidence
            );
        }
    }

    section!("Face");
    for point in pose.visible_face_points() {
        println!(
            "{:<16} x={:>8.2} y={:>8.2}",
            point.keypoint.class.as_str(),
            point.keypoint.x,
            point.keypoint.y
        );
    }
}

/// Run the skeleton command.
pub fn run_skeleton() {
    section!("Joints");
    for (i, (a, b, group)) in SKELETON.iter().enumerate() {
        println!(
            "{i:>2}  {:<16} {:>2} -> {:<16} {:>2}  {}",
            a.as_str(),
            a.index(),
            b.as_str(),
            b.index(),
            group.as_str()
        );
    }

    section!("Face");
    for class in FACE_KEYPOINTS {
        println!("{:>2}  {}", class.index(), class.as_str());
    }
}
