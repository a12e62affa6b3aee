// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::keypoint::KeypointClass;

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Decode Options:
    --scores <FILE>         Score tensor dump, shape [1, rows, cols, 17]
    --offsets <FILE>        Offset tensor dump, shape [1, rows, cols, 34]
    --stride <STRIDE>       Pixels per grid cell [default: 16]
    --joint-conf <CONF>     Joint confidence threshold [default: 0.5]
    --keypoint-conf <CONF>  Face keypoint confidence threshold [default: 0.1]
    --imgsz <H> <W>         Model input size [default: 353 257]
    --x-extent <PIXELS>     Override the horizontal extent used to mirror x
    --format <FORMAT>       Output format: text or json [default: text]
    --keypoint <NAME>       Only print these keypoints (repeatable)
    --quiet                 Print results only
    --verbose               Show per-joint detail

Examples:
    posenet-decoder decode --scores heatmaps.json --offsets offsets.json
    posenet-decoder decode -s heatmaps.json -o offsets.json --stride 32 --format json
    posenet-decoder decode -s heatmaps.json -o offsets.json --keypoint left_wrist --keypoint right_wrist
    posenet-decoder skeleton"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode dumped score and offset tensors into keypoints and joints
    Decode(DecodeArgs),
    /// Print the skeleton topology
    Skeleton,
}

/// Output format for decoded poses.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human readable table
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Arguments for the decode command.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Score tensor dump (JSON)
    #[arg(short, long)]
    pub scores: String,

    /// Offset tensor dump (JSON)
    #[arg(short, long)]
    pub offsets: String,

    /// Pixels per grid cell
    #[arg(long, default_value_t = 16.0)]
    pub stride: f32,

    /// Joint confidence threshold
    #[arg(long, default_value_t = 0.5)]
    pub joint_conf: f32,

    /// Face keypoint confidence threshold
    #[arg(long, default_value_t = 0.1)]
    pub keypoint_conf: f32,

    /// Model input size as height and width
    #[arg(long, num_args = 2, value_names = ["HEIGHT", "WIDTH"])]
    pub imgsz: Option<Vec<u32>>,

    /// Override the horizontal extent used to mirror x coordinates
    #[arg(long)]
    pub x_extent: Option<f32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only print these keypoints
    #[arg(long = "keypoint", value_name = "NAME")]
    pub keypoints: Vec<KeypointClass>,

    /// Print results only
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Show per-joint detail
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}
