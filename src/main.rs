// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;

use clap::Parser;

use posenet_decoder::cli::args::{Cli, Commands};
use posenet_decoder::cli::decode::{run_decode, run_skeleton};
use posenet_decoder::error;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode(args) => {
            if let Err(e) = run_decode(&args) {
                error!("{e}");
                process::exit(1);
            }
        }
        Commands::Skeleton => run_skeleton(),
    }
}
