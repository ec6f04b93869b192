use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(
    name = "roi-crop",
    version,
    about = "Replay and export cropping-box sessions over nD images"
)]
pub(super) struct Cli {
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(super) enum Commands {
    /// Replays a session script and writes the CSV files it saves.
    Run {
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Checks a session script without running it.
    Validate {
        #[arg(long)]
        script: PathBuf,
    },
    /// Prints the axis names and CSV columns used for an image of `ndim` dimensions.
    Axes {
        #[arg(long)]
        ndim: usize,
    },
}

#[derive(Debug, Serialize)]
pub(super) struct AxesInfo {
    pub(super) ndim: usize,
    pub(super) axes: Vec<String>,
    pub(super) columns: Vec<String>,
}
