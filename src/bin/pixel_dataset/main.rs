//! pixel-dataset CLI
//!
//! Inspects dataset roots and runs the normalization pipeline over them.
//!
//! # Usage
//!
//! ```bash
//! pixel-dataset inspect data/train --line-height 36
//! pixel-dataset load data/train --target-line-height 4 --preview-dir previews/
//! pixel-dataset load data/train --config prep.json --output json
//! ```

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "pixel-dataset")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Prepare page segmentation datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the samples of a dataset root and check that its files line up
    Inspect {
        /// Dataset root containing binary_images/, images/ and masks/
        root: PathBuf,

        /// Fixed calibration line height; normalizations/ is read when absent
        #[arg(long = "line-height", env = "PIXEL_DATASET_LINE_HEIGHT")]
        line_height: Option<f64>,

        /// JSON configuration file
        #[arg(long, env = "PIXEL_DATASET_CONFIG")]
        config: Option<PathBuf>,

        /// Skip the filename correspondence check
        #[arg(long)]
        no_verify: bool,

        /// Output format (json, text, pretty)
        #[arg(long, default_value = "pretty")]
        output: String,
    },
    /// Load and normalize every sample of a dataset root
    Load {
        /// Dataset root containing binary_images/, images/ and masks/
        root: PathBuf,

        /// Line height every sample is rescaled to
        #[arg(long = "target-line-height", required_unless_present = "config")]
        target_line_height: Option<f64>,

        /// Fixed calibration line height; normalizations/ is read when absent
        #[arg(long = "line-height", env = "PIXEL_DATASET_LINE_HEIGHT")]
        line_height: Option<f64>,

        /// JSON configuration file
        #[arg(long, env = "PIXEL_DATASET_CONFIG")]
        config: Option<PathBuf>,

        /// Load images only, ignoring masks
        #[arg(long)]
        prediction: bool,

        /// Number of worker threads
        #[arg(long, env = "PIXEL_DATASET_WORKERS")]
        workers: Option<usize>,

        /// Skip the filename correspondence check
        #[arg(long)]
        no_verify: bool,

        /// Write normalized binaries and decoded masks to this directory
        #[arg(long = "preview-dir")]
        preview_dir: Option<PathBuf>,

        /// Output format (json, text, pretty)
        #[arg(long, default_value = "pretty")]
        output: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    pixel_dataset::utils::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect {
            root,
            line_height,
            config,
            no_verify,
            output,
        } => {
            let (catalog, line_height) =
                cli::catalog_settings(config.as_deref(), line_height, no_verify)?;
            info!("Inspecting dataset at {}", root.display());
            cli::inspect(&root, catalog, line_height, &output)?;
        }
        Commands::Load {
            root,
            target_line_height,
            line_height,
            config,
            prediction,
            workers,
            no_verify,
            preview_dir,
            output,
        } => {
            let overrides = cli::Overrides {
                target_line_height,
                line_height,
                prediction,
                workers,
                no_verify,
            };
            let prep = cli::resolve_config(config.as_deref(), overrides)?;
            info!("Loading dataset at {}", root.display());
            cli::load(&root, &prep, preview_dir.as_deref(), &output)?;
        }
    }

    Ok(())
}
