//! Basic cleaning command-line entry point.
//!
//! Downloads the raw dataset artifact, applies the cleaning rules and publishes
//! the result as a new artifact.
//!
//! # Usage
//!
//! ```bash
//! basic_cleaning \
//!   --input_artifact sample.csv:latest \
//!   --output_artifact clean_sample.csv \
//!   --output_type clean_sample \
//!   --output_description "Data with outliers and null values removed" \
//!   --min_price 10 \
//!   --max_price 350
//! ```
//!
//! # Environment Variables
//!
//! - `CLEANING_TRACKING_ROOT`: Tracker root directory (default: .tracking)
//! - `CLEANING_PROJECT`: Tracker project (default: nyc_airbnb)
//! - `CLEANING_CONFIG`: Configuration file, same as `--config`
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use basic_cleaning::config::Settings;
use basic_cleaning::{CleanRequest, CleaningPipeline};

/// A very basic data cleaning
#[derive(Debug, Parser)]
#[command(name = "basic_cleaning", version, about)]
struct Args {
    /// Name of the input artifact to download
    #[arg(long = "input_artifact")]
    input_artifact: String,

    /// Name of the output artifact to upload
    #[arg(long = "output_artifact")]
    output_artifact: String,

    /// Type of the output artifact
    #[arg(long = "output_type")]
    output_type: String,

    /// Description of the output artifact
    #[arg(long = "output_description")]
    output_description: String,

    /// Minimum price to filter the dataset
    #[arg(long = "min_price", allow_negative_numbers = true)]
    min_price: i64,

    /// Maximum price to filter the dataset
    #[arg(long = "max_price", allow_negative_numbers = true)]
    max_price: i64,

    /// Path to a basic_cleaning.toml configuration file
    #[arg(long, env = "CLEANING_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())?;
    let tracker = settings.tracker();
    info!(
        "Tracking project {} at {}",
        tracker.project(),
        tracker.root().display()
    );

    let request = CleanRequest::new(
        &args.input_artifact,
        &args.output_artifact,
        &args.output_type,
        &args.output_description,
        args.min_price,
        args.max_price,
    )?;

    let pipeline = CleaningPipeline::with_config(settings.pipeline_config());
    let report = pipeline.run(&tracker, &request)?;

    info!(
        "Run {} kept {} of {} rows, published {}",
        report.run_id, report.output_rows, report.input_rows, report.published
    );

    Ok(())
}
