//! Register a local file as a tracked artifact.
//!
//! Seeds the tracker with the raw listings sample so `basic_cleaning` has an
//! input to fetch. Every invocation stores a new version.
//!
//! # Usage
//!
//! ```bash
//! import_artifact \
//!   --file data/sample.csv \
//!   --artifact_type raw_data \
//!   --artifact_description "Raw file as downloaded"
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
use basic_cleaning::core::{ArtifactDescriptor, ArtifactVersion};
use basic_cleaning::tracking::LocalTracker;
use basic_cleaning::{CleaningError, CleaningResult};

/// Upload a local file as a new artifact version
#[derive(Debug, Parser)]
#[command(name = "import_artifact", version, about)]
struct Args {
    /// Local file to upload
    #[arg(long = "file")]
    file: PathBuf,

    /// Artifact name (default: the file name)
    #[arg(long = "artifact_name")]
    artifact_name: Option<String>,

    /// Type of the artifact
    #[arg(long = "artifact_type", default_value = "raw_data")]
    artifact_type: String,

    /// Description of the artifact
    #[arg(long = "artifact_description", default_value = "Raw file as downloaded")]
    artifact_description: String,

    /// Path to a basic_cleaning.toml configuration file
    #[arg(long, env = "CLEANING_CONFIG")]
    config: Option<PathBuf>,
}

impl Args {
    fn descriptor(&self) -> CleaningResult<ArtifactDescriptor> {
        let name = match &self.artifact_name {
            Some(name) => name.clone(),
            None => self
                .file
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    CleaningError::ConfigurationError(format!(
                        "Cannot derive an artifact name from {}",
                        self.file.display()
                    ))
                })?,
        };
        Ok(ArtifactDescriptor::new(
            name,
            &self.artifact_type,
            &self.artifact_description,
        ))
    }
}

fn import(args: &Args, tracker: &LocalTracker) -> CleaningResult<ArtifactVersion> {
    if !args.file.is_file() {
        return Err(CleaningError::FilesystemError(format!(
            "{} is not a file",
            args.file.display()
        )));
    }

    let descriptor = args.descriptor()?;
    info!(
        "Uploading {} as {} ({})",
        args.file.display(),
        descriptor.name,
        descriptor.artifact_type
    );
    tracker
        .import_file(&descriptor, &args.file)
        .map_err(CleaningError::from_publish)
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

    let version = import(&args, &tracker)?;
    info!("Stored {} in project {}", version, tracker.project());

    Ok(())
}
