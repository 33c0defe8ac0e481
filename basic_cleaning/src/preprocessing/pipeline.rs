use polars::prelude::*;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::core::{ArtifactDescriptor, ArtifactRef, ArtifactVersion, ListingColumn, PriceRange};
use crate::error::{CleaningError, CleaningResult};
use crate::io::{write_csv, ScratchFile};
use crate::parsing::parse_listings_csv;
use crate::tracking::{RunContext, TrackingService};
use crate::transformations::{CleaningStep, DEFAULT_DATE_FORMAT};

/// Job type recorded for every cleaning run.
pub const JOB_TYPE: &str = "basic_cleaning";

/// Parameters of one cleaning invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRequest {
    pub input_artifact: ArtifactRef,
    pub output: ArtifactDescriptor,
    pub price_range: PriceRange,
}

impl CleanRequest {
    /// Build a request from raw command-line values.
    ///
    /// An input reference that cannot be parsed can never resolve, so it is
    /// reported as [`CleaningError::ArtifactNotFoundError`].
    pub fn new(
        input_artifact: &str,
        output_artifact: &str,
        output_type: &str,
        output_description: &str,
        min_price: i64,
        max_price: i64,
    ) -> CleaningResult<Self> {
        let input_artifact = input_artifact
            .parse::<ArtifactRef>()
            .map_err(|e| CleaningError::ArtifactNotFoundError(format!("{}: {}", input_artifact, e)))?;

        Ok(Self {
            input_artifact,
            output: ArtifactDescriptor::new(output_artifact, output_type, output_description),
            price_range: PriceRange::new(min_price, max_price),
        })
    }

    /// Invocation parameters as recorded in the run configuration.
    pub fn to_config(&self) -> Map<String, Value> {
        let mut config = Map::new();
        config.insert(
            "input_artifact".to_string(),
            json!(self.input_artifact.to_string()),
        );
        config.insert("output_artifact".to_string(), json!(self.output.name));
        config.insert("output_type".to_string(), json!(self.output.artifact_type));
        config.insert(
            "output_description".to_string(),
            json!(self.output.description),
        );
        config.insert("min_price".to_string(), json!(self.price_range.min));
        config.insert("max_price".to_string(), json!(self.price_range.max));
        config
    }
}

/// Configuration for the cleaning pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Directory the temporary output file is written to.
    pub scratch_dir: PathBuf,
    /// File name of the temporary output, also the stored artifact file name.
    pub output_filename: String,
    /// Format tried first when parsing `last_review`.
    pub date_format: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scratch_dir: PathBuf::from("."),
            output_filename: "clean_sample.csv".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// What a single cleaning step did to the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: &'static str,
    pub applied: bool,
    pub rows_before: usize,
    pub rows_after: usize,
}

/// Result of a completed cleaning run
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningReport {
    pub run_id: String,
    pub input_rows: usize,
    pub output_rows: usize,
    pub steps: Vec<StepOutcome>,
    pub published: ArtifactVersion,
}

/// The basic cleaning pipeline.
///
/// Steps run in a fixed order and any failure ends the run immediately:
/// record configuration, fetch the input artifact, load it, impute, filter
/// prices, filter coordinates, coerce dates, write the temporary CSV, publish
/// it, remove the temporary file.
pub struct CleaningPipeline {
    config: PipelineConfig,
}

impl CleaningPipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn output_path(&self) -> PathBuf {
        self.config.scratch_dir.join(&self.config.output_filename)
    }

    /// Apply the cleaning rules to an in-memory dataset.
    pub fn clean_dataframe(
        &self,
        mut df: DataFrame,
        price_range: PriceRange,
    ) -> CleaningResult<(DataFrame, Vec<StepOutcome>)> {
        let mut outcomes = Vec::new();

        let absent: Vec<&str> = ListingColumn::ALL
            .iter()
            .map(ListingColumn::as_str)
            .filter(|c| df.get_column_index(c).is_none())
            .collect();
        if !absent.is_empty() {
            warn!("Dataset has no {} column(s)", absent.join(", "));
        }
        if price_range.is_empty() {
            warn!(
                "min_price {} is above max_price {}, no priced row will be kept",
                price_range.min, price_range.max
            );
        }

        for step in CleaningStep::standard(price_range, &self.config.date_format) {
            let rows_before = df.height();
            let applied = step.is_applicable(&df);

            if applied {
                info!("{}", step.description());
                df = step.apply(&df)?;
            } else {
                let missing: Vec<&str> = step
                    .required_columns()
                    .iter()
                    .map(ListingColumn::as_str)
                    .filter(|c| df.get_column_index(c).is_none())
                    .collect();
                debug!("Skipping {}: no {} column", step.name(), missing.join("/"));
            }

            outcomes.push(StepOutcome {
                step: step.name(),
                applied,
                rows_before,
                rows_after: df.height(),
            });
        }

        Ok((df, outcomes))
    }

    /// Run the whole pipeline on a caller-owned run context.
    pub fn clean_with_run<R: RunContext>(
        &self,
        run: &mut R,
        request: &CleanRequest,
    ) -> CleaningResult<CleaningReport> {
        run.set_config(request.to_config())
            .map_err(|e| CleaningError::TrackingError(e.to_string()))?;

        info!("Downloading input artifact");
        let artifact_path = run
            .fetch_artifact(&request.input_artifact)
            .map_err(CleaningError::from_fetch)?;

        info!("Reading dataset");
        let df = parse_listings_csv(&artifact_path)?;
        let input_rows = df.height();

        let (mut df, steps) = self.clean_dataframe(df, request.price_range)?;
        let output_rows = df.height();
        debug!("Kept {} of {} rows", output_rows, input_rows);

        let scratch = ScratchFile::new(self.output_path());
        info!("Saving cleaned data to {}", scratch.path().display());
        write_csv(&mut df, scratch.path())?;

        info!(
            "Creating output artifact {} ({}): {}",
            request.output.name, request.output.artifact_type, request.output.description
        );
        debug!("Attaching {}", scratch.path().display());

        info!("Logging artifact");
        let published = run
            .publish_artifact(&request.output, scratch.path())
            .map_err(CleaningError::from_publish)?;
        info!("Published {}", published);

        info!("Removing temporary file");
        scratch.remove();

        Ok(CleaningReport {
            run_id: run.run_id().to_string(),
            input_rows,
            output_rows,
            steps,
            published,
        })
    }

    /// Open a run on `tracker` and execute the pipeline in it.
    pub fn run<T: TrackingService>(
        &self,
        tracker: &T,
        request: &CleanRequest,
    ) -> CleaningResult<CleaningReport> {
        let mut run = tracker
            .open_run(JOB_TYPE)
            .map_err(|e| CleaningError::TrackingError(e.to_string()))?;
        self.clean_with_run(&mut run, request)
    }
}

impl Default for CleaningPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to run the pipeline with default configuration
pub fn clean<T: TrackingService>(
    tracker: &T,
    request: &CleanRequest,
) -> CleaningResult<CleaningReport> {
    CleaningPipeline::new().run(tracker, request)
}
