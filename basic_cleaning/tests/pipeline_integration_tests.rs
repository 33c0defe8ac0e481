//! End-to-end tests of the cleaning pipeline against the local tracker.
//!
//! These tests ensure that:
//! 1. The cleaning rules produce the expected published dataset
//! 2. Failures surface with the right error and publish nothing
//! 3. The temporary output file never outlives the run
//! 4. The run record captures configuration and lineage

use basic_cleaning::core::{ArtifactDescriptor, ArtifactRef, ArtifactVersion};
use basic_cleaning::parsing::parse_listings_csv;
use basic_cleaning::preprocessing::PipelineConfig;
use basic_cleaning::tracking::{
    LocalTracker, RunContext, TrackingError, TrackingResult, TrackingService,
};
use basic_cleaning::{clean, CleanRequest, CleaningError, CleaningPipeline};
use polars::prelude::*;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ==================== Helper Functions ====================

struct Fixture {
    _root: TempDir,
    scratch: TempDir,
    tracker: LocalTracker,
}

impl Fixture {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let tracker = LocalTracker::new(root.path(), "nyc_airbnb");
        Self {
            _root: root,
            scratch: TempDir::new().unwrap(),
            tracker,
        }
    }

    fn seed_raw(&self, content: &str) {
        let staging = TempDir::new().unwrap();
        let path = staging.path().join("sample.csv");
        fs::write(&path, content).unwrap();
        self.tracker
            .import_file(
                &ArtifactDescriptor::new("sample.csv", "raw_data", "Raw listings"),
                &path,
            )
            .unwrap();
    }

    fn pipeline(&self) -> CleaningPipeline {
        CleaningPipeline::with_config(PipelineConfig {
            scratch_dir: self.scratch.path().to_path_buf(),
            ..Default::default()
        })
    }

    fn scratch_file(&self) -> PathBuf {
        self.scratch.path().join("clean_sample.csv")
    }

    /// Load the latest published clean dataset through a fresh run.
    fn published(&self) -> DataFrame {
        let mut run = self.tracker.open_run("inspect").unwrap();
        let path = run
            .fetch_artifact(&ArtifactRef::latest("clean_sample.csv"))
            .unwrap();
        parse_listings_csv(&path).unwrap()
    }
}

fn request(min_price: i64, max_price: i64) -> CleanRequest {
    CleanRequest::new(
        "sample.csv:latest",
        "clean_sample.csv",
        "clean_sample",
        "Data with outliers and null values removed",
        min_price,
        max_price,
    )
    .unwrap()
}

const HEADER: &str = "id,name,price,longitude,latitude,reviews_per_month,last_review\n";

/// Run context whose uploads always fail.
struct FailingUpload<R: RunContext>(R);

impl<R: RunContext> RunContext for FailingUpload<R> {
    fn run_id(&self) -> &str {
        self.0.run_id()
    }

    fn set_config(&mut self, config: Map<String, Value>) -> TrackingResult<()> {
        self.0.set_config(config)
    }

    fn fetch_artifact(&mut self, reference: &ArtifactRef) -> TrackingResult<PathBuf> {
        self.0.fetch_artifact(reference)
    }

    fn publish_artifact(
        &mut self,
        _descriptor: &ArtifactDescriptor,
        local_path: &Path,
    ) -> TrackingResult<ArtifactVersion> {
        assert!(local_path.exists(), "output must be written before upload");
        Err(TrackingError::StorageError("service unavailable".to_string()))
    }
}

// ==================== Scenarios ====================

#[test]
fn test_price_outlier_dropped_and_missing_reviews_imputed() {
    let fx = Fixture::new();
    fx.seed_raw(&format!(
        "{}1,Cozy room,50,-73.9,40.7,,2019-01-01\n2,Penthouse,5000,-73.9,40.7,,\n",
        HEADER
    ));

    let report = fx.pipeline().run(&fx.tracker, &request(10, 100)).unwrap();

    assert_eq!(report.input_rows, 2);
    assert_eq!(report.output_rows, 1);
    assert_eq!(report.published.to_string(), "clean_sample.csv:v0");

    let df = fx.published();
    assert_eq!(df.height(), 1);
    assert_eq!(df.column("id").unwrap().i64().unwrap().get(0), Some(1));
    let reviews = df
        .column("reviews_per_month")
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap();
    assert_eq!(reviews.f64().unwrap().get(0), Some(0.0));
    assert_eq!(
        df.column("last_review").unwrap().str().unwrap().get(0),
        Some("2019-01-01")
    );
}

#[test]
fn test_na_and_nan_reviews_are_imputed() {
    let fx = Fixture::new();
    fx.seed_raw(&format!(
        "{}1,A,50,-73.9,40.7,0.5,2019-01-01\n2,B,60,-73.9,40.7,NA,2019-01-01\n\
         3,C,70,-73.9,40.7,,2019-01-01\n4,D,80,-73.9,40.7,NaN,2019-01-01\n",
        HEADER
    ));

    fx.pipeline().run(&fx.tracker, &request(10, 100)).unwrap();

    let df = fx.published();
    let reviews = df.column("reviews_per_month").unwrap();
    assert_eq!(reviews.dtype(), &DataType::Float64);
    let values: Vec<Option<f64>> = reviews.f64().unwrap().into_iter().collect();
    assert_eq!(values, vec![Some(0.5), Some(0.0), Some(0.0), Some(0.0)]);
}

#[test]
fn test_datetime_reviews_keep_their_date() {
    let fx = Fixture::new();
    fx.seed_raw(&format!(
        "{}1,A,80,-73.9,40.7,0.5,2019-01-01 10:30:00\n2,B,80,-73.9,40.7,0.5,2019-05-21 00:00:00\n",
        HEADER
    ));

    fx.pipeline().run(&fx.tracker, &request(10, 100)).unwrap();

    let df = fx.published();
    let last_review = df.column("last_review").unwrap().str().unwrap();
    assert_eq!(last_review.get(0), Some("2019-01-01"));
    assert_eq!(last_review.get(1), Some("2019-05-21"));
}

#[test]
fn test_clean_with_default_configuration() {
    let fx = Fixture::new();
    fx.seed_raw(&format!(
        "{}1,A,80,-73.9,40.7,0.5,2019-01-01\n2,B,900,-73.9,40.7,0.5,2019-01-01\n",
        HEADER
    ));
    let request = CleanRequest::new(
        "sample.csv:v0",
        "clean_default.csv",
        "clean_sample",
        "Cleaned with defaults",
        10,
        350,
    )
    .unwrap();

    let report = clean(&fx.tracker, &request).unwrap();

    assert_eq!(report.input_rows, 2);
    assert_eq!(report.output_rows, 1);
    assert_eq!(report.published.to_string(), "clean_default.csv:v0");
    assert!(!Path::new("clean_sample.csv").exists());
    let record = fx.tracker.run_record(&report.run_id).unwrap();
    assert_eq!(record.used_artifacts, vec!["sample.csv:v0"]);
}

#[test]
fn test_row_outside_new_york_is_dropped() {
    let fx = Fixture::new();
    fx.seed_raw(&format!(
        "{}1,Inside,80,-73.9,40.7,0.5,2019-01-01\n2,Outside,80,-75.0,40.7,0.5,2019-01-01\n",
        HEADER
    ));

    let report = fx.pipeline().run(&fx.tracker, &request(10, 100)).unwrap();

    assert_eq!(report.output_rows, 1);
    let df = fx.published();
    assert_eq!(
        df.column("name").unwrap().str().unwrap().get(0),
        Some("Inside")
    );
}

#[test]
fn test_unparseable_date_becomes_null() {
    let fx = Fixture::new();
    fx.seed_raw(&format!(
        "{}1,A,80,-73.9,40.7,0.5,not-a-date\n2,B,80,-73.9,40.7,0.5,2019-05-21\n",
        HEADER
    ));

    fx.pipeline().run(&fx.tracker, &request(10, 100)).unwrap();

    let df = fx.published();
    assert_eq!(df.height(), 2);
    let last_review = df.column("last_review").unwrap();
    assert_eq!(last_review.null_count(), 1);
    assert!(last_review.is_null().get(0).unwrap());
}

#[test]
fn test_inverted_price_range_publishes_empty_dataset() {
    let fx = Fixture::new();
    fx.seed_raw(&format!(
        "{}1,A,5,-73.9,40.7,0.5,2019-01-01\n2,B,7,-73.9,40.7,0.5,2019-01-01\n",
        HEADER
    ));

    let report = fx.pipeline().run(&fx.tracker, &request(10, 5)).unwrap();
    assert_eq!(report.output_rows, 0);

    let mut run = fx.tracker.open_run("inspect").unwrap();
    let path = run
        .fetch_artifact(&ArtifactRef::latest("clean_sample.csv"))
        .unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), HEADER);
}

#[test]
fn test_dataset_without_known_columns_passes_through() {
    let fx = Fixture::new();
    fx.seed_raw("id,host_name\n1,John\n2,Jennifer\n");

    let report = fx.pipeline().run(&fx.tracker, &request(10, 5)).unwrap();

    assert_eq!(report.output_rows, 2);
    assert!(report.steps.iter().all(|s| !s.applied));
    assert_eq!(fx.published().height(), 2);
}

#[test]
fn test_scratch_file_removed_after_publish() {
    let fx = Fixture::new();
    fx.seed_raw(&format!("{}1,A,80,-73.9,40.7,0.5,2019-01-01\n", HEADER));

    fx.pipeline().run(&fx.tracker, &request(10, 100)).unwrap();

    assert!(!fx.scratch_file().exists());
}

#[test]
fn test_each_run_publishes_a_new_version() {
    let fx = Fixture::new();
    fx.seed_raw(&format!("{}1,A,80,-73.9,40.7,0.5,2019-01-01\n", HEADER));

    let first = fx.pipeline().run(&fx.tracker, &request(10, 100)).unwrap();
    let second = fx.pipeline().run(&fx.tracker, &request(10, 100)).unwrap();

    assert_eq!(first.published.version, 0);
    assert_eq!(second.published.version, 1);
    assert_ne!(first.run_id, second.run_id);
}

#[test]
fn test_run_record_holds_config_and_lineage() {
    let fx = Fixture::new();
    fx.seed_raw(&format!("{}1,A,80,-73.9,40.7,0.5,2019-01-01\n", HEADER));

    let report = fx.pipeline().run(&fx.tracker, &request(10, 350)).unwrap();
    let record = fx.tracker.run_record(&report.run_id).unwrap();

    assert_eq!(record.job_type, "basic_cleaning");
    assert_eq!(record.config["input_artifact"], json!("sample.csv:latest"));
    assert_eq!(record.config["min_price"], json!(10));
    assert_eq!(record.config["max_price"], json!(350));
    assert_eq!(record.used_artifacts, vec!["sample.csv:v0"]);
    assert_eq!(record.logged_artifacts, vec!["clean_sample.csv:v0"]);
}

// ==================== Failure Paths ====================

#[test]
fn test_missing_input_artifact() {
    let fx = Fixture::new();

    let result = fx.pipeline().run(&fx.tracker, &request(10, 100));

    assert!(matches!(
        result,
        Err(CleaningError::ArtifactNotFoundError(_))
    ));
    assert!(fx.tracker.versions("clean_sample.csv").unwrap().is_empty());
}

#[test]
fn test_missing_pinned_version() {
    let fx = Fixture::new();
    fx.seed_raw(&format!("{}1,A,80,-73.9,40.7,0.5,2019-01-01\n", HEADER));
    let request = CleanRequest::new("sample.csv:v4", "clean_sample.csv", "clean_sample", "d", 0, 1)
        .unwrap();

    let result = fx.pipeline().run(&fx.tracker, &request);

    match result {
        Err(CleaningError::ArtifactNotFoundError(msg)) => assert!(msg.contains("sample.csv:v4")),
        other => panic!("Expected ArtifactNotFoundError, got {:?}", other),
    }
}

#[test]
fn test_malformed_input_is_parse_error() {
    let fx = Fixture::new();
    fx.seed_raw("id,price\n1,80\n2,90,extra,fields\n");

    let result = fx.pipeline().run(&fx.tracker, &request(10, 100));

    assert!(matches!(result, Err(CleaningError::ParseError(_))));
    assert!(fx.tracker.versions("clean_sample.csv").unwrap().is_empty());
    assert!(!fx.scratch_file().exists());
}

#[test]
fn test_upload_failure_is_upload_error_and_cleans_up() {
    let fx = Fixture::new();
    fx.seed_raw(&format!("{}1,A,80,-73.9,40.7,0.5,2019-01-01\n", HEADER));
    let mut run = FailingUpload(fx.tracker.open_run("basic_cleaning").unwrap());

    let result = fx.pipeline().clean_with_run(&mut run, &request(10, 100));

    match result {
        Err(CleaningError::UploadError(msg)) => assert!(msg.contains("service unavailable")),
        other => panic!("Expected UploadError, got {:?}", other),
    }
    assert!(!fx.scratch_file().exists());
    assert!(fx.tracker.versions("clean_sample.csv").unwrap().is_empty());
}

#[test]
fn test_unwritable_scratch_dir_is_filesystem_error() {
    let fx = Fixture::new();
    fx.seed_raw(&format!("{}1,A,80,-73.9,40.7,0.5,2019-01-01\n", HEADER));
    let pipeline = CleaningPipeline::with_config(PipelineConfig {
        scratch_dir: fx.scratch.path().join("missing").join("dir"),
        ..Default::default()
    });

    let result = pipeline.run(&fx.tracker, &request(10, 100));

    assert!(matches!(result, Err(CleaningError::FilesystemError(_))));
    assert!(fx.tracker.versions("clean_sample.csv").unwrap().is_empty());
}
