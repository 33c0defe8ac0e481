//! Configuration file support.
//!
//! Settings are read from a TOML file and may be overridden from the
//! environment. Every setting has a default, so running without a
//! configuration file is valid.
//!
//! ```toml
//! [tracking]
//! root = ".tracking"
//! project = "nyc_airbnb"
//!
//! [output]
//! scratch_dir = "."
//! filename = "clean_sample.csv"
//! date_format = "%Y-%m-%d"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CleaningError, CleaningResult};
use crate::preprocessing::PipelineConfig;
use crate::tracking::LocalTracker;
use crate::transformations::DEFAULT_DATE_FORMAT;

/// Environment variable overriding `tracking.root`.
pub const TRACKING_ROOT_ENV: &str = "CLEANING_TRACKING_ROOT";
/// Environment variable overriding `tracking.project`.
pub const PROJECT_ENV: &str = "CLEANING_PROJECT";

const CONFIG_FILE_NAME: &str = "basic_cleaning.toml";

/// Settings loaded from `basic_cleaning.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub tracking: TrackingSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Where the local tracker keeps artifacts and run records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingSettings {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_project")]
    pub project: String,
}

/// Temporary output file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_root() -> PathBuf {
    PathBuf::from(".tracking")
}

fn default_project() -> String {
    "nyc_airbnb".to_string()
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_filename() -> String {
    "clean_sample.csv".to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            root: default_root(),
            project: default_project(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            filename: default_filename(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> CleaningResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CleaningError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            CleaningError::ConfigurationError(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load settings from the default location.
    ///
    /// Searches for `basic_cleaning.toml` in:
    /// 1. Current directory
    /// 2. Parent directory
    ///
    /// Falls back to defaults when no file is found.
    pub fn from_default_location() -> CleaningResult<Self> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            Path::new("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                tracing::debug!("Using configuration {}", path.display());
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load from `explicit` if given, else the default location, then apply
    /// environment overrides and validate.
    pub fn load(explicit: Option<&Path>) -> CleaningResult<Self> {
        let mut settings = match explicit {
            Some(path) => Self::from_file(path)?,
            None => Self::from_default_location()?,
        };
        settings.apply_overrides(
            std::env::var(TRACKING_ROOT_ENV).ok(),
            std::env::var(PROJECT_ENV).ok(),
        );
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_overrides(&mut self, root: Option<String>, project: Option<String>) {
        if let Some(root) = root.filter(|r| !r.is_empty()) {
            self.tracking.root = PathBuf::from(root);
        }
        if let Some(project) = project.filter(|p| !p.is_empty()) {
            self.tracking.project = project;
        }
    }

    pub fn validate(&self) -> CleaningResult<()> {
        if self.tracking.project.is_empty() {
            return Err(CleaningError::ConfigurationError(
                "'tracking.project' must not be empty".to_string(),
            ));
        }
        let project = &self.tracking.project;
        if project.contains(&['/', '\\'][..]) || project.contains("..") {
            return Err(CleaningError::ConfigurationError(format!(
                "'tracking.project' is not a valid project name: {}",
                self.tracking.project
            )));
        }
        if self.output.filename.is_empty() {
            return Err(CleaningError::ConfigurationError(
                "'output.filename' must not be empty".to_string(),
            ));
        }
        if self.output.filename.contains(&['/', '\\'][..]) {
            return Err(CleaningError::ConfigurationError(format!(
                "'output.filename' must be a bare file name: {}",
                self.output.filename
            )));
        }
        if self.output.date_format.is_empty() {
            return Err(CleaningError::ConfigurationError(
                "'output.date_format' must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            scratch_dir: self.output.scratch_dir.clone(),
            output_filename: self.output.filename.clone(),
            date_format: self.output.date_format.clone(),
        }
    }

    pub fn tracker(&self) -> LocalTracker {
        LocalTracker::new(&self.tracking.root, &self.tracking.project)
    }
}
