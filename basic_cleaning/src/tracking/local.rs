//! Filesystem-backed tracking service.
//!
//! Artifacts and run records live under a root directory, one subdirectory per
//! project:
//!
//! ```text
//! <root>/<project>/artifacts/<name>/v<N>/<file>
//! <root>/<project>/artifacts/<name>/v<N>/manifest.json
//! <root>/<project>/runs/<run_id>.json
//! ```
//!
//! Versions are numbered from `v0`. A version exists once its manifest has
//! been written; `latest` is the highest existing version.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use super::checksum::file_digest;
use super::{RunContext, TrackingError, TrackingResult, TrackingService};
use crate::core::domain::validate_artifact_name;
use crate::core::{ArtifactAlias, ArtifactDescriptor, ArtifactRef, ArtifactVersion};

const MANIFEST_FILE: &str = "manifest.json";

/// Stored metadata of one artifact version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub name: String,
    pub version: u32,
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub description: String,
    pub file: String,
    pub digest: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub producer_run: Option<String>,
}

impl ArtifactManifest {
    pub fn to_version(&self) -> ArtifactVersion {
        ArtifactVersion {
            name: self.name.clone(),
            version: self.version,
            digest: self.digest.clone(),
            size_bytes: self.size_bytes,
        }
    }
}

/// Lineage record of one run: its configuration, inputs and outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub job_type: String,
    pub project: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub config: Map<String, Value>,
    #[serde(default)]
    pub used_artifacts: Vec<String>,
    #[serde(default)]
    pub logged_artifacts: Vec<String>,
}

/// Tracking service storing everything on the local filesystem.
///
/// # Example
/// ```no_run
/// use basic_cleaning::core::{ArtifactDescriptor, ArtifactRef};
/// use basic_cleaning::tracking::{LocalTracker, RunContext, TrackingService};
/// use std::path::Path;
///
/// let tracker = LocalTracker::new(".tracking", "nyc_airbnb");
/// tracker
///     .import_file(
///         &ArtifactDescriptor::new("sample.csv", "raw_data", "Raw listings"),
///         Path::new("sample.csv"),
///     )
///     .unwrap();
///
/// let mut run = tracker.open_run("basic_cleaning").unwrap();
/// let path = run.fetch_artifact(&ArtifactRef::latest("sample.csv")).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct LocalTracker {
    root: PathBuf,
    project: String,
}

impl LocalTracker {
    pub fn new(root: impl Into<PathBuf>, project: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            project: project.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    fn project_dir(&self) -> PathBuf {
        self.root.join(&self.project)
    }

    fn artifact_dir(&self, name: &str) -> PathBuf {
        self.project_dir().join("artifacts").join(name)
    }

    fn version_dir(&self, name: &str, version: u32) -> PathBuf {
        self.artifact_dir(name).join(format!("v{}", version))
    }

    fn runs_dir(&self) -> PathBuf {
        self.project_dir().join("runs")
    }

    /// Existing versions of an artifact, ascending.
    pub fn versions(&self, name: &str) -> TrackingResult<Vec<u32>> {
        let dir = self.artifact_dir(name);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut versions = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(version) = file_name
                .to_str()
                .and_then(|s| s.strip_prefix('v'))
                .and_then(|n| n.parse::<u32>().ok())
            else {
                continue;
            };
            if entry.path().join(MANIFEST_FILE).is_file() {
                versions.push(version);
            }
        }
        versions.sort_unstable();
        Ok(versions)
    }

    /// Resolve a reference to the manifest of a concrete version.
    pub fn resolve(&self, reference: &ArtifactRef) -> TrackingResult<ArtifactManifest> {
        validate_artifact_name(&reference.name).map_err(TrackingError::InvalidReference)?;

        let versions = self.versions(&reference.name)?;
        let version = match reference.alias {
            ArtifactAlias::Latest => versions.last().copied(),
            ArtifactAlias::Version(v) => versions.contains(&v).then_some(v),
        }
        .ok_or_else(|| TrackingError::NotFound(reference.to_string()))?;

        self.read_manifest(&reference.name, version)
    }

    fn read_manifest(&self, name: &str, version: u32) -> TrackingResult<ArtifactManifest> {
        let content = fs::read_to_string(self.version_dir(name, version).join(MANIFEST_FILE))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Register a local file as a new artifact version outside of any run.
    ///
    /// Used to seed raw datasets that were produced elsewhere.
    pub fn import_file(
        &self,
        descriptor: &ArtifactDescriptor,
        local_path: &Path,
    ) -> TrackingResult<ArtifactVersion> {
        self.store(descriptor, local_path, None)
            .map(|manifest| manifest.to_version())
    }

    fn store(
        &self,
        descriptor: &ArtifactDescriptor,
        local_path: &Path,
        producer_run: Option<&str>,
    ) -> TrackingResult<ArtifactManifest> {
        validate_artifact_name(&descriptor.name).map_err(TrackingError::InvalidReference)?;

        let file = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| *n != MANIFEST_FILE)
            .ok_or_else(|| {
                TrackingError::StorageError(format!(
                    "Cannot store {} as an artifact file",
                    local_path.display()
                ))
            })?
            .to_string();

        let version = self
            .versions(&descriptor.name)?
            .last()
            .map_or(0, |latest| latest + 1);
        let dir = self.version_dir(&descriptor.name, version);
        fs::create_dir_all(&dir)?;

        let stored = dir.join(&file);
        fs::copy(local_path, &stored).map_err(|e| {
            TrackingError::StorageError(format!("Failed to copy {}: {}", local_path.display(), e))
        })?;
        let (digest, size_bytes) = file_digest(&stored)?;

        let manifest = ArtifactManifest {
            name: descriptor.name.clone(),
            version,
            artifact_type: descriptor.artifact_type.clone(),
            description: descriptor.description.clone(),
            file,
            digest,
            size_bytes,
            created_at: Utc::now(),
            producer_run: producer_run.map(str::to_string),
        };
        fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_string_pretty(&manifest)?,
        )?;

        info!(
            "Stored artifact {}:v{} ({} bytes)",
            manifest.name, manifest.version, manifest.size_bytes
        );
        Ok(manifest)
    }

    /// Load the lineage record of a run.
    pub fn run_record(&self, run_id: &str) -> TrackingResult<RunRecord> {
        let path = self.runs_dir().join(format!("{}.json", run_id));
        if !path.is_file() {
            return Err(TrackingError::NotFound(format!("run {}", run_id)));
        }
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    fn write_run_record(&self, record: &RunRecord) -> TrackingResult<()> {
        let dir = self.runs_dir();
        fs::create_dir_all(&dir)?;
        fs::write(
            dir.join(format!("{}.json", record.run_id)),
            serde_json::to_string_pretty(record)?,
        )?;
        Ok(())
    }
}

impl TrackingService for LocalTracker {
    type Run = LocalRun;

    fn open_run(&self, job_type: &str) -> TrackingResult<LocalRun> {
        let record = RunRecord {
            run_id: Uuid::new_v4().to_string(),
            job_type: job_type.to_string(),
            project: self.project.clone(),
            started_at: Utc::now(),
            config: Map::new(),
            used_artifacts: Vec::new(),
            logged_artifacts: Vec::new(),
        };
        self.write_run_record(&record)?;

        info!("Opened {} run {}", record.job_type, record.run_id);
        Ok(LocalRun {
            tracker: self.clone(),
            record,
        })
    }
}

/// A run of the [`LocalTracker`]. Every mutation rewrites the run record.
#[derive(Debug)]
pub struct LocalRun {
    tracker: LocalTracker,
    record: RunRecord,
}

impl RunContext for LocalRun {
    fn run_id(&self) -> &str {
        &self.record.run_id
    }

    fn set_config(&mut self, config: Map<String, Value>) -> TrackingResult<()> {
        self.record.config.extend(config);
        self.tracker.write_run_record(&self.record)
    }

    fn fetch_artifact(&mut self, reference: &ArtifactRef) -> TrackingResult<PathBuf> {
        let manifest = self.tracker.resolve(reference)?;
        let path = self
            .tracker
            .version_dir(&manifest.name, manifest.version)
            .join(&manifest.file);

        let (digest, _) = file_digest(&path)?;
        if digest != manifest.digest {
            return Err(TrackingError::StorageError(format!(
                "Digest mismatch for {}:v{}",
                manifest.name, manifest.version
            )));
        }

        let version = manifest.to_version();
        debug!("Resolved {} to {}", reference, version);
        self.record.used_artifacts.push(version.to_string());
        self.tracker.write_run_record(&self.record)?;
        Ok(path)
    }

    fn publish_artifact(
        &mut self,
        descriptor: &ArtifactDescriptor,
        local_path: &Path,
    ) -> TrackingResult<ArtifactVersion> {
        let manifest = self
            .tracker
            .store(descriptor, local_path, Some(&self.record.run_id))?;

        let version = manifest.to_version();
        self.record.logged_artifacts.push(version.to_string());
        self.tracker.write_run_record(&self.record)?;
        Ok(version)
    }
}
