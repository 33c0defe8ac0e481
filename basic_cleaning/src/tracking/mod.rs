//! Experiment-tracking collaborator.
//!
//! The pipeline never talks to a storage backend directly. It receives a
//! caller-owned [`RunContext`] and uses it to record its configuration, fetch the
//! input artifact and publish the output artifact. Versioning and lineage are
//! the tracking service's business.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for tracking operations
//! - [`local`]: Filesystem-backed tracker with versioned artifacts and run records
//! - [`checksum`]: Content digests for stored files

pub mod checksum;
pub mod error;
pub mod local;

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::core::{ArtifactDescriptor, ArtifactRef, ArtifactVersion};

pub use error::{TrackingError, TrackingResult};
pub use local::{ArtifactManifest, LocalRun, LocalTracker, RunRecord};

/// Handle to one tracked execution.
///
/// There is no explicit close: everything recorded through the handle is
/// durable when the call returns, so dropping the handle ends the run.
pub trait RunContext {
    fn run_id(&self) -> &str;

    /// Merge `config` into the run's recorded configuration.
    fn set_config(&mut self, config: Map<String, Value>) -> TrackingResult<()>;

    /// Resolve an artifact reference to a readable local file, recording the
    /// artifact as an input of this run.
    fn fetch_artifact(&mut self, reference: &ArtifactRef) -> TrackingResult<PathBuf>;

    /// Store `local_path` as a new version of the described artifact,
    /// recording it as an output of this run.
    fn publish_artifact(
        &mut self,
        descriptor: &ArtifactDescriptor,
        local_path: &Path,
    ) -> TrackingResult<ArtifactVersion>;
}

/// Entry point of a tracking backend.
pub trait TrackingService {
    type Run: RunContext;

    fn open_run(&self, job_type: &str) -> TrackingResult<Self::Run>;
}
