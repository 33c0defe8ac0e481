//! Error types for the cleaning pipeline.

use polars::prelude::PolarsError;

use crate::tracking::TrackingError;

/// Result type for cleaning operations
pub type CleaningResult<T> = Result<T, CleaningError>;

/// Error type for cleaning operations.
///
/// Every variant is fatal for the run: the pipeline performs no local
/// recovery and no retries.
#[derive(Debug, thiserror::Error)]
pub enum CleaningError {
    #[error("Artifact not found: {0}")]
    ArtifactNotFoundError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Upload error: {0}")]
    UploadError(String),

    #[error("Filesystem error: {0}")]
    FilesystemError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Tracking error: {0}")]
    TrackingError(String),

    #[error("Transform error: {0}")]
    TransformError(#[from] PolarsError),
}

impl CleaningError {
    /// Map a failed artifact lookup. Unresolvable references and missing
    /// versions are both reported as not found.
    pub fn from_fetch(err: TrackingError) -> Self {
        match err {
            TrackingError::NotFound(msg) | TrackingError::InvalidReference(msg) => {
                CleaningError::ArtifactNotFoundError(msg)
            }
            other => CleaningError::TrackingError(other.to_string()),
        }
    }

    /// Map any failure while publishing the output artifact.
    pub fn from_publish(err: TrackingError) -> Self {
        CleaningError::UploadError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_not_found_maps_to_artifact_not_found() {
        let err = CleaningError::from_fetch(TrackingError::NotFound("sample.csv:v9".into()));
        assert!(matches!(err, CleaningError::ArtifactNotFoundError(_)));
        assert_eq!(err.to_string(), "Artifact not found: sample.csv:v9");
    }

    #[test]
    fn test_fetch_storage_failure_stays_tracking_error() {
        let err = CleaningError::from_fetch(TrackingError::StorageError("digest mismatch".into()));
        assert!(matches!(err, CleaningError::TrackingError(_)));
    }

    #[test]
    fn test_publish_failure_maps_to_upload_error() {
        let err = CleaningError::from_publish(TrackingError::StorageError("disk full".into()));
        assert!(matches!(err, CleaningError::UploadError(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
