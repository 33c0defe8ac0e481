//! Error types for tracking service operations.

/// Result type for tracking service operations
pub type TrackingResult<T> = Result<T, TrackingError>;

/// Error type for tracking service operations
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid artifact reference: {0}")]
    InvalidReference(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<std::io::Error> for TrackingError {
    fn from(e: std::io::Error) -> Self {
        TrackingError::StorageError(e.to_string())
    }
}

impl From<serde_json::Error> for TrackingError {
    fn from(e: serde_json::Error) -> Self {
        TrackingError::SerializationError(e.to_string())
    }
}
