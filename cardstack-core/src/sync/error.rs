//! Sync error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur talking to the image host or document store.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The request could not be sent or the response could not be read
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The image host answered but reported a failure
    #[error("Image host rejected upload: {0}")]
    UploadError(String),

    /// No document identifier could be resolved
    #[error("Document store unavailable: {0}")]
    StoreUnavailable(String),

    /// Server answered with a non-success status
    #[error("Server returned status {0}")]
    StatusError(u16),

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    StorageError(#[from] StorageError),
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SyncError::InvalidResponse(e.to_string())
        } else {
            SyncError::NetworkError(e.to_string())
        }
    }
}
