//! Blob storage port for uploaded images.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("Only image files are allowed")]
    UnsupportedType,

    #[error("Failed to store file: {0}")]
    Io(String),
}

/// Stores an uploaded file and returns the public URL it is served under.
///
/// A failed write aborts the surrounding create/update; there is no retry.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn store(&self, original_name: &str, data: Vec<u8>) -> Result<String, FileStoreError>;
}
