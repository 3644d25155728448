//! Disk-backed file store for uploaded images.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;

use quill_core::ports::{FileStore, FileStoreError};

const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];

/// The public URL prefix uploads are served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Stores uploads on the local filesystem under a configured directory,
/// naming files `<unix-millis><original-extension>`.
pub struct LocalFileStore {
    dir: PathBuf,
}

impl LocalFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store(&self, original_name: &str, data: Vec<u8>) -> Result<String, FileStoreError> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(FileStoreError::UnsupportedType);
        }

        let filename = format!("{}.{extension}", Utc::now().timestamp_millis());
        let path = self.dir.join(&filename);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| FileStoreError::Io(e.to_string()))?;
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| FileStoreError::Io(e.to_string()))?;

        tracing::debug!(file = %filename, "Stored uploaded image");
        Ok(format!("{UPLOADS_URL_PREFIX}/{filename}"))
    }
}
