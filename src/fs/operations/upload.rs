//! Uploads.

use std::path::Path;
use std::time::UNIX_EPOCH;

use tracing::debug;

use super::dir_ops::acknowledged;
use super::utils::{now_unix, sha256_hex};
use crate::api::UploadOptions;
use crate::error::{Result, StorageError};
use crate::service::StorageService;

/// Checksummed options for uploading `data` to `path`.
fn upload_options(path: &str, data: &[u8], mtime: i64) -> UploadOptions {
    UploadOptions {
        mtime: Some(mtime),
        size: Some(data.len() as u64),
        sha256: Some(sha256_hex(data)),
        index_zip: path.ends_with(".zip"),
        ..Default::default()
    }
}

impl StorageService {
    /// Upload `data` to `path`, stamped with the current time.
    ///
    /// The server verifies the body against its size and SHA-256. Zip
    /// archives are indexed for serve-from-zip.
    pub async fn upload(&self, path: &str, data: Vec<u8>) -> Result<()> {
        let options = upload_options(path, &data, now_unix());
        self.upload_with_options(path, data, options).await
    }

    /// Upload with explicit options.
    pub async fn upload_with_options(
        &self,
        path: &str,
        data: Vec<u8>,
        options: UploadOptions,
    ) -> Result<()> {
        let remote = self.remote(path);
        debug!(path = %remote, size = data.len(), "Uploading");
        let accepted = self.api().upload(&remote, data, options).await?;
        acknowledged("upload", &remote, accepted)
    }

    /// Upload a local file, keeping its modification time.
    ///
    /// # Errors
    /// `LocalFileNotFound` if `local` does not exist.
    pub async fn upload_file<P: AsRef<Path>>(&self, path: &str, local: P) -> Result<()> {
        let local = local.as_ref();
        let metadata = tokio::fs::metadata(local).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                StorageError::LocalFileNotFound(local.display().to_string())
            }
            _ => StorageError::from(e),
        })?;
        if !metadata.is_file() {
            return Err(StorageError::InvalidArgument(format!(
                "'{}' is not a regular file",
                local.display()
            )));
        }
        let mtime = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or_else(now_unix);

        let data = tokio::fs::read(local).await?;
        let options = upload_options(path, &data, mtime);
        self.upload_with_options(path, data, options).await
    }
}
