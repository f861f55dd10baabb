//! Downloads.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::service::StorageService;

impl StorageService {
    /// Download the object at `path` into memory.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>> {
        let remote = self.remote(path);
        let data = self.api().download(&remote).await?;
        debug!(path = %remote, size = data.len(), "Downloaded");
        Ok(data)
    }

    /// Download the object at `path` into a local file.
    ///
    /// # Returns
    /// Number of bytes written.
    pub async fn download_to_file<P: AsRef<Path>>(&self, path: &str, local: P) -> Result<u64> {
        let data = self.download(path).await?;
        tokio::fs::write(local.as_ref(), &data).await?;
        Ok(data.len() as u64)
    }
}
