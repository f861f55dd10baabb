//! Single object mutations.

use tracing::debug;

use super::utils::{now_unix, relative_path};
use crate::error::{Result, StorageError};
use crate::service::StorageService;

/// Turn a `false` answer into an error.
pub(crate) fn acknowledged(operation: &str, remote: &str, accepted: bool) -> Result<()> {
    if accepted {
        debug!(operation, path = %remote, "Request acknowledged");
        Ok(())
    } else {
        Err(StorageError::unspecific(format!(
            "{} of '{}' was not acknowledged",
            operation, remote
        )))
    }
}

impl StorageService {
    /// Delete a single file or symlink.
    ///
    /// Use [`delete_recursive`](Self::delete_recursive) for directories.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let relative = relative_path(path);
        if relative.is_empty() {
            return Err(StorageError::InvalidArgument(
                "Cannot delete the storage folder".to_string(),
            ));
        }
        let remote = self.remote(&relative);
        let accepted = self.api().delete(&remote).await?;
        acknowledged("delete", &remote, accepted)
    }

    /// Create a directory. The parent must already exist.
    pub async fn mkdir(&self, path: &str) -> Result<()> {
        let remote = self.remote(path);
        let accepted = self.api().mkdir(&remote).await?;
        acknowledged("mkdir", &remote, accepted)
    }

    /// Remove an empty directory.
    pub async fn rmdir(&self, path: &str) -> Result<()> {
        let remote = self.remote(path);
        let accepted = self.api().rmdir(&remote).await?;
        acknowledged("rmdir", &remote, accepted)
    }

    /// Move a file to `new_path`. Both paths are relative to the folder.
    pub async fn rename(&self, path: &str, new_path: &str) -> Result<()> {
        let remote = self.remote(path);
        let destination = self.remote(new_path);
        let accepted = self.api().rename(&remote, &destination).await?;
        acknowledged("rename", &remote, accepted)
    }

    /// Create a symlink at `path` pointing to `target`.
    pub async fn symlink(&self, path: &str, target: &str) -> Result<()> {
        let remote = self.remote(path);
        let target = self.remote(target);
        let accepted = self.api().symlink(&remote, &target).await?;
        acknowledged("symlink", &remote, accepted)
    }

    /// Set the modification time of an object; `None` means now.
    pub async fn set_mtime(&self, path: &str, mtime: Option<i64>) -> Result<()> {
        let remote = self.remote(path);
        let mtime = mtime.unwrap_or_else(now_unix);
        let accepted = self.api().mtime(&remote, mtime).await?;
        acknowledged("mtime", &remote, accepted)
    }

    /// Set metadata parameters on an object.
    pub async fn set_metadata(&self, path: &str, params: &[(String, String)]) -> Result<()> {
        let remote = self.remote(path);
        let accepted = self.api().set_metadata(&remote, params).await?;
        acknowledged("setmd", &remote, accepted)
    }
}
