//! Recursive deletion.
//!
//! A directory is removed only after every child has been removed.
//! Implicit directories have no object of their own and are never deleted
//! themselves. Objects that are already gone count as deleted.

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, error, info};

use super::resolve::resolve_tree;
use super::utils::{join_children, relative_path, run_task};
use crate::error::{Result, StorageError};
use crate::fs::node::Node;
use crate::service::StorageService;

pub(crate) fn delete_tree(service: StorageService, node: Node) -> BoxFuture<'static, Result<()>> {
    async move {
        if let Some(dir) = node.as_directory() {
            resolve_tree(service.clone(), node.clone()).await?;

            let pending = dir
                .children()
                .into_iter()
                .map(|child| tokio::spawn(delete_tree(service.clone(), child)))
                .collect();
            join_children(pending).await?;

            if dir.is_implicit() {
                info!(path = %node.path(), "Skipping implicit directory");
                return Ok(());
            }
            if node.path().is_empty() {
                info!(folder = %service.folder(), "Keeping the storage folder itself");
                return Ok(());
            }
        }
        remove_object(&service, &node).await
    }
    .boxed()
}

async fn remove_object(service: &StorageService, node: &Node) -> Result<()> {
    let remote = service.remote(node.path());
    let _permit = service.deletion_permit().await?;
    let result = if node.is_directory() {
        service.api().rmdir(&remote).await
    } else {
        service.api().delete(&remote).await
    };
    match result {
        Ok(true) => {
            debug!(path = %remote, "Deleted");
            Ok(())
        }
        Ok(false) => {
            error!(path = %remote, "Delete was not acknowledged");
            Err(StorageError::unspecific(format!(
                "Delete of '{}' was not acknowledged",
                remote
            )))
        }
        Err(e) if e.is_not_found() => {
            info!(path = %remote, "Already deleted");
            Ok(())
        }
        Err(e) => {
            error!(path = %remote, error = %e, "Delete failed");
            Err(e)
        }
    }
}

impl StorageService {
    /// Delete `node` and everything below it, children before parents.
    ///
    /// Directories are resolved first if needed. Returns once the whole
    /// subtree is gone or the first failure is known; deletions already in
    /// flight at that point still run to completion.
    pub async fn delete_node(&self, node: &Node) -> Result<()> {
        run_task(delete_tree(self.clone(), node.clone())).await
    }

    /// Delete `path` recursively.
    ///
    /// Deleting a path that does not exist succeeds without doing anything.
    ///
    /// # Example
    /// ```no_run
    /// # async fn example(service: netstorage::StorageService) -> netstorage::Result<()> {
    /// service.delete_recursive("/releases/2019").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn delete_recursive(&self, path: &str) -> Result<()> {
        let relative = relative_path(path);
        if relative.is_empty() {
            return Err(StorageError::InvalidArgument(
                "Refusing to delete the whole storage folder".to_string(),
            ));
        }
        let node = match self.dir_complete(&relative).await {
            Ok(node) => node,
            Err(e) if e.is_not_found() => {
                info!(path = %relative, "Nothing to delete");
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        debug!(path = %relative, nodes = node.node_count(), "Deleting subtree");
        self.delete_node(&node).await
    }

    /// Ask the server to delete `path` recursively on its own.
    ///
    /// Returns as soon as the request is accepted; the deletion itself
    /// finishes later and cannot be observed per object.
    pub async fn quick_delete(&self, path: &str) -> Result<bool> {
        let relative = relative_path(path);
        if relative.is_empty() {
            return Err(StorageError::InvalidArgument(
                "Refusing to delete the whole storage folder".to_string(),
            ));
        }
        let remote = self.remote(&relative);
        let _permit = self.deletion_permit().await?;
        let accepted = self.api().quick_delete(&remote).await?;
        info!(path = %remote, accepted, "Requested server side recursive delete");
        Ok(accepted)
    }
}
