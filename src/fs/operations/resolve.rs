//! Lazy, recursive expansion of directories.

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info};

use super::utils::{join_children, run_task};
use crate::error::Result;
use crate::fs::listing::ListingKind;
use crate::fs::node::{Directory, Node, Resolution};
use crate::service::StorageService;

/// Resolve `node` and every directory below it.
///
/// The directory's latch is held for the whole resolution, so concurrent
/// callers wait for the first one and then see its outcome. Files and
/// symlinks resolve immediately.
pub(crate) fn resolve_tree(service: StorageService, node: Node) -> BoxFuture<'static, Result<()>> {
    async move {
        let Some(dir) = node.as_directory().cloned() else {
            return Ok(());
        };
        let mut latch = dir.resolution.lock().await;
        match &*latch {
            Resolution::Resolved => return Ok(()),
            Resolution::Failed(e) => return Err(e.clone()),
            Resolution::Unresolved => {}
        }

        let result = list_children(&service, &node, &dir).await;
        *latch = match &result {
            Ok(()) => Resolution::Resolved,
            Err(e) => Resolution::Failed(e.clone()),
        };
        result
    }
    .boxed()
}

async fn list_children(service: &StorageService, node: &Node, dir: &Directory) -> Result<()> {
    let mut listing = match service.open_listing(node.path(), ListingKind::Dir).await {
        Ok(listing) => listing,
        Err(e) if e.is_not_found() => {
            info!(path = %node.path(), "Directory vanished before listing, treating as empty");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let mut pending = Vec::new();
    loop {
        let child = match listing.next_entry().await {
            Ok(Some(child)) => child,
            Ok(None) => break,
            Err(e) if e.is_not_found() => {
                info!(path = %node.path(), "Directory vanished while listing");
                break;
            }
            Err(e) => return Err(e),
        };
        dir.attach(child.clone());
        if child.is_directory() {
            pending.push(tokio::spawn(resolve_tree(service.clone(), child)));
        }
    }

    debug!(path = %node.path(), children = dir.child_count(), "Listed directory");
    join_children(pending).await
}

impl StorageService {
    /// Discover the full subtree below `node`.
    ///
    /// Each directory is listed at most once, however many callers ask for
    /// it. A directory that disappears before it is listed ends up with no
    /// children.
    ///
    /// A failed resolution is remembered on the node; to retry, `stat` the
    /// path again and resolve the fresh node.
    pub async fn resolve(&self, node: &Node) -> Result<()> {
        run_task(resolve_tree(self.clone(), node.clone())).await
    }
}
