//! Directory listings, stat and disk usage.

use tracing::debug;

use super::utils::relative_path;
use crate::api::DiskUsage;
use crate::error::{Result, StorageError};
use crate::fs::listing::{decode_stat_page, Listing, ListingKind};
use crate::fs::node::{DirectoryStats, Node};
use crate::service::{acquire, StorageService};

impl StorageService {
    /// Open a listing of the folder-relative `path`.
    pub(crate) async fn open_listing(&self, path: &str, kind: ListingKind) -> Result<Listing> {
        Listing::open(
            self.api().clone(),
            self.folder().to_string(),
            self.remote(path),
            kind,
            self.listing_pool(),
        )
        .await
    }

    /// List the immediate children of a directory, page by page.
    ///
    /// Child directories come back unresolved; pass them to
    /// [`resolve`](Self::resolve) to expand them.
    pub async fn dir(&self, path: &str) -> Result<Listing> {
        self.open_listing(path, ListingKind::Dir).await
    }

    /// Get the object at `path`.
    ///
    /// # Returns
    /// The node as reported by the server. Directories are unresolved.
    pub async fn stat(&self, path: &str) -> Result<Node> {
        self.stat_nodes(path, false)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::NotFound(relative_path(path)))
    }

    /// Stat `path` (implicit directories included) and resolve the result
    /// completely.
    ///
    /// # Errors
    /// `InvalidArgument` if the server does not report exactly one object.
    pub async fn dir_complete(&self, path: &str) -> Result<Node> {
        let mut nodes = self.stat_nodes(path, true).await?;
        if nodes.len() != 1 {
            return Err(StorageError::InvalidArgument(format!(
                "Expected exactly one object at '{}', found {}",
                relative_path(path),
                nodes.len()
            )));
        }
        let node = nodes.remove(0);
        self.resolve(&node).await?;
        Ok(node)
    }

    /// Aggregate file count and size below `path`.
    pub async fn du(&self, path: &str) -> Result<DiskUsage> {
        let remote = self.remote(path);
        let _permit = acquire(&self.listing_pool()).await?;
        let response = self.api().du(&remote).await?;
        debug!(path = %remote, files = response.info.files, bytes = response.info.bytes, "Disk usage");
        Ok(response.info)
    }

    async fn stat_nodes(&self, path: &str, implicit: bool) -> Result<Vec<Node>> {
        let relative = relative_path(path);
        let remote = self.remote(&relative);
        let page = {
            let _permit = acquire(&self.listing_pool()).await?;
            self.api().stat(&remote, implicit).await?
        };

        // The folder itself is reported under its parent; keep it as the root.
        if relative.is_empty() {
            let stats = page
                .files
                .first()
                .map(|entry| DirectoryStats {
                    bytes: entry.bytes,
                    files: entry.files,
                    mtime: Some(entry.mtime),
                })
                .unwrap_or_default();
            return Ok(vec![Node::directory("", "", false, stats, false)]);
        }
        Ok(decode_stat_page(self.folder(), &page))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ServiceConfig;
    use crate::testing::MemoryStore;

    fn service(store: &Arc<MemoryStore>) -> StorageService {
        StorageService::with_api(store.clone(), &ServiceConfig::new("mock", "/12345")).unwrap()
    }

    #[tokio::test]
    async fn test_stat_file() {
        let store = Arc::new(MemoryStore::new());
        store.add_file("/12345/a/b.txt", b"hello");
        let node = service(&store).stat("/a/b.txt").await.unwrap();
        assert_eq!(node.path(), "/a/b.txt");
        assert_eq!(node.directory_path(), "/a/");
        match node.kind() {
            crate::fs::node::NodeKind::File(info) => assert_eq!(info.size, 5),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stat_missing() {
        let store = Arc::new(MemoryStore::new());
        let err = service(&store).stat("/nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_stat_hides_implicit_directories() {
        let store = Arc::new(MemoryStore::new());
        store.add_file("/12345/implied/x", b"x");
        let service = service(&store);
        assert!(service.stat("/implied").await.unwrap_err().is_not_found());

        let node = service.dir_complete("/implied").await.unwrap();
        assert!(node.is_implicit());
        assert_eq!(node.children().len(), 1);
    }

    #[tokio::test]
    async fn test_stat_folder_root() {
        let store = Arc::new(MemoryStore::new());
        store.add_dir("/12345");
        let node = service(&store).stat("/").await.unwrap();
        assert_eq!(node.path(), "");
        assert!(node.is_directory());
        assert!(!node.as_directory().unwrap().is_resolved());
    }

    #[tokio::test]
    async fn test_dir_lists_children() {
        let store = Arc::new(MemoryStore::new());
        store.add_dir("/12345/d");
        store.add_file("/12345/d/f", b"1");
        store.add_dir("/12345/d/sub");
        store.add_file("/12345/d/sub/deeper", b"2");
        let nodes = service(&store).dir("/d").await.unwrap().collect_all().await.unwrap();
        let paths: Vec<&str> = nodes.iter().map(Node::path).collect();
        assert_eq!(paths, vec!["/d/f", "/d/sub"]);
        assert!(!nodes[1].as_directory().unwrap().is_resolved());
    }

    #[tokio::test]
    async fn test_dir_complete_resolves_subtree() {
        let store = Arc::new(MemoryStore::new().with_page_size(1));
        store.add_dir("/12345/d");
        store.add_file("/12345/d/a", b"1");
        store.add_file("/12345/d/x/y/b", b"2");
        let node = service(&store).dir_complete("/d").await.unwrap();
        assert_eq!(node.count_files(), 2);
        assert_eq!(node.node_count(), 5);
        assert!(node.find("/d/x").unwrap().is_implicit());
    }

    #[tokio::test]
    async fn test_du() {
        let store = Arc::new(MemoryStore::new());
        store.add_file("/12345/d/a", b"123");
        store.add_file("/12345/d/b/c", b"45");
        let usage = service(&store).du("/d").await.unwrap();
        assert_eq!(usage.files, 2);
        assert_eq!(usage.bytes, 5);
    }
}
