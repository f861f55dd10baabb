//! Tree reconstruction from bulk listings.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::utils::relative_path;
use crate::error::Result;
use crate::fs::listing::ListingKind;
use crate::fs::node::Node;
use crate::service::StorageService;

/// Merges a flat sequence of listed nodes into a tree.
///
/// Bulk listings return objects at any depth and leave out directories that
/// were never created explicitly. The builder synthesizes an implicit
/// directory for every missing ancestor so that each node's parent exists.
///
/// Insertion is sequential: feed entries in the order a single listing
/// yields them.
///
/// # Example
/// ```
/// use netstorage::TreeBuilder;
///
/// let builder = TreeBuilder::new("/cp");
/// let tree = builder.finish();
/// assert_eq!(tree.path(), "/cp");
/// assert_eq!(tree.node_count(), 1);
/// ```
#[derive(Debug)]
pub struct TreeBuilder {
    root: Node,
    /// Directory nodes keyed by the `directory` value of their children.
    index: HashMap<String, Node>,
}

impl TreeBuilder {
    /// Start a tree rooted at the explicit directory `path` (`""` or `"/"`
    /// for the storage root). Trailing slashes are ignored.
    pub fn new(path: &str) -> Self {
        let root = Node::directory_at(&relative_path(path), false, true);
        let mut index = HashMap::new();
        index.insert(root.child_prefix(), root.clone());
        Self { root, index }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Insert one listed node. Returns `false` if the node lies outside the
    /// root and was skipped.
    pub fn insert(&mut self, entry: Node) -> bool {
        if entry.path() == self.root.path() {
            debug!(path = %entry.path(), "Skipping listing entry for the root itself");
            return false;
        }
        if !entry.directory_path().starts_with(&self.root.child_prefix()) {
            warn!(
                path = %entry.path(),
                root = %self.root.path(),
                "Skipping listing entry outside the listed root"
            );
            return false;
        }
        insert(&self.root, entry, &mut self.index);
        true
    }

    pub fn finish(self) -> Node {
        self.root
    }
}

fn insert(current: &Node, entry: Node, index: &mut HashMap<String, Node>) {
    if entry.directory_path() == current.child_prefix() {
        attach(current, entry, index);
        return;
    }

    if let Some(owner) = index.get(entry.directory_path()).cloned() {
        insert(&owner, entry, index);
        return;
    }

    // Parent unknown: synthesize it, then hang it below its own parent.
    let directory = entry.directory_path();
    let parent = Node::directory_at(&directory[..directory.len() - 1], true, true);
    debug!(path = %parent.path(), "Synthesized implicit directory");
    index.insert(parent.child_prefix(), parent.clone());
    attach(&parent, entry, index);
    insert(current, parent, index);
}

fn attach(parent: &Node, entry: Node, index: &mut HashMap<String, Node>) {
    let Some(dir) = parent.as_directory() else {
        return;
    };
    if let Some(new_dir) = entry.as_directory() {
        let key = entry.child_prefix();
        if let Some(old_dir) = index.get(&key).and_then(Node::as_directory) {
            if !Arc::ptr_eq(old_dir, new_dir) {
                new_dir.adopt_children(old_dir);
            }
        }
        index.insert(key, entry.clone());
    }
    dir.attach(entry);
}

impl StorageService {
    /// Build the complete tree below `path` from one bulk listing.
    ///
    /// Directories are returned resolved; intermediate directories the
    /// server never reported are marked implicit.
    ///
    /// # Example
    /// ```no_run
    /// # async fn example(service: netstorage::StorageService) -> netstorage::Result<()> {
    /// let tree = service.list("/images").await?;
    /// for child in tree.children() {
    ///     println!("{}", child);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self, path: &str) -> Result<Node> {
        let relative = relative_path(path);
        let end = if relative.is_empty() {
            None
        } else {
            Some(format!("{}0", self.remote(&relative)))
        };
        let mut listing = self
            .open_listing(&relative, ListingKind::Tree { end })
            .await?;

        let mut builder = TreeBuilder::new(&relative);
        while let Some(entry) = listing.next_entry().await? {
            builder.insert(entry);
        }
        let tree = builder.finish();
        debug!(path = %relative, nodes = tree.node_count(), "Built tree");
        Ok(tree)
    }
}
