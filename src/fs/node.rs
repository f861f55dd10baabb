//! Filesystem node types.
//!
//! A node is identified by its `directory` (always starting and ending with
//! `/`, empty for the storage root) and its leaf name `file`; the node's
//! `path` is their concatenation. Directories own their children and a
//! resolution latch that records whether the children have been listed.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::error::StorageError;

/// File payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
    /// Size in bytes
    pub size: u64,
    /// Hex MD5 of the content, when the server reports it
    pub md5: Option<String>,
    /// Modification time (Unix seconds)
    pub mtime: i64,
}

/// Symlink payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymlinkInfo {
    /// Link target; bulk listings do not report it
    pub target: Option<String>,
    pub mtime: i64,
}

/// Aggregates a `stat` or `dir` reports for a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    /// Bytes stored below the directory
    pub bytes: Option<u64>,
    /// Files stored below the directory
    pub files: Option<u64>,
    pub mtime: Option<i64>,
}

/// State of a directory's resolution latch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// Children not listed yet.
    Unresolved,
    /// Children (and their subtrees) are complete.
    Resolved,
    /// Listing failed; every later caller sees the same error.
    Failed(StorageError),
}

/// Directory payload, shared between every clone of its node.
#[derive(Debug)]
pub struct Directory {
    implicit: bool,
    stats: DirectoryStats,
    children: RwLock<BTreeMap<String, Node>>,
    pub(crate) resolution: Mutex<Resolution>,
}

impl Directory {
    fn new(implicit: bool, stats: DirectoryStats, resolved: bool) -> Self {
        let resolution = if resolved {
            Resolution::Resolved
        } else {
            Resolution::Unresolved
        };
        Self {
            implicit,
            stats,
            children: RwLock::new(BTreeMap::new()),
            resolution: Mutex::new(resolution),
        }
    }

    /// True if the directory was synthesized from its descendants' paths and
    /// never existed as an object of its own.
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    pub fn stats(&self) -> DirectoryStats {
        self.stats
    }

    /// Snapshot of the children, ordered by name.
    pub fn children(&self) -> Vec<Node> {
        self.children.read().values().cloned().collect()
    }

    pub fn child(&self, name: &str) -> Option<Node> {
        self.children.read().get(name).cloned()
    }

    pub fn child_count(&self) -> usize {
        self.children.read().len()
    }

    /// Whether the children are known to be complete.
    ///
    /// Returns `false` while a resolution is in flight.
    pub fn is_resolved(&self) -> bool {
        matches!(
            self.resolution.try_lock().as_deref(),
            Ok(Resolution::Resolved)
        )
    }

    /// Insert `child` under its leaf name and return the node it replaced.
    pub(crate) fn attach(&self, child: Node) -> Option<Node> {
        self.children.write().insert(child.file.clone(), child)
    }

    /// Move every child of `other` into this directory.
    pub(crate) fn adopt_children(&self, other: &Directory) {
        let taken = std::mem::take(&mut *other.children.write());
        self.children.write().extend(taken);
    }
}

/// Variant payload of a [`Node`].
#[derive(Debug, Clone)]
pub enum NodeKind {
    File(FileInfo),
    Symlink(SymlinkInfo),
    Directory(Arc<Directory>),
}

/// A file, symlink or directory in a NetStorage tree.
///
/// Cloning is cheap for directories: clones share the children and the
/// resolution latch.
#[derive(Debug, Clone)]
pub struct Node {
    directory: String,
    file: String,
    path: String,
    kind: NodeKind,
}

/// Split a path into its directory (with trailing `/`) and leaf name.
///
/// The empty path is the storage root: `("", "")`.
pub(crate) fn split_path(path: &str) -> (String, String) {
    if path.is_empty() {
        return (String::new(), String::new());
    }
    match path.rfind('/') {
        Some(idx) => (path[..=idx].to_string(), path[idx + 1..].to_string()),
        None => ("/".to_string(), path.to_string()),
    }
}

impl Node {
    fn new(directory: String, file: String, kind: NodeKind) -> Self {
        let path = format!("{}{}", directory, file);
        Self {
            directory,
            file,
            path,
            kind,
        }
    }

    pub(crate) fn file(directory: impl Into<String>, name: impl Into<String>, info: FileInfo) -> Self {
        Self::new(directory.into(), name.into(), NodeKind::File(info))
    }

    pub(crate) fn symlink(
        directory: impl Into<String>,
        name: impl Into<String>,
        info: SymlinkInfo,
    ) -> Self {
        Self::new(directory.into(), name.into(), NodeKind::Symlink(info))
    }

    /// Directory node. `resolved` marks its (currently empty) children as
    /// already complete, as for nodes built from a bulk listing.
    pub(crate) fn directory(
        directory: impl Into<String>,
        name: impl Into<String>,
        implicit: bool,
        stats: DirectoryStats,
        resolved: bool,
    ) -> Self {
        let dir = Directory::new(implicit, stats, resolved);
        Self::new(directory.into(), name.into(), NodeKind::Directory(Arc::new(dir)))
    }

    /// Directory node for a full path (`""` is the storage root).
    pub(crate) fn directory_at(path: &str, implicit: bool, resolved: bool) -> Self {
        let (directory, name) = split_path(path);
        Self::directory(directory, name, implicit, DirectoryStats::default(), resolved)
    }

    /// Parent directory path, ending with `/`.
    pub fn directory_path(&self) -> &str {
        &self.directory
    }

    /// Leaf name.
    pub fn name(&self) -> &str {
        &self.file
    }

    /// Full path (`directory + name`).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The `directory` value every child of this node carries.
    pub fn child_prefix(&self) -> String {
        format!("{}/", self.path)
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File(_))
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self.kind, NodeKind::Symlink(_))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory(_))
    }

    pub fn as_directory(&self) -> Option<&Arc<Directory>> {
        match &self.kind {
            NodeKind::Directory(dir) => Some(dir),
            _ => None,
        }
    }

    /// True for directories synthesized from descendant paths.
    pub fn is_implicit(&self) -> bool {
        self.as_directory().is_some_and(|dir| dir.is_implicit())
    }

    /// Modification time, if known.
    pub fn mtime(&self) -> Option<i64> {
        match &self.kind {
            NodeKind::File(info) => Some(info.mtime),
            NodeKind::Symlink(info) => Some(info.mtime),
            NodeKind::Directory(dir) => dir.stats.mtime,
        }
    }

    /// Children of a directory; empty for files and symlinks.
    pub fn children(&self) -> Vec<Node> {
        self.as_directory()
            .map(|dir| dir.children())
            .unwrap_or_default()
    }

    /// Number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        match &self.kind {
            NodeKind::Directory(dir) => {
                1 + dir
                    .children
                    .read()
                    .values()
                    .map(Node::node_count)
                    .sum::<usize>()
            }
            _ => 1,
        }
    }

    /// Number of files in this subtree. Directories and symlinks do not count.
    pub fn count_files(&self) -> usize {
        match &self.kind {
            NodeKind::File(_) => 1,
            NodeKind::Symlink(_) => 0,
            NodeKind::Directory(dir) => dir
                .children
                .read()
                .values()
                .map(Node::count_files)
                .sum(),
        }
    }

    /// Look up a descendant by its full path.
    pub fn find(&self, path: &str) -> Option<Node> {
        if path == self.path {
            return Some(self.clone());
        }
        let rest = path.strip_prefix(&self.child_prefix())?;
        let (name, _) = rest.split_once('/').unwrap_or((rest, ""));
        self.as_directory()?.child(name)?.find(path)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::File(info) => write!(f, "{} ({} bytes)", self.path, info.size),
            NodeKind::Symlink(info) => write!(
                f,
                "{} -> {}",
                self.path,
                info.target.as_deref().unwrap_or("?")
            ),
            NodeKind::Directory(dir) if dir.implicit => write!(f, "{}/ (implicit)", self.path),
            NodeKind::Directory(_) => write!(f, "{}/", self.path),
        }
    }
}
