//! # netstorage
//!
//! Async Rust client for Akamai NetStorage.
//!
//! ## Features
//!
//! - **Tree Listing**:
//!   - Single level listings (`dir`) as lazy, paginated sequences.
//!   - Whole subtrees from one bulk listing (`list`), with directories the
//!     server never reports explicitly synthesized as *implicit* nodes.
//! - **Recursive Resolution**: expand a directory known only from `stat`
//!   into its full subtree. Every directory is listed at most once, no matter
//!   how many callers ask for it concurrently.
//! - **Recursive Deletion**: tear a subtree down children first with
//!   bounded concurrency, tolerating objects that disappear concurrently.
//!   A server side recursive delete (`quick_delete`) is available too.
//! - **Object Operations**: `stat`, `du`, `upload`, `download`, `mkdir`,
//!   `rmdir`, `rename`, `symlink`, `set_mtime` and `set_metadata`.
//!
//! Listing and deletion requests run on two separately bounded worker pools
//! (see [`ServiceConfig`]). Request signing is pluggable through
//! [`RequestSigner`].
//!
//! ## Example: Basic Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use netstorage::{ServiceConfig, StaticHeaders, StorageService};
//!
//! # async fn example() -> netstorage::Result<()> {
//! let config = ServiceConfig::new("example-nsu.akamaihd.net", "/12345")
//!     .with_deletion_workers(32);
//! let service = StorageService::connect(config, Arc::new(StaticHeaders::default()))?;
//!
//! // Build the tree below /releases from one bulk listing
//! let tree = service.list("/releases").await?;
//! println!("{} files in {} nodes", tree.count_files(), tree.node_count());
//!
//! // Upload, then remove a whole directory, children first
//! service.upload("/releases/v2/notes.txt", b"hello".to_vec()).await?;
//! service.delete_recursive("/releases/v1").await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod fs;
pub mod http;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use api::{DiskUsage, StorageApi, UploadOptions};
pub use config::ServiceConfig;
pub use error::{Result, StorageError};
pub use fs::{
    Directory, DirectoryStats, FileInfo, Listing, Node, NodeKind, SymlinkInfo, TreeBuilder,
};
pub use http::{RequestSigner, StaticHeaders};
pub use service::StorageService;
