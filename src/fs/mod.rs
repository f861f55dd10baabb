//! Filesystem model and operations.

pub mod listing;
pub(crate) mod node;
pub(crate) mod operations;

pub use listing::Listing;
pub use node::{Directory, DirectoryStats, FileInfo, Node, NodeKind, SymlinkInfo};
pub use operations::TreeBuilder;
