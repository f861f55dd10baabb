//! Filesystem operations on [`StorageService`](crate::StorageService), split
//! into focused modules.

mod browse;
mod delete;
mod dir_ops;
mod download;
mod resolve;
mod tree;
mod upload;
pub(crate) mod utils;

pub use tree::TreeBuilder;
