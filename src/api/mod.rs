//! NetStorage HTTP API: action headers, response decoding and the client.

pub mod action;
pub mod client;
pub mod error;
pub mod xml;

use async_trait::async_trait;

pub use action::{Action, UploadOptions};
pub use client::ApiClient;
pub use error::ResponseStatus;
pub use xml::{DiskUsage, DuResponse, EntryType, ListResponse, Resume, StatResponse, WireEntry};

use crate::error::Result;

/// Raw NetStorage operations.
///
/// Paths are absolute storage paths including the CP code (e.g.
/// `/12345/images/a.png`). Mutating calls answer `true` on success; a non-2xx
/// status is reported as a typed error.
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// One page of a single level directory listing.
    async fn dir(&self, path: &str, start: Option<&str>) -> Result<StatResponse>;

    /// One page of a recursive listing below `path`, bounded by `end`.
    async fn list(&self, path: &str, start: Option<&str>, end: Option<&str>)
    -> Result<ListResponse>;

    /// Metadata for the object at `path`.
    async fn stat(&self, path: &str, implicit: bool) -> Result<StatResponse>;

    async fn du(&self, path: &str) -> Result<DuResponse>;

    async fn download(&self, path: &str) -> Result<Vec<u8>>;

    async fn upload(&self, path: &str, data: Vec<u8>, options: UploadOptions) -> Result<bool>;

    async fn delete(&self, path: &str) -> Result<bool>;

    /// Server side recursive delete; returns before the deletion finishes.
    async fn quick_delete(&self, path: &str) -> Result<bool>;

    async fn mkdir(&self, path: &str) -> Result<bool>;

    async fn rmdir(&self, path: &str) -> Result<bool>;

    async fn rename(&self, path: &str, destination: &str) -> Result<bool>;

    async fn symlink(&self, path: &str, target: &str) -> Result<bool>;

    async fn mtime(&self, path: &str, mtime: i64) -> Result<bool>;

    async fn set_metadata(&self, path: &str, params: &[(String, String)]) -> Result<bool>;
}
