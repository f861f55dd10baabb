//! Lazily paginated listings.
//!
//! A [`Listing`] pulls one page at a time from the server, decoding each
//! page's flat entries into [`Node`]s. Single level listings (`dir`) only
//! return the immediate children of a directory; bulk listings (`list`)
//! return every object below a root, optionally bounded by an `end` path.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use futures::stream::{self, Stream};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::api::{EntryType, ListResponse, StatResponse, StorageApi, WireEntry};
use crate::error::{Result, StorageError};
use crate::fs::node::{split_path, DirectoryStats, FileInfo, Node, SymlinkInfo};
use crate::fs::operations::utils::strip_folder;
use crate::service::acquire;

/// Listing request shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ListingKind {
    /// Immediate children only.
    Dir,
    /// Every object below the path, up to `end` (exclusive) if set.
    Tree { end: Option<String> },
}

/// Lazy, finite, single-consumer sequence of listed nodes.
///
/// The first page is fetched when the listing is opened, so
/// [`is_empty`](Self::is_empty) answers without consuming anything. Every
/// later page is requested with the previous page's resume cursor; a page
/// without a cursor ends the sequence.
pub struct Listing {
    api: Arc<dyn StorageApi>,
    folder: String,
    remote_path: String,
    kind: ListingKind,
    permits: Arc<Semaphore>,
    buffer: VecDeque<Node>,
    cursor: Option<String>,
}

impl fmt::Debug for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listing")
            .field("remote_path", &self.remote_path)
            .field("kind", &self.kind)
            .field("buffered", &self.buffer.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl Listing {
    /// Open a listing of `remote_path` and fetch its first page.
    pub(crate) async fn open(
        api: Arc<dyn StorageApi>,
        folder: String,
        remote_path: String,
        kind: ListingKind,
        permits: Arc<Semaphore>,
    ) -> Result<Self> {
        let mut listing = Self {
            api,
            folder,
            remote_path,
            kind,
            permits,
            buffer: VecDeque::new(),
            cursor: None,
        };
        listing.fetch_page(None).await?;
        listing.fill().await?;
        Ok(listing)
    }

    /// True when nothing is buffered and no further page is pending.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && self.cursor.is_none()
    }

    /// Next node, fetching the next page when the buffer runs dry.
    pub async fn next_entry(&mut self) -> Result<Option<Node>> {
        self.fill().await?;
        Ok(self.buffer.pop_front())
    }

    /// Drain the remaining pages.
    pub async fn collect_all(mut self) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        while let Some(node) = self.next_entry().await? {
            nodes.push(node);
        }
        Ok(nodes)
    }

    /// Turn the listing into a [`Stream`] of nodes.
    pub fn into_stream(self) -> impl Stream<Item = Result<Node>> + Send {
        stream::try_unfold(self, |mut listing| async move {
            let next = listing.next_entry().await?;
            Ok::<_, StorageError>(next.map(|node| (node, listing)))
        })
    }

    /// Fetch pages until something is buffered or the cursor runs out.
    async fn fill(&mut self) -> Result<()> {
        while self.buffer.is_empty() {
            match self.cursor.take() {
                Some(start) => self.fetch_page(Some(start)).await?,
                None => break,
            }
        }
        Ok(())
    }

    async fn fetch_page(&mut self, start: Option<String>) -> Result<()> {
        let _permit = acquire(&self.permits).await?;
        let (nodes, cursor) = match &self.kind {
            ListingKind::Dir => {
                let page = self.api.dir(&self.remote_path, start.as_deref()).await?;
                let cursor = page.resume.as_ref().map(|r| r.start.clone());
                (decode_stat_page(&self.folder, &page), cursor)
            }
            ListingKind::Tree { end } => {
                let page = self
                    .api
                    .list(&self.remote_path, start.as_deref(), end.as_deref())
                    .await?;
                let cursor = page.resume.as_ref().map(|r| r.start.clone());
                (decode_list_page(&self.folder, &page), cursor)
            }
        };
        debug!(
            path = %self.remote_path,
            entries = nodes.len(),
            more = cursor.is_some(),
            "Fetched listing page"
        );
        self.buffer.extend(nodes);
        self.cursor = cursor;
        Ok(())
    }
}

/// Decode a `dir`/`stat` page. Entry names are relative to the page's
/// `directory` attribute.
pub(crate) fn decode_stat_page(folder: &str, page: &StatResponse) -> Vec<Node> {
    let directory = format!("{}/", strip_folder(folder, &page.directory));
    page.files
        .iter()
        .filter_map(|entry| {
            let name = entry.name.trim_end_matches('/');
            decode_entry(entry, &directory, name, false)
        })
        .collect()
}

/// Decode a bulk `list` page. Entry names are full paths without the
/// leading slash.
pub(crate) fn decode_list_page(folder: &str, page: &ListResponse) -> Vec<Node> {
    page.files
        .iter()
        .filter_map(|entry| {
            let path = strip_folder(folder, entry.name.trim_end_matches('/'));
            let (directory, name) = split_path(&path);
            decode_entry(entry, &directory, &name, true)
        })
        .collect()
}

/// Bulk listings report whole subtrees, so their directories start out
/// resolved; `dir`/`stat` directories still need a listing of their own.
fn decode_entry(entry: &WireEntry, directory: &str, name: &str, resolved: bool) -> Option<Node> {
    match entry.entry_type() {
        EntryType::File => Some(Node::file(
            directory,
            name,
            FileInfo {
                size: entry.size,
                md5: entry.md5.clone(),
                mtime: entry.mtime,
            },
        )),
        EntryType::Symlink => Some(Node::symlink(
            directory,
            name,
            SymlinkInfo {
                target: entry.target.clone(),
                mtime: entry.mtime,
            },
        )),
        EntryType::Dir => {
            let stats = DirectoryStats {
                bytes: entry.bytes,
                files: entry.files,
                mtime: Some(entry.mtime),
            };
            Some(Node::directory(directory, name, entry.implicit, stats, resolved))
        }
        EntryType::Unknown => {
            warn!(kind = %entry.kind, name = %entry.name, "Skipping entry of unknown type");
            None
        }
    }
}
