//! In-memory [`StorageApi`] for tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::api::{
    DiskUsage, DuResponse, ListResponse, Resume, StatResponse, StorageApi, UploadOptions,
    WireEntry,
};
use crate::error::{Result, StorageError};

#[derive(Debug, Clone)]
enum MemEntry {
    File { data: Vec<u8>, mtime: i64 },
    Dir,
    Symlink { target: String },
}

impl MemEntry {
    fn wire(&self, name: &str) -> WireEntry {
        let mut entry = WireEntry {
            name: name.to_string(),
            mtime: 1_700_000_000,
            ..Default::default()
        };
        match self {
            MemEntry::File { data, mtime } => {
                entry.kind = "file".to_string();
                entry.size = data.len() as u64;
                entry.mtime = *mtime;
            }
            MemEntry::Dir => entry.kind = "dir".to_string(),
            MemEntry::Symlink { target } => {
                entry.kind = "symlink".to_string();
                entry.target = Some(target.clone());
            }
        }
        entry
    }
}

fn implicit_dir(name: &str) -> WireEntry {
    WireEntry {
        kind: "dir".to_string(),
        name: name.to_string(),
        implicit: true,
        ..Default::default()
    }
}

fn parent_of(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Objects keyed by absolute path. Directories that only exist because
/// something is stored below them are reported as implicit.
pub(crate) struct MemoryStore {
    entries: Mutex<BTreeMap<String, MemEntry>>,
    page_size: usize,
    latency: Option<Duration>,
    calls: Mutex<Vec<(String, String)>>,
    failures: Mutex<HashMap<(String, String), StorageError>>,
    uploads: Mutex<HashMap<String, UploadOptions>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            page_size: 100,
            latency: None,
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            uploads: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub(crate) fn add_file(&self, path: &str, data: &[u8]) {
        self.entries.lock().insert(
            path.to_string(),
            MemEntry::File {
                data: data.to_vec(),
                mtime: 1_700_000_000,
            },
        );
    }

    pub(crate) fn add_dir(&self, path: &str) {
        self.entries.lock().insert(path.to_string(), MemEntry::Dir);
    }

    pub(crate) fn add_symlink(&self, path: &str, target: &str) {
        self.entries.lock().insert(
            path.to_string(),
            MemEntry::Symlink {
                target: target.to_string(),
            },
        );
    }

    /// Make every `op` call on `path` fail with `error`.
    pub(crate) fn fail(&self, op: &str, path: &str, error: StorageError) {
        self.failures
            .lock()
            .insert((op.to_string(), path.to_string()), error);
    }

    /// Recorded `(operation, path)` pairs, in call order.
    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }

    pub(crate) fn count(&self, op: &str, path: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|(o, p)| o == op && p == path)
            .count()
    }

    /// Highest number of calls that were in progress at the same time.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn contains(&self, path: &str) -> bool {
        self.entries.lock().contains_key(path)
    }

    pub(crate) fn file_data(&self, path: &str) -> Option<Vec<u8>> {
        match self.entries.lock().get(path) {
            Some(MemEntry::File { data, .. }) => Some(data.clone()),
            _ => None,
        }
    }

    pub(crate) fn file_mtime(&self, path: &str) -> Option<i64> {
        match self.entries.lock().get(path) {
            Some(MemEntry::File { mtime, .. }) => Some(*mtime),
            _ => None,
        }
    }

    pub(crate) fn symlink_target(&self, path: &str) -> Option<String> {
        match self.entries.lock().get(path) {
            Some(MemEntry::Symlink { target }) => Some(target.clone()),
            _ => None,
        }
    }

    pub(crate) fn upload_options(&self, path: &str) -> Option<UploadOptions> {
        self.uploads.lock().get(path).cloned()
    }

    async fn begin(&self, op: &str, path: &str) -> Result<InFlight<'_>> {
        self.calls.lock().push((op.to_string(), path.to_string()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = InFlight(&self.in_flight);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let failure = self
            .failures
            .lock()
            .get(&(op.to_string(), path.to_string()))
            .cloned();
        match failure {
            Some(error) => Err(error),
            None => Ok(guard),
        }
    }

    fn has_descendants(entries: &BTreeMap<String, MemEntry>, path: &str) -> bool {
        let prefix = format!("{}/", path);
        entries
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(key, _)| key.starts_with(&prefix))
    }

    /// Immediate children of `path`, keyed by full path.
    fn children(entries: &BTreeMap<String, MemEntry>, path: &str) -> BTreeMap<String, WireEntry> {
        let prefix = format!("{}/", path);
        let mut children = BTreeMap::new();
        for (key, entry) in entries.range(prefix.clone()..) {
            let Some(rest) = key.strip_prefix(&prefix) else {
                break;
            };
            match rest.split_once('/') {
                None => {
                    children.insert(key.clone(), entry.wire(rest));
                }
                Some((segment, _)) => {
                    let full = format!("{}{}", prefix, segment);
                    children
                        .entry(full)
                        .or_insert_with(|| implicit_dir(segment));
                }
            }
        }
        children
    }

    fn missing(path: &str) -> StorageError {
        StorageError::NotFound(path.to_string())
    }
}

#[async_trait]
impl StorageApi for MemoryStore {
    async fn dir(&self, path: &str, start: Option<&str>) -> Result<StatResponse> {
        let _call = self.begin("dir", path).await?;
        let entries = self.entries.lock();
        match entries.get(path) {
            Some(MemEntry::Dir) => {}
            Some(_) => return Err(StorageError::BadRequest(path.to_string())),
            None if Self::has_descendants(&entries, path) => {}
            None => return Err(Self::missing(path)),
        }
        let mut remaining = Self::children(&entries, path)
            .into_iter()
            .filter(|(full, _)| start.map_or(true, |s| full.as_str() >= s));
        let files = remaining
            .by_ref()
            .take(self.page_size)
            .map(|(_, entry)| entry)
            .collect();
        let resume = remaining.next().map(|(full, _)| Resume { start: full });
        Ok(StatResponse {
            directory: path.to_string(),
            files,
            resume,
        })
    }

    async fn list(
        &self,
        path: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<ListResponse> {
        let _call = self.begin("list", path).await?;
        let entries = self.entries.lock();
        let prefix = format!("{}/", path);
        let mut remaining = entries
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| start.map_or(true, |s| key.as_str() >= s))
            .filter(|(key, _)| end.map_or(true, |e| key.as_str() < e));
        let files = remaining
            .by_ref()
            .take(self.page_size)
            .map(|(key, entry)| entry.wire(key.trim_start_matches('/')))
            .collect();
        let resume = remaining.next().map(|(key, _)| Resume { start: key.clone() });
        Ok(ListResponse { files, resume })
    }

    async fn stat(&self, path: &str, implicit: bool) -> Result<StatResponse> {
        let _call = self.begin("stat", path).await?;
        let entries = self.entries.lock();
        let (directory, name) = parent_of(path);
        let entry = match entries.get(path) {
            Some(entry) => entry.wire(name),
            None if implicit && Self::has_descendants(&entries, path) => implicit_dir(name),
            None => return Err(Self::missing(path)),
        };
        Ok(StatResponse {
            directory: directory.to_string(),
            files: vec![entry],
            resume: None,
        })
    }

    async fn du(&self, path: &str) -> Result<DuResponse> {
        let _call = self.begin("du", path).await?;
        let entries = self.entries.lock();
        if !entries.contains_key(path) && !Self::has_descendants(&entries, path) {
            return Err(Self::missing(path));
        }
        let prefix = format!("{}/", path);
        let mut info = DiskUsage::default();
        for (_, entry) in entries.iter().filter(|(key, _)| key.starts_with(&prefix)) {
            if let MemEntry::File { data, .. } = entry {
                info.files += 1;
                info.bytes += data.len() as u64;
            }
        }
        Ok(DuResponse {
            directory: path.to_string(),
            info,
        })
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        let _call = self.begin("download", path).await?;
        self.file_data(path).ok_or_else(|| Self::missing(path))
    }

    async fn upload(&self, path: &str, data: Vec<u8>, options: UploadOptions) -> Result<bool> {
        let _call = self.begin("upload", path).await?;
        let mtime = options.mtime.unwrap_or(0);
        self.uploads.lock().insert(path.to_string(), options);
        self.entries
            .lock()
            .insert(path.to_string(), MemEntry::File { data, mtime });
        Ok(true)
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        let _call = self.begin("delete", path).await?;
        let mut entries = self.entries.lock();
        match entries.get(path) {
            Some(MemEntry::Dir) => Err(StorageError::BadRequest(path.to_string())),
            Some(_) => {
                entries.remove(path);
                Ok(true)
            }
            None => Err(Self::missing(path)),
        }
    }

    async fn quick_delete(&self, path: &str) -> Result<bool> {
        let _call = self.begin("quick-delete", path).await?;
        let mut entries = self.entries.lock();
        let prefix = format!("{}/", path);
        let before = entries.len();
        entries.retain(|key, _| key != path && !key.starts_with(&prefix));
        if entries.len() == before {
            return Err(Self::missing(path));
        }
        Ok(true)
    }

    async fn mkdir(&self, path: &str) -> Result<bool> {
        let _call = self.begin("mkdir", path).await?;
        self.entries.lock().insert(path.to_string(), MemEntry::Dir);
        Ok(true)
    }

    async fn rmdir(&self, path: &str) -> Result<bool> {
        let _call = self.begin("rmdir", path).await?;
        let mut entries = self.entries.lock();
        match entries.get(path) {
            Some(MemEntry::Dir) if Self::has_descendants(&entries, path) => {
                Err(StorageError::Unspecific {
                    code: Some(409),
                    message: format!("{} is not empty", path),
                })
            }
            Some(MemEntry::Dir) => {
                entries.remove(path);
                Ok(true)
            }
            Some(_) => Err(StorageError::BadRequest(path.to_string())),
            None => Err(Self::missing(path)),
        }
    }

    async fn rename(&self, path: &str, destination: &str) -> Result<bool> {
        let _call = self.begin("rename", path).await?;
        let mut entries = self.entries.lock();
        let entry = entries.remove(path).ok_or_else(|| Self::missing(path))?;
        entries.insert(destination.to_string(), entry);
        Ok(true)
    }

    async fn symlink(&self, path: &str, target: &str) -> Result<bool> {
        let _call = self.begin("symlink", path).await?;
        self.add_symlink(path, target);
        Ok(true)
    }

    async fn mtime(&self, path: &str, mtime: i64) -> Result<bool> {
        let _call = self.begin("mtime", path).await?;
        match self.entries.lock().get_mut(path) {
            Some(MemEntry::File { mtime: current, .. }) => {
                *current = mtime;
                Ok(true)
            }
            Some(_) => Ok(true),
            None => Err(Self::missing(path)),
        }
    }

    async fn set_metadata(&self, path: &str, _params: &[(String, String)]) -> Result<bool> {
        let _call = self.begin("setmd", path).await?;
        if self.contains(path) {
            Ok(true)
        } else {
            Err(Self::missing(path))
        }
    }
}
