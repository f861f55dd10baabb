//! XML response records.
//!
//! `dir` and `stat` answer with a `<stat>` document whose entry names are
//! relative to its `directory` attribute; `list` answers with a `<list>`
//! document whose entry names are full paths without the leading slash.
//! Both may end with a `<resume start="..."/>` cursor.

use serde::Deserialize;

use crate::error::{Result, StorageError};

/// `<stat>` document returned by `dir` and `stat`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatResponse {
    /// Directory the entries live in, including the CP code (e.g. `/12345/a`)
    #[serde(rename = "@directory", default)]
    pub directory: String,
    #[serde(rename = "file", default)]
    pub files: Vec<WireEntry>,
    #[serde(default)]
    pub resume: Option<Resume>,
}

/// `<list>` document returned by the bulk listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListResponse {
    #[serde(rename = "file", default)]
    pub files: Vec<WireEntry>,
    #[serde(default)]
    pub resume: Option<Resume>,
}

/// Continuation cursor ending a listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Resume {
    #[serde(rename = "@start")]
    pub start: String,
}

/// `<du>` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DuResponse {
    #[serde(rename = "@directory", default)]
    pub directory: String,
    #[serde(rename = "du-info", default)]
    pub info: DiskUsage,
}

/// Aggregate usage below a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DiskUsage {
    #[serde(rename = "@files", default)]
    pub files: u64,
    #[serde(rename = "@bytes", default)]
    pub bytes: u64,
}

/// Kind of a listed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Dir,
    File,
    Symlink,
    Unknown,
}

/// One `<file>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WireEntry {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@size", default)]
    pub size: u64,
    /// Aggregate bytes below a directory (stat only)
    #[serde(rename = "@bytes", default)]
    pub bytes: Option<u64>,
    /// Aggregate file count below a directory (stat only)
    #[serde(rename = "@files", default)]
    pub files: Option<u64>,
    #[serde(rename = "@mtime", default)]
    pub mtime: i64,
    #[serde(rename = "@md5", default)]
    pub md5: Option<String>,
    #[serde(rename = "@target", default)]
    pub target: Option<String>,
    #[serde(rename = "@implicit", default)]
    pub implicit: bool,
}

impl WireEntry {
    pub fn entry_type(&self) -> EntryType {
        match self.kind.as_str() {
            "dir" => EntryType::Dir,
            "file" => EntryType::File,
            "symlink" => EntryType::Symlink,
            _ => EntryType::Unknown,
        }
    }
}

fn body_text(body: &[u8]) -> Result<&str> {
    std::str::from_utf8(body).map_err(|e| StorageError::Deserialization(e.to_string()))
}

/// Decode a `dir` or `stat` response body.
pub fn decode_stat(body: &[u8]) -> Result<StatResponse> {
    Ok(quick_xml::de::from_str(body_text(body)?)?)
}

/// Decode a `list` response body.
pub fn decode_list(body: &[u8]) -> Result<ListResponse> {
    Ok(quick_xml::de::from_str(body_text(body)?)?)
}

/// Decode a `du` response body.
pub fn decode_du(body: &[u8]) -> Result<DuResponse> {
    Ok(quick_xml::de::from_str(body_text(body)?)?)
}
