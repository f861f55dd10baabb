//! NetStorage action header construction.
//!
//! Every request carries an `X-Akamai-ACS-Action` header describing the
//! operation, e.g. `version=1&action=dir&format=xml&start=%2F12345%2Fb`.

use reqwest::Method;
use url::form_urlencoded;

/// Name of the header carrying the action description.
pub const ACTION_HEADER: &str = "X-Akamai-ACS-Action";

/// Protocol version sent with every action.
const API_VERSION: &str = "1";

/// Confirmation value the server requires for a quick-delete.
const QUICK_DELETE_CONFIRMATION: &str = "imreallyreallysure";

/// Optional attributes sent along with an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Modification time (Unix seconds) to store on the object
    pub mtime: Option<i64>,
    /// Content length, lets the server verify the body
    pub size: Option<u64>,
    /// Hex encoded MD5 of the body
    pub md5: Option<String>,
    /// Hex encoded SHA-1 of the body
    pub sha1: Option<String>,
    /// Hex encoded SHA-256 of the body
    pub sha256: Option<String>,
    /// Ask the server to index a zip archive for serve-from-zip
    pub index_zip: bool,
}

/// A single NetStorage API action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Single level directory listing.
    Dir { start: Option<String> },
    /// Bulk recursive listing, optionally bounded by `end`.
    List {
        start: Option<String>,
        end: Option<String>,
    },
    /// Metadata for one object; `implicit` also reports implicit directories.
    Stat { implicit: bool },
    /// Disk usage summary for a directory.
    Du,
    Download,
    Delete,
    /// Server side recursive delete.
    QuickDelete,
    Mkdir,
    Rmdir,
    Rename { destination: String },
    Symlink { target: String },
    Mtime { mtime: i64 },
    SetMetadata { params: Vec<(String, String)> },
    Upload(UploadOptions),
}

impl Action {
    /// Action name as it appears in the header.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Dir { .. } => "dir",
            Action::List { .. } => "list",
            Action::Stat { .. } => "stat",
            Action::Du => "du",
            Action::Download => "download",
            Action::Delete => "delete",
            Action::QuickDelete => "quick-delete",
            Action::Mkdir => "mkdir",
            Action::Rmdir => "rmdir",
            Action::Rename { .. } => "rename",
            Action::Symlink { .. } => "symlink",
            Action::Mtime { .. } => "mtime",
            Action::SetMetadata { .. } => "setmd",
            Action::Upload(_) => "upload",
        }
    }

    /// HTTP method used for this action.
    pub fn method(&self) -> Method {
        match self {
            Action::Dir { .. }
            | Action::List { .. }
            | Action::Stat { .. }
            | Action::Du
            | Action::Download => Method::GET,
            Action::Delete | Action::Rmdir => Method::POST,
            Action::QuickDelete
            | Action::Mkdir
            | Action::Rename { .. }
            | Action::Symlink { .. }
            | Action::Mtime { .. }
            | Action::SetMetadata { .. }
            | Action::Upload(_) => Method::PUT,
        }
    }

    /// Whether the response body is an XML document.
    pub fn returns_xml(&self) -> bool {
        matches!(
            self,
            Action::Dir { .. } | Action::List { .. } | Action::Stat { .. } | Action::Du
        )
    }

    /// Render the value of the action header.
    pub fn header_value(&self) -> String {
        let mut header = form_urlencoded::Serializer::new(String::new());
        header.append_pair("version", API_VERSION);
        header.append_pair("action", self.name());
        if self.returns_xml() {
            header.append_pair("format", "xml");
        }

        match self {
            Action::Dir { start } => {
                if let Some(start) = start {
                    header.append_pair("start", start);
                }
            }
            Action::List { start, end } => {
                if let Some(start) = start {
                    header.append_pair("start", start);
                }
                if let Some(end) = end {
                    header.append_pair("end", end);
                }
            }
            Action::Stat { implicit } => {
                if *implicit {
                    header.append_pair("implicit", "yes");
                }
            }
            Action::QuickDelete => {
                header.append_pair("quick-delete", QUICK_DELETE_CONFIRMATION);
            }
            Action::Rename { destination } => {
                header.append_pair("destination", destination);
            }
            Action::Symlink { target } => {
                header.append_pair("target", target);
            }
            Action::Mtime { mtime } => {
                header.append_pair("mtime", &mtime.to_string());
            }
            Action::SetMetadata { params } => {
                for (key, value) in params {
                    header.append_pair(key, value);
                }
            }
            Action::Upload(options) => {
                if let Some(mtime) = options.mtime {
                    header.append_pair("mtime", &mtime.to_string());
                }
                if let Some(size) = options.size {
                    header.append_pair("size", &size.to_string());
                }
                if let Some(md5) = &options.md5 {
                    header.append_pair("md5", md5);
                }
                if let Some(sha1) = &options.sha1 {
                    header.append_pair("sha1", sha1);
                }
                if let Some(sha256) = &options.sha256 {
                    header.append_pair("sha256", sha256);
                }
                if options.index_zip {
                    header.append_pair("index-zip", "1");
                }
            }
            Action::Du | Action::Download | Action::Delete | Action::Mkdir | Action::Rmdir => {}
        }

        header.finish()
    }
}
