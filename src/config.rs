//! Service configuration.
//!
//! Credentials are not part of this structure: the request signer is handed
//! to [`crate::StorageService::connect`] separately.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

/// Upper bound for either worker pool.
const MAX_WORKERS: usize = 64;

/// Configuration for a [`crate::StorageService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// NetStorage HTTP API hostname
    pub host: String,
    /// Root folder of the storage group, usually the CP code (`/12345`)
    pub folder: String,
    /// Concurrent listing requests during recursive resolution
    pub listing_workers: usize,
    /// Concurrent delete requests during recursive deletion
    pub deletion_workers: usize,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    /// Optional HTTP(S) proxy URL
    pub proxy: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            folder: String::new(),
            listing_workers: 8,
            deletion_workers: 16,
            connect_timeout_ms: 15_000,
            read_timeout_ms: 15_000,
            proxy: None,
        }
    }
}

impl ServiceConfig {
    /// Create a configuration with default pool sizes and timeouts.
    pub fn new(host: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            folder: folder.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| StorageError::InvalidArgument(format!("Invalid configuration: {}", e)))?;
        config.validated()
    }

    /// Set the listing pool size (clamped to 1-64).
    pub fn with_listing_workers(mut self, workers: usize) -> Self {
        self.listing_workers = workers.clamp(1, MAX_WORKERS);
        self
    }

    /// Set the deletion pool size (clamped to 1-64).
    pub fn with_deletion_workers(mut self, workers: usize) -> Self {
        self.deletion_workers = workers.clamp(1, MAX_WORKERS);
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Check required fields and normalize the rest.
    ///
    /// The folder must start with `/`; a trailing `/` is removed. Worker
    /// counts are clamped to 1-64.
    pub fn validated(mut self) -> Result<Self> {
        if self.host.trim().is_empty() {
            return Err(StorageError::InvalidArgument(
                "NetStorage host is required".to_string(),
            ));
        }
        if !self.folder.starts_with('/') {
            return Err(StorageError::InvalidArgument(format!(
                "Folder must start with '/': {:?}",
                self.folder
            )));
        }
        while self.folder.len() > 1 && self.folder.ends_with('/') {
            self.folder.pop();
        }
        if self.folder == "/" {
            return Err(StorageError::InvalidArgument(
                "Folder must name a storage group, e.g. /12345".to_string(),
            ));
        }
        self.listing_workers = self.listing_workers.clamp(1, MAX_WORKERS);
        self.deletion_workers = self.deletion_workers.clamp(1, MAX_WORKERS);
        Ok(self)
    }
}
