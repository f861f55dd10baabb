//! Shared NetStorage service handle.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::api::{ApiClient, StorageApi};
use crate::config::ServiceConfig;
use crate::error::{Result, StorageError};
use crate::fs::operations::utils::{relative_path, remote_path};
use crate::http::{HttpClient, RequestSigner};

/// NetStorage client bound to one storage group folder.
///
/// Paths passed to the service are relative to the configured folder
/// (`/images/a.png` addresses `/12345/images/a.png` when the folder is
/// `/12345`); the empty path is the folder itself.
///
/// The handle is cheap to clone. All clones share the same API client and
/// the two worker pools: one bounding concurrent listing requests, one
/// bounding concurrent delete requests, so a wide deletion cannot starve the
/// listings that discover more work (and vice versa).
#[derive(Clone)]
pub struct StorageService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    api: Arc<dyn StorageApi>,
    folder: String,
    listing_pool: Arc<Semaphore>,
    deletion_pool: Arc<Semaphore>,
    listing_workers: usize,
    deletion_workers: usize,
}

impl fmt::Debug for StorageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageService")
            .field("folder", &self.inner.folder)
            .field("listing_workers", &self.inner.listing_workers)
            .field("deletion_workers", &self.inner.deletion_workers)
            .finish_non_exhaustive()
    }
}

impl StorageService {
    /// Connect to the NetStorage HTTP API described by `config`.
    ///
    /// # Example
    /// ```no_run
    /// use std::sync::Arc;
    /// use netstorage::{ServiceConfig, StaticHeaders, StorageService};
    ///
    /// # async fn example() -> netstorage::Result<()> {
    /// let config = ServiceConfig::new("example-nsu.akamaihd.net", "/12345");
    /// let service = StorageService::connect(config, Arc::new(StaticHeaders::default()))?;
    /// let tree = service.list("/images").await?;
    /// println!("{} files", tree.count_files());
    /// # Ok(())
    /// # }
    /// ```
    pub fn connect(config: ServiceConfig, signer: Arc<dyn RequestSigner>) -> Result<Self> {
        let config = config.validated()?;
        let http = HttpClient::new(
            config.host.clone(),
            signer,
            config.connect_timeout(),
            config.read_timeout(),
            config.proxy.as_deref(),
        )?;
        Self::with_api(Arc::new(ApiClient::new(http)), &config)
    }

    /// Build a service over any [`StorageApi`] implementation.
    pub fn with_api(api: Arc<dyn StorageApi>, config: &ServiceConfig) -> Result<Self> {
        let config = config.clone().validated()?;
        Ok(Self {
            inner: Arc::new(ServiceInner {
                api,
                folder: config.folder,
                listing_pool: Arc::new(Semaphore::new(config.listing_workers)),
                deletion_pool: Arc::new(Semaphore::new(config.deletion_workers)),
                listing_workers: config.listing_workers,
                deletion_workers: config.deletion_workers,
            }),
        })
    }

    /// Storage group folder every path is relative to.
    pub fn folder(&self) -> &str {
        &self.inner.folder
    }

    pub fn listing_workers(&self) -> usize {
        self.inner.listing_workers
    }

    pub fn deletion_workers(&self) -> usize {
        self.inner.deletion_workers
    }

    pub(crate) fn api(&self) -> &Arc<dyn StorageApi> {
        &self.inner.api
    }

    /// Absolute storage path for a folder-relative path.
    pub(crate) fn remote(&self, path: &str) -> String {
        remote_path(&self.inner.folder, &relative_path(path))
    }

    pub(crate) fn listing_pool(&self) -> Arc<Semaphore> {
        Arc::clone(&self.inner.listing_pool)
    }

    /// Wait for a free slot in the deletion pool.
    pub(crate) async fn deletion_permit(&self) -> Result<OwnedSemaphorePermit> {
        acquire(&self.inner.deletion_pool).await
    }
}

/// Wait for a free slot in `pool`.
pub(crate) async fn acquire(pool: &Arc<Semaphore>) -> Result<OwnedSemaphorePermit> {
    Arc::clone(pool)
        .acquire_owned()
        .await
        .map_err(|e| StorageError::Interrupted(format!("Worker pool closed: {}", e)))
}
