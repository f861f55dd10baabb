//! HTTP client wrapper for NetStorage requests.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::api::action::{ACTION_HEADER, Action};
use crate::api::error::ResponseStatus;
use crate::error::{Result, StorageError};

/// Produces the authentication headers for one request.
///
/// NetStorage authenticates every request with headers derived from the
/// upload account key, the request path and the action header. The signing
/// scheme lives outside this crate; implementors return the complete set of
/// headers to attach (typically `X-Akamai-ACS-Auth-Data` and
/// `X-Akamai-ACS-Auth-Sign`).
pub trait RequestSigner: Send + Sync {
    fn sign(&self, path: &str, action_header: &str) -> Result<Vec<(String, String)>>;
}

/// Signer that attaches a fixed set of headers, for gateways that sign on
/// the client's behalf.
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders(pub Vec<(String, String)>);

impl RequestSigner for StaticHeaders {
    fn sign(&self, _path: &str, _action_header: &str) -> Result<Vec<(String, String)>> {
        Ok(self.0.clone())
    }
}

/// HTTP client for a single NetStorage host.
pub struct HttpClient {
    client: Client,
    host: String,
    signer: Arc<dyn RequestSigner>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client.
    ///
    /// # Arguments
    /// * `host` - NetStorage HTTP API hostname (e.g. `example-nsu.akamaihd.net`)
    /// * `signer` - Produces the authentication headers
    /// * `connect_timeout` - Limit for establishing the connection
    /// * `read_timeout` - Limit for the whole request including the body
    /// * `proxy` - Optional proxy URL (e.g. `http://proxy:8080`)
    pub fn new(
        host: impl Into<String>,
        signer: Arc<dyn RequestSigner>,
        connect_timeout: Duration,
        read_timeout: Duration,
        proxy: Option<&str>,
    ) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(read_timeout);

        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| StorageError::InvalidArgument(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| StorageError::Connection(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            host: host.into(),
            signer,
        })
    }

    /// Hostname requests are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Full URL for a NetStorage path.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("https://{}{}", self.host, path)
        } else {
            format!("https://{}/{}", self.host, path)
        }
    }

    /// Execute one action against `path` and return the response body.
    ///
    /// Non-2xx answers are mapped to typed errors: 404 -> `NotFound`,
    /// 403 -> `Forbidden`, 400 -> `BadRequest`, anything else -> `Unspecific`.
    pub async fn execute(
        &self,
        action: &Action,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>> {
        let action_header = action.header_value();
        let url = self.url_for(path);
        debug!(action = action.name(), %url, "netstorage request");

        let mut request = self
            .client
            .request(action.method(), &url)
            .header(ACTION_HEADER, &action_header);
        for (name, value) in self.signer.sign(path, &action_header)? {
            request = request.header(name, value);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let class = ResponseStatus::from(status.as_u16());
            debug!(
                action = action.name(),
                %url,
                status = status.as_u16(),
                reason = class.description(),
                "netstorage request failed"
            );
            return Err(class.into_error(path));
        }

        let bytes = response.bytes().await?;
        debug!(action = action.name(), %url, bytes = bytes.len(), "netstorage response");
        Ok(bytes.to_vec())
    }
}
