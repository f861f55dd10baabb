//! NetStorage API client over HTTP.

use async_trait::async_trait;

use super::StorageApi;
use super::action::{Action, UploadOptions};
use super::xml::{self, DuResponse, ListResponse, StatResponse};
use crate::error::Result;
use crate::http::HttpClient;

/// NetStorage API client.
#[derive(Debug)]
pub struct ApiClient {
    http: HttpClient,
}

impl ApiClient {
    /// Create a new API client on top of a configured HTTP client.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Run an action whose only interesting outcome is success.
    async fn command(&self, action: Action, path: &str, body: Option<Vec<u8>>) -> Result<bool> {
        // The body of a successful mutation is a short status document; it
        // is read to the end so the connection can be reused.
        self.http.execute(&action, path, body).await?;
        Ok(true)
    }
}

#[async_trait]
impl StorageApi for ApiClient {
    async fn dir(&self, path: &str, start: Option<&str>) -> Result<StatResponse> {
        let action = Action::Dir {
            start: start.map(str::to_string),
        };
        let body = self.http.execute(&action, path, None).await?;
        xml::decode_stat(&body)
    }

    async fn list(
        &self,
        path: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<ListResponse> {
        let action = Action::List {
            start: start.map(str::to_string),
            end: end.map(str::to_string),
        };
        let body = self.http.execute(&action, path, None).await?;
        xml::decode_list(&body)
    }

    async fn stat(&self, path: &str, implicit: bool) -> Result<StatResponse> {
        let body = self
            .http
            .execute(&Action::Stat { implicit }, path, None)
            .await?;
        xml::decode_stat(&body)
    }

    async fn du(&self, path: &str) -> Result<DuResponse> {
        let body = self.http.execute(&Action::Du, path, None).await?;
        xml::decode_du(&body)
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        self.http.execute(&Action::Download, path, None).await
    }

    async fn upload(&self, path: &str, data: Vec<u8>, options: UploadOptions) -> Result<bool> {
        self.command(Action::Upload(options), path, Some(data)).await
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        self.command(Action::Delete, path, None).await
    }

    async fn quick_delete(&self, path: &str) -> Result<bool> {
        self.command(Action::QuickDelete, path, None).await
    }

    async fn mkdir(&self, path: &str) -> Result<bool> {
        self.command(Action::Mkdir, path, None).await
    }

    async fn rmdir(&self, path: &str) -> Result<bool> {
        self.command(Action::Rmdir, path, None).await
    }

    async fn rename(&self, path: &str, destination: &str) -> Result<bool> {
        let action = Action::Rename {
            destination: destination.to_string(),
        };
        self.command(action, path, None).await
    }

    async fn symlink(&self, path: &str, target: &str) -> Result<bool> {
        let action = Action::Symlink {
            target: target.to_string(),
        };
        self.command(action, path, None).await
    }

    async fn mtime(&self, path: &str, mtime: i64) -> Result<bool> {
        self.command(Action::Mtime { mtime }, path, None).await
    }

    async fn set_metadata(&self, path: &str, params: &[(String, String)]) -> Result<bool> {
        let action = Action::SetMetadata {
            params: params.to_vec(),
        };
        self.command(action, path, None).await
    }
}
