//! Girder API client.
//!
//! Async HTTP client using `reqwest` with `Girder-Token` authentication.

use medsync_protocol::constants::TOKEN_HEADER;
use medsync_protocol::{ChunkAck, Folder, FolderList, RemoteError, UploadHandle};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;

/// Errors from the Girder client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid token")]
    InvalidToken,
}

impl From<Error> for RemoteError {
    fn from(err: Error) -> Self {
        match err {
            Error::Http(e) => RemoteError::Transport(e.to_string()),
            Error::Api { status, body } => RemoteError::Api { status, body },
            Error::NotFound(what) => RemoteError::NotFound(what),
            Error::Json(e) => RemoteError::Decode(e.to_string()),
            Error::Decode(msg) => RemoteError::Decode(msg),
            Error::InvalidToken => RemoteError::Transport("invalid token".into()),
        }
    }
}

/// Girder API client.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a client from an explicit configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(TOKEN_HEADER.as_bytes()).map_err(|_| Error::InvalidToken)?,
            HeaderValue::from_str(&config.token).map_err(|_| Error::InvalidToken)?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        debug!(api_url = %config.api_url, "girder client ready");

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Sends a request and decodes a JSON body, mapping non-2xx statuses.
    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T, Error> {
        let resp = req.send().await?;
        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            let url = resp.url().to_string();
            return Err(Error::NotFound(url));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Finds a child folder of `parent_id` by exact name.
    ///
    /// Only the first match is returned; Girder does not guarantee unique
    /// sibling names and duplicates are not disambiguated.
    pub async fn find_folder(&self, parent_id: &str, name: &str) -> Result<Option<Folder>, Error> {
        let req = self.http.get(self.url("/folder")).query(&[
            ("parentId", parent_id),
            ("parentType", "folder"),
            ("name", name),
            ("limit", "1"),
        ]);
        let list: FolderList = self.send(req).await?;
        Ok(list.into_first())
    }

    /// Creates a folder under `parent_id`.
    pub async fn create_folder(
        &self,
        parent_id: &str,
        name: &str,
        public: bool,
    ) -> Result<Folder, Error> {
        let public = public.to_string();
        let req = self.http.post(self.url("/folder")).form(&[
            ("name", name),
            ("parentId", parent_id),
            ("parentType", "folder"),
            ("public", public.as_str()),
        ]);
        self.send(req).await
    }

    /// Fetches a folder by id.
    pub async fn get_folder(&self, folder_id: &str) -> Result<Folder, Error> {
        let req = self
            .http
            .get(self.url(&format!("/folder/{}", encode(folder_id))));
        self.send(req).await
    }

    /// Sets the public flag of a folder (not recursive).
    pub async fn set_folder_access(&self, folder_id: &str, public: bool) -> Result<Folder, Error> {
        let public = public.to_string();
        let req = self
            .http
            .put(self.url(&format!("/folder/{}/access", encode(folder_id))))
            .query(&[("public", public.as_str()), ("recurse", "false")]);
        self.send(req).await
    }

    /// Merges `metadata` into the folder's metadata.
    pub async fn set_folder_metadata(
        &self,
        folder_id: &str,
        metadata: &serde_json::Value,
    ) -> Result<Folder, Error> {
        let req = self
            .http
            .put(self.url(&format!("/folder/{}/metadata", encode(folder_id))))
            .json(metadata);
        self.send(req).await
    }

    /// Opens an upload session for a file of `size` bytes in `folder_id`.
    pub async fn init_upload(
        &self,
        folder_id: &str,
        name: &str,
        size: u64,
        mime_type: &str,
    ) -> Result<UploadHandle, Error> {
        let size = size.to_string();
        let req = self.http.post(self.url("/file")).query(&[
            ("parentType", "folder"),
            ("parentId", folder_id),
            ("name", name),
            ("size", size.as_str()),
            ("mimeType", mime_type),
        ]);
        self.send(req).await
    }

    /// Sends one chunk of an upload starting at `offset`.
    pub async fn upload_chunk(
        &self,
        upload_id: &str,
        offset: u64,
        data: Vec<u8>,
    ) -> Result<ChunkAck, Error> {
        let offset = offset.to_string();
        let req = self
            .http
            .post(self.url("/file/chunk"))
            .query(&[("uploadId", upload_id), ("offset", offset.as_str())])
            .body(data);
        let value: serde_json::Value = self.send(req).await?;
        ChunkAck::from_json(value).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Asks the server to finalize an upload whose bytes were all sent.
    pub async fn finalize_upload(&self, upload_id: &str) -> Result<ChunkAck, Error> {
        let req = self
            .http
            .post(self.url("/file/completion"))
            .query(&[("uploadId", upload_id)]);
        let value: serde_json::Value = self.send(req).await?;
        ChunkAck::from_json(value).map_err(|e| Error::Decode(e.to_string()))
    }
}

fn encode(id: &str) -> String {
    utf8_percent_encode(id, NON_ALPHANUMERIC).to_string()
}
