use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use objkv_core::path;
use objkv_core::{DirEntry, ObjectStore, StoreError};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, DATE};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::auth::{self, RequestSigner};
use crate::config::{ConfigError, MantaConfig};
use crate::error;

const STORAGE_ROOT: &str = "stor";
const LIST_LIMIT: usize = 1000;
const DIRECTORY_TYPE: &str = "application/json; type=directory";
const OBJECT_TYPE: &str = "application/octet-stream";

/// HTTP client for the Manta storage API, rooted at `/<user>/stor`.
#[derive(Clone)]
pub struct MantaClient {
    http: reqwest::Client,
    endpoint: Url,
    user: String,
    signer: RequestSigner,
}

impl MantaClient {
    /// Builds a client, loading the private key named by `config`.
    pub fn new(config: &MantaConfig) -> Result<Self, ConfigError> {
        let signer = RequestSigner::from_file(&config.user, &config.key_id, &config.key_path)?;
        Self::with_signer(config, signer)
    }

    pub fn with_signer(config: &MantaConfig, signer: RequestSigner) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            user: config.user.clone(),
            signer,
        })
    }

    /// URL of a store path; every segment is percent-encoded.
    pub fn url(&self, path: &str) -> Result<Url, StoreError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                StoreError::other(format!("endpoint {} cannot carry a path", self.endpoint))
            })?
            .pop_if_empty()
            .push(&self.user)
            .push(STORAGE_ROOT)
            .extend(path::components(path));
        Ok(url)
    }

    async fn send<F>(&self, method: Method, path: &str, build: F) -> Result<Response, StoreError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.url(path)?;
        let date = auth::http_date();
        let request = self
            .http
            .request(method.clone(), url)
            .header(DATE, &date)
            .header(AUTHORIZATION, self.signer.authorization(&date));

        let resp = build(request)
            .send()
            .await
            .map_err(|e| StoreError::other(format!("{method} {path} failed: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            debug!(%method, path, %status, "OK");
            return Ok(resp);
        }

        let body = resp.bytes().await.unwrap_or_default();
        let err = error::from_response(method.as_str(), path, status, &body);
        debug!(%method, path, %status, kind = %err.kind(), "request failed");
        Err(err)
    }

    async fn read_body(resp: Response, path: &str) -> Result<Bytes, StoreError> {
        resp.bytes()
            .await
            .map_err(|e| StoreError::other(format!("failed to read response body for {path}: {e}")))
    }
}

fn is_directory(resp: &Response) -> bool {
    resp.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("type=directory"))
}

#[derive(Debug, Deserialize)]
struct ListedEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Parses a directory listing: one JSON object per line.
pub fn parse_listing(body: &Bytes) -> Result<Vec<DirEntry>, StoreError> {
    body.split(|b| *b == b'\n')
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .map(|line| -> Result<DirEntry, StoreError> {
            let entry: ListedEntry = serde_json::from_slice(line)
                .map_err(|e| StoreError::other(format!("malformed directory listing: {e}")))?;
            Ok(if entry.kind == "directory" {
                DirEntry::directory(entry.name)
            } else {
                DirEntry::object(entry.name)
            })
        })
        .collect()
}

#[async_trait]
impl ObjectStore for MantaClient {
    async fn put_directory(&self, path: &str) -> Result<(), StoreError> {
        self.send(Method::PUT, path, |req| req.header(CONTENT_TYPE, DIRECTORY_TYPE))
            .await?;
        Ok(())
    }

    async fn put_object(&self, dir: &str, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let full = path::join(dir, name);
        let body = data.to_vec();
        self.send(Method::PUT, &full, |req| {
            req.header(CONTENT_TYPE, OBJECT_TYPE).body(body)
        })
        .await?;
        Ok(())
    }

    async fn get_object(&self, dir: &str, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let full = path::join(dir, name);
        let resp = self.send(Method::GET, &full, |req| req).await?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        // A GET on a directory answers with its listing.
        if is_directory(&resp) {
            return Err(StoreError::other(format!("{full} is a directory")));
        }
        let body = Self::read_body(resp, &full).await?;
        Ok(Some(body.to_vec()))
    }

    async fn delete_object(&self, dir: &str, name: &str) -> Result<(), StoreError> {
        let full = path::join(dir, name);
        self.send(Method::DELETE, &full, |req| req).await?;
        Ok(())
    }

    async fn delete_directory(&self, path: &str) -> Result<(), StoreError> {
        self.send(Method::DELETE, path, |req| req).await?;
        Ok(())
    }

    async fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, StoreError> {
        let mut entries = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let mut query = vec![("limit", LIST_LIMIT.to_string())];
            if let Some(marker) = &marker {
                query.push(("marker", marker.clone()));
            }
            let resp = self.send(Method::GET, path, |req| req.query(&query)).await?;
            let body = Self::read_body(resp, path).await?;
            let page = parse_listing(&body)?;
            let fetched = page.len();

            // The marker entry is repeated at the top of the next page.
            let before = entries.len();
            entries.extend(
                page.into_iter()
                    .filter(|entry| Some(entry.name.as_str()) != marker.as_deref()),
            );

            if fetched < LIST_LIMIT || entries.len() == before {
                break;
            }
            marker = entries.last().map(|entry| entry.name.clone());
        }

        Ok(entries)
    }
}
