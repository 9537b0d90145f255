//! IO collaborator ports for the seeding pipeline.
//!
//! The orchestrator touches the outside world only through these traits:
//! directory listing and file reads, a generic HTTP request function,
//! and an awaitable sleep. Tests substitute deterministic fakes; the
//! production implementations live alongside the traits here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// One immediate entry of a directory listing.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Filesystem access: immediate directory listing and full-file reads.
pub trait FileSystem: Send + Sync {
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// Production filesystem backed by `std::fs`.
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        let dir = std::fs::read_dir(path)
            .with_context(|| format!("failed to list {}", path.display()))?;
        for entry in dir {
            let entry = entry?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))
    }
}

/// HTTP method subset used by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Delete,
    Post,
}

/// A generic outbound request: method, URL, headers, optional JSON body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Status and body of a completed request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 2xx success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 4xx or 5xx.
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Generic HTTP request function. Transport failures are `Err`;
/// non-2xx statuses come back as `Ok` responses for the caller to
/// classify.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Production HTTP client backed by `reqwest` with a request timeout.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            HttpMethod::Delete => self.client.delete(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Ok(HttpResponse { status, body })
    }
}

/// Awaitable sleep primitive.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by `tokio::time`.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
