//! Remote persistence calls: delete-by-identity and embedding creation.
//!
//! [`EmbeddingClient`] speaks the service's REST surface through the
//! [`HttpClient`] port. Embedding creation retries transient failures
//! (HTTP 429, 5xx, or a transport error) with exponential backoff; any
//! other status fails on the first attempt. The delete call is the
//! precondition of idempotent replace and is never retried here — a
//! failed delete makes the orchestrator skip the whole document.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::json;

use crate::config::SeedConfig;
use crate::models::DocumentChunk;
use crate::ports::{HttpClient, HttpMethod, HttpRequest, Sleeper};

/// Content-type tag persisted with every knowledge chunk.
pub const CONTENT_TYPE: &str = "knowledge";

pub struct EmbeddingClient<'a> {
    config: &'a SeedConfig,
    http: &'a dyn HttpClient,
    sleeper: &'a dyn Sleeper,
}

impl<'a> EmbeddingClient<'a> {
    pub fn new(config: &'a SeedConfig, http: &'a dyn HttpClient, sleeper: &'a dyn Sleeper) -> Self {
        Self {
            config,
            http,
            sleeper,
        }
    }

    /// Delete all persisted chunks matching a document's identity.
    ///
    /// Any non-error status counts as success, including deleting zero
    /// rows for a document seen for the first time.
    pub async fn delete_document(&self, source_id: &str) -> Result<()> {
        let url = format!(
            "{}/rest/v1/embeddings?source_id=eq.{}&content_type=eq.{}",
            self.config.base_url, source_id, CONTENT_TYPE
        );
        let response = self
            .http
            .request(HttpRequest {
                method: HttpMethod::Delete,
                url,
                headers: vec![
                    ("apikey".to_string(), self.config.service_key.clone()),
                    (
                        "Authorization".to_string(),
                        format!("Bearer {}", self.config.service_key),
                    ),
                ],
                body: None,
            })
            .await?;

        if response.is_error() {
            bail!(
                "delete failed ({}): {}",
                response.status,
                response.body
            );
        }
        Ok(())
    }

    /// Persist one chunk through the embedding endpoint, with retry.
    ///
    /// Returns the opaque embedding identifier from the response.
    pub async fn create_embedding(&self, chunk: &DocumentChunk) -> Result<String> {
        let bearer = self
            .config
            .user_token
            .as_deref()
            .unwrap_or(&self.config.service_key);

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/functions/v1/generate-embedding", self.config.base_url),
            headers: vec![
                ("apikey".to_string(), self.config.service_key.clone()),
                ("Authorization".to_string(), format!("Bearer {bearer}")),
            ],
            body: Some(json!({
                "content": chunk.content,
                "title": chunk.title,
                "content_type": CONTENT_TYPE,
                "source_id": chunk.metadata.source_id,
                "chunk_index": chunk.chunk_index,
                "metadata": {
                    "category": chunk.metadata.category,
                    "tags": chunk.metadata.tags,
                    "sport": chunk.metadata.sport,
                    "difficulty": chunk.metadata.difficulty,
                },
            })),
        };

        let mut last_failure = String::new();

        for attempt in 0..self.config.max_attempts {
            if attempt > 0 {
                // 1×, 2×, 4×, ... the base delay, capped at 32×.
                let backoff = self.config.retry_base_delay * (1 << (attempt - 1).min(5));
                self.sleeper.sleep(backoff).await;
            }

            match self.http.request(request.clone()).await {
                Ok(response) if response.is_success() => {
                    return parse_embedding_id(&response.body);
                }
                Ok(response) if is_transient(response.status) => {
                    last_failure =
                        format!("status {}: {}", response.status, response.body);
                }
                Ok(response) => {
                    bail!(
                        "embedding request failed ({}): {}",
                        response.status,
                        response.body
                    );
                }
                Err(e) => {
                    last_failure = format!("request error: {e:#}");
                }
            }
        }

        bail!(
            "embedding request failed after {} attempts: {}",
            self.config.max_attempts,
            last_failure
        );
    }
}

/// Transient per the canonical policy: rate-limited or server-side.
fn is_transient(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

fn parse_embedding_id(body: &str) -> Result<String> {
    let value: serde_json::Value =
        serde_json::from_str(body).context("embedding response is not valid JSON")?;
    value
        .get("embedding_id")
        .and_then(|id| id.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("embedding response missing embedding_id: {body}"))
}
