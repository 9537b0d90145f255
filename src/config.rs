//! Seeding configuration.
//!
//! Credentials and the endpoint base URL come from the environment; a
//! missing required variable is a fatal error surfaced before any file
//! processing begins. Retry and pacing knobs carry defaults chosen to
//! stay polite to the shared embedding service, and tests override them
//! directly.

use anyhow::{bail, Result};
use std::time::Duration;

/// Base URL of the persistence/embedding service.
pub const ENV_BASE_URL: &str = "SUPABASE_URL";
/// Service-level credential, used as `apikey` header and fallback bearer.
pub const ENV_SERVICE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
/// Optional user-scoped bearer token for the embedding call.
pub const ENV_USER_TOKEN: &str = "SUPABASE_ACCESS_TOKEN";

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub base_url: String,
    pub service_key: String,
    /// User-scoped bearer for the embedding call; falls back to
    /// `service_key` when absent.
    pub user_token: Option<String>,
    /// Total tries per embedding call, including the first.
    pub max_attempts: u32,
    /// Backoff before the second try; doubles each retry after that.
    pub retry_base_delay: Duration,
    /// Fixed pause after every embedding call, success or failure.
    pub request_spacing: Duration,
    pub http_timeout: Duration,
}

impl SeedConfig {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            user_token: None,
            max_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
            request_spacing: Duration::from_millis(200),
            http_timeout: Duration::from_secs(30),
        }
    }

    /// Build a config from the environment.
    ///
    /// # Errors
    ///
    /// Fails when `SUPABASE_URL` or `SUPABASE_SERVICE_ROLE_KEY` is unset
    /// or blank, naming the missing variable.
    pub fn from_env() -> Result<Self> {
        let base_url = require_env(ENV_BASE_URL)?;
        let service_key = require_env(ENV_SERVICE_KEY)?;
        let mut config = Self::new(base_url, service_key);
        config.user_token = std::env::var(ENV_USER_TOKEN)
            .ok()
            .filter(|token| !token.trim().is_empty());
        Ok(config)
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("missing required environment variable: {name}"),
    }
}
