use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_EXPAND_PATH: &str = "/expand_continuum";
pub const DEFAULT_EMBED_PATH: &str = "/embed";

/// Where the expansion service lives and how patiently to talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub expand_path: String,
    pub embed_path: String,
    pub connect_timeout_ms: u64,
    /// Generation on the service side is slow; keep this generous.
    pub request_timeout_ms: u64,
    /// Send focus and neighbors to the embed endpoint after each expansion.
    pub prewarm: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            expand_path: DEFAULT_EXPAND_PATH.to_string(),
            embed_path: DEFAULT_EMBED_PATH.to_string(),
            connect_timeout_ms: 2_000,
            request_timeout_ms: 60_000,
            prewarm: false,
        }
    }
}

impl ServiceConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_expand_path(mut self, path: impl Into<String>) -> Self {
        self.expand_path = path.into();
        self
    }

    #[must_use]
    pub fn with_embed_path(mut self, path: impl Into<String>) -> Self {
        self.embed_path = path.into();
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_prewarm(mut self, prewarm: bool) -> Self {
        self.prewarm = prewarm;
        self
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[must_use]
    pub fn expand_url(&self) -> String {
        join_url(&self.base_url, &self.expand_path)
    }

    #[must_use]
    pub fn embed_url(&self) -> String {
        join_url(&self.base_url, &self.embed_path)
    }

    pub fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(ClientError::invalid("base_url is empty"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ClientError::invalid(format!(
                "base_url must start with http:// or https://, got {base}"
            )));
        }
        if self.connect_timeout_ms == 0 {
            return Err(ClientError::invalid("connect_timeout_ms must be positive"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ClientError::invalid("request_timeout_ms must be positive"));
        }
        Ok(())
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim().trim_end_matches('/'), normalize_path(path))
}
