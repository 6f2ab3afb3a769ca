//! Client configuration
//!
//! A [`ClientConfig`] is loaded from YAML or JSON and can be overridden by
//! environment variables:
//!
//! | Variable                     | Field                  |
//! |------------------------------|------------------------|
//! | `TWEETGRAPH_BEARER_TOKEN`    | `auth.bearer_token`    |
//! | `TWEETGRAPH_CONSUMER_KEY`    | `auth.consumer_key`    |
//! | `TWEETGRAPH_CONSUMER_SECRET` | `auth.consumer_secret` |
//! | `TWEETGRAPH_BASE_URL`        | `base_url`             |
//!
//! ```yaml
//! base_url: https://api.twitter.com/1.1
//! timeout_secs: 30
//! max_retries: 3
//! backoff:
//!   type: exponential
//!   initial_ms: 100
//!   max_ms: 60000
//! rate_limit:
//!   requests: 15
//!   window_secs: 900
//! sleep_on_rate_limit: true
//! auth:
//!   consumer_key: xvz1evFS4wEEPTGEFPHBog
//!   consumer_secret: L8qq9PZyRg6ieKGEKhZolGC0vJWLw8iEJ88DRdyOg
//! ```

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig, DEFAULT_BASE_URL};
use crate::types::{BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `auth.bearer_token`
pub const ENV_BEARER_TOKEN: &str = "TWEETGRAPH_BEARER_TOKEN";
/// Environment variable overriding `auth.consumer_key`
pub const ENV_CONSUMER_KEY: &str = "TWEETGRAPH_CONSUMER_KEY";
/// Environment variable overriding `auth.consumer_secret`
pub const ENV_CONSUMER_SECRET: &str = "TWEETGRAPH_CONSUMER_SECRET";
/// Environment variable overriding `base_url`
pub const ENV_BASE_URL: &str = "TWEETGRAPH_BASE_URL";

// ============================================================================
// Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry backoff configuration
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Client-side rate limiting, off when absent
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,

    /// Sleep through HTTP 429 instead of failing
    #[serde(default)]
    pub sleep_on_rate_limit: bool,

    /// Credentials
    #[serde(default)]
    pub auth: AuthSection,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            backoff: BackoffConfig::default(),
            rate_limit: None,
            sleep_on_rate_limit: false,
            auth: AuthSection::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

/// Backoff configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    60000
}

/// Rate limiting configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    pub requests: u32,

    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Burst size, defaults to `requests`
    #[serde(default)]
    pub burst: Option<u32>,
}

fn default_window_secs() -> u64 {
    900
}

impl RateLimitConfig {
    fn to_limiter_config(&self) -> RateLimiterConfig {
        let config =
            RateLimiterConfig::per_window(self.requests, Duration::from_secs(self.window_secs));
        match self.burst {
            Some(burst) => config.with_burst(burst),
            None => config,
        }
    }
}

/// Credential fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSection {
    /// Pre-issued bearer token
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Consumer key for app-only auth
    #[serde(default)]
    pub consumer_key: Option<String>,

    /// Consumer secret for app-only auth
    #[serde(default)]
    pub consumer_secret: Option<String>,

    /// Token endpoint override
    #[serde(default)]
    pub token_url: Option<String>,
}

impl ClientConfig {
    /// Load from a file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Parse YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Failed to parse config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup; empty values are ignored
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_BASE_URL).none_if_empty() {
            self.base_url = url;
        }
        if let Some(token) = lookup(ENV_BEARER_TOKEN).none_if_empty() {
            self.auth.bearer_token = Some(token);
        }
        if let Some(key) = lookup(ENV_CONSUMER_KEY).none_if_empty() {
            self.auth.consumer_key = Some(key);
        }
        if let Some(secret) = lookup(ENV_CONSUMER_SECRET).none_if_empty() {
            self.auth.consumer_secret = Some(secret);
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::config("base_url cannot be empty"));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("Invalid base_url '{}': {e}", self.base_url)))?;
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than 0"));
        }
        if let Some(limit) = &self.rate_limit {
            if limit.requests == 0 || limit.window_secs == 0 {
                return Err(Error::config(
                    "rate_limit requests and window_secs must be greater than 0",
                ));
            }
        }
        Ok(())
    }

    /// HTTP client settings
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff.backoff_type,
                Duration::from_millis(self.backoff.initial_ms),
                Duration::from_millis(self.backoff.max_ms),
            )
            .sleep_on_rate_limit(self.sleep_on_rate_limit);
        if let Some(limit) = &self.rate_limit {
            builder = builder.rate_limit(limit.to_limiter_config());
        }
        builder.build()
    }

    /// Resolved credentials
    pub fn auth_config(&self) -> Result<AuthConfig> {
        AuthConfig::from_parts(
            self.auth.bearer_token.clone(),
            self.auth.consumer_key.clone(),
            self.auth.consumer_secret.clone(),
            self.auth.token_url.clone(),
        )
    }
}
