//! Authenticator implementation
//!
//! Handles applying authentication to requests and managing the app-only
//! token cache.

use super::types::{AuthConfig, CachedToken};
use crate::error::{FetchError, Result};
use base64::Engine as _;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Authenticator handles applying authentication to HTTP requests
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Cached token for app-only auth
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.config {
            AuthConfig::None => Err(FetchError::auth("client has no credentials configured").into()),
            AuthConfig::Bearer { token } => Ok(req.bearer_auth(token)),
            AuthConfig::AppOnly { .. } => {
                let token = self.get_or_refresh_token().await?;
                Ok(req.bearer_auth(token))
            }
        }
    }

    /// Get a valid token, refreshing if necessary
    async fn get_or_refresh_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_new_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Fetch a new token based on auth type
    async fn fetch_new_token(&self) -> Result<CachedToken> {
        match &self.config {
            AuthConfig::AppOnly {
                consumer_key,
                consumer_secret,
                token_url,
            } => {
                self.fetch_app_only_token(token_url, consumer_key, consumer_secret)
                    .await
            }
            _ => Err(FetchError::auth("Token refresh not supported for this auth type").into()),
        }
    }

    /// Exchange consumer credentials for an application-only bearer token
    async fn fetch_app_only_token(
        &self,
        token_url: &str,
        consumer_key: &str,
        consumer_secret: &str,
    ) -> Result<CachedToken> {
        debug!("Requesting app-only bearer token from {token_url}");

        let response = self
            .http_client
            .post(token_url)
            .header(
                "Authorization",
                format!("Basic {}", basic_credentials(consumer_key, consumer_secret)),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(FetchError::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::auth(format!(
                "Token request failed with status {status}: {body}"
            ))
            .into());
        }

        let token_response: TokenResponse = response.json().await.map_err(FetchError::Http)?;
        token_response.into_cached_token()
    }

    /// Clear the cached token (forces a new token request)
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.config {
            AuthConfig::None => "none",
            AuthConfig::Bearer { .. } => "bearer",
            AuthConfig::AppOnly { .. } => "app_only",
        };
        f.debug_struct("Authenticator")
            .field("kind", &kind)
            .finish_non_exhaustive()
    }
}

/// `base64(urlencode(key) ":" urlencode(secret))` as the token endpoint expects
pub(crate) fn basic_credentials(consumer_key: &str, consumer_secret: &str) -> String {
    let key: String = url::form_urlencoded::byte_serialize(consumer_key.as_bytes()).collect();
    let secret: String =
        url::form_urlencoded::byte_serialize(consumer_secret.as_bytes()).collect();
    base64::engine::general_purpose::STANDARD.encode(format!("{key}:{secret}"))
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_cached_token(self) -> Result<CachedToken> {
        if let Some(kind) = &self.token_type {
            if !kind.eq_ignore_ascii_case("bearer") {
                return Err(FetchError::auth(format!("unexpected token type '{kind}'")).into());
            }
        }
        Ok(match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        })
    }
}
