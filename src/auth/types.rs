//! Auth configuration types

use crate::error::{Error, Result};
use crate::types::OptionStringExt;
use chrono::{DateTime, Utc};

/// Token endpoint for application-only authentication
pub const DEFAULT_TOKEN_URL: &str = "https://api.twitter.com/oauth2/token";

/// Authentication configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No credentials; every API call fails with an auth error
    #[default]
    None,

    /// Pre-issued bearer token
    Bearer {
        /// The bearer token
        token: String,
    },

    /// Application-only auth: exchange consumer credentials for a bearer token
    AppOnly {
        /// Consumer (API) key
        consumer_key: String,
        /// Consumer (API) secret
        consumer_secret: String,
        /// Token endpoint URL
        token_url: String,
    },
}

impl AuthConfig {
    /// Bearer token auth
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// App-only auth against the default token endpoint
    pub fn app_only(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self::AppOnly {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }

    /// Override the token endpoint (no-op for other variants)
    #[must_use]
    pub fn with_token_url(self, url: impl Into<String>) -> Self {
        match self {
            Self::AppOnly {
                consumer_key,
                consumer_secret,
                ..
            } => Self::AppOnly {
                consumer_key,
                consumer_secret,
                token_url: url.into(),
            },
            other => other,
        }
    }

    /// Whether any credentials are present
    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Resolve credentials from optional parts.
    ///
    /// A bearer token wins over consumer credentials. A consumer key
    /// without its secret (or the reverse) is rejected.
    pub fn from_parts(
        bearer_token: Option<String>,
        consumer_key: Option<String>,
        consumer_secret: Option<String>,
        token_url: Option<String>,
    ) -> Result<Self> {
        if let Some(token) = bearer_token.none_if_empty() {
            return Ok(Self::bearer(token));
        }

        match (consumer_key.none_if_empty(), consumer_secret.none_if_empty()) {
            (Some(key), Some(secret)) => {
                let auth = Self::app_only(key, secret);
                Ok(match token_url.none_if_empty() {
                    Some(url) => auth.with_token_url(url),
                    None => auth,
                })
            }
            (Some(_), None) => Err(Error::missing_credential("consumer_secret")),
            (None, Some(_)) => Err(Error::missing_credential("consumer_key")),
            (None, None) => Ok(Self::None),
        }
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false, // No expiration = never expires
        }
    }
}
