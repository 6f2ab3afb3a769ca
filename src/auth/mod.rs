//! Authentication module
//!
//! Supports: pre-issued Bearer tokens and application-only auth
//! (consumer key/secret exchanged for a bearer token)
//!
//! The `Authenticator` applies credentials to outgoing requests and caches
//! the app-only token once obtained.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CachedToken, DEFAULT_TOKEN_URL};
