//! HTTP client module
//!
//! Provides the request layer: retry, rate limiting, backoff, auth and
//! error translation.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **API Errors**: `{"errors": [...]}` payloads become `FetchError::Api`

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, RequestConfig, DEFAULT_BASE_URL};
pub use rate_limit::{RateLimiter, RateLimiterConfig, STANDARD_WINDOW};
