//! Client-side rate limiting
//!
//! API limits are expressed as a number of requests per window (typically
//! 15 minutes). The governor token bucket spreads those requests evenly
//! across the window, with an optional burst.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Standard rate limit window
pub const STANDARD_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Requests allowed per window
    pub requests: u32,
    /// Window length
    pub window: Duration,
    /// Burst size (max tokens in bucket)
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    /// 15 requests per 15 minutes, the follow-graph endpoint limit
    fn default() -> Self {
        Self::per_window(15, STANDARD_WINDOW)
    }
}

impl RateLimiterConfig {
    /// `requests` per `window`, all of which may be used as a burst
    pub fn per_window(requests: u32, window: Duration) -> Self {
        Self {
            requests,
            window,
            burst_size: requests,
        }
    }

    /// Fixed rate per second
    pub fn per_second(requests_per_second: u32) -> Self {
        Self::per_window(requests_per_second, Duration::from_secs(1))
    }

    /// Override the burst size
    #[must_use]
    pub fn with_burst(mut self, burst_size: u32) -> Self {
        self.burst_size = burst_size;
        self
    }

    /// Interval at which a single token is replenished
    pub fn replenish_interval(&self) -> Duration {
        self.window / self.requests.max(1)
    }
}

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(config.replenish_interval())
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst);

        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }

    /// Wait with a timeout
    pub async fn wait_with_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.limiter.until_ready())
            .await
            .is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}
