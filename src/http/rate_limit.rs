//! Rate limiting implementation
//!
//! Token-bucket rate limiting built on the governor crate. A client can be
//! throttled per second, per minute, or both; when both quotas are
//! configured a request must acquire a token from each bucket before it is
//! sent.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type DirectLimiter = Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Configuration for rate limiting
#[derive(Debug, Clone, Copy)]
pub struct RateLimiterConfig {
    /// Maximum number of requests per second, if limited
    pub requests_per_second: Option<u32>,
    /// Maximum number of requests per minute, if limited
    pub requests_per_minute: Option<u32>,
    /// Burst size (max tokens in each configured bucket)
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_second: Some(10),
            requests_per_minute: None,
            burst_size: 10,
        }
    }
}

impl RateLimiterConfig {
    /// Create a config from optional per-second and per-minute quotas.
    ///
    /// The burst size defaults to the first configured quota.
    pub fn new(requests_per_second: Option<u32>, requests_per_minute: Option<u32>) -> Self {
        let burst_size = requests_per_second
            .or(requests_per_minute)
            .unwrap_or(1)
            .max(1);
        Self {
            requests_per_second,
            requests_per_minute,
            burst_size,
        }
    }

    /// Limit to `n` requests per second
    pub fn per_second(n: u32) -> Self {
        Self::new(Some(n), None)
    }

    /// Limit to `n` requests per minute
    pub fn per_minute(n: u32) -> Self {
        Self::new(None, Some(n))
    }

    /// Override the burst size
    #[must_use]
    pub fn with_burst(mut self, burst_size: u32) -> Self {
        self.burst_size = burst_size.max(1);
        self
    }
}

/// Token bucket rate limiter over one or two quotas
#[derive(Clone)]
pub struct RateLimiter {
    per_second: Option<Arc<DirectLimiter>>,
    per_minute: Option<Arc<DirectLimiter>>,
}

impl RateLimiter {
    /// Create a rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);

        let per_second = config
            .requests_per_second
            .and_then(NonZeroU32::new)
            .map(|rate| Arc::new(Governor::direct(Quota::per_second(rate).allow_burst(burst))));

        let per_minute = config
            .requests_per_minute
            .and_then(NonZeroU32::new)
            .map(|rate| Arc::new(Governor::direct(Quota::per_minute(rate).allow_burst(burst))));

        Self {
            per_second,
            per_minute,
        }
    }

    /// Wait until every configured quota grants a token
    pub async fn wait(&self) {
        if let Some(limiter) = &self.per_second {
            limiter.until_ready().await;
        }
        if let Some(limiter) = &self.per_minute {
            limiter.until_ready().await;
        }
    }

    /// Try to acquire a token from every configured bucket without waiting.
    ///
    /// On failure a token may already have been consumed from an earlier
    /// bucket; callers wanting strict acquisition should use [`wait`](Self::wait).
    pub fn try_acquire(&self) -> bool {
        let second_ok = self
            .per_second
            .as_ref()
            .map_or(true, |limiter| limiter.check().is_ok());
        let minute_ok = self
            .per_minute
            .as_ref()
            .map_or(true, |limiter| limiter.check().is_ok());
        second_ok && minute_ok
    }

    /// Wait with a timeout; false when the timeout elapsed first
    pub async fn wait_with_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.wait()).await.is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("per_second", &self.per_second.is_some())
            .field("per_minute", &self.per_minute.is_some())
            .finish()
    }
}
