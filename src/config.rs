//! Client configuration
//!
//! [`ClientConfig`] captures the immutable connection parameters of one
//! [`ApiClient`](crate::ApiClient): base URL, timeout, TLS verification,
//! default headers and query parameters, retry bounds, and optional
//! rate-limit quotas. Build one with [`ClientConfig::builder`].

use std::collections::HashMap;
use std::time::Duration;

use crate::http::RateLimiterConfig;

/// Configuration for an [`ApiClient`](crate::ApiClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL prepended to relative endpoints
    pub base_url: Option<String>,

    /// Timeout applied to each physical request
    pub timeout: Duration,

    /// Whether to verify TLS certificates
    pub verify_tls: bool,

    /// Headers added to every request (per-request values win)
    pub default_headers: HashMap<String, String>,

    /// Query parameters added to every request (per-request values win)
    pub default_query: HashMap<String, String>,

    /// User agent header value
    pub user_agent: String,

    /// Maximum number of retries for transport-level failures
    pub max_retries: u32,

    /// Delay before the first retry; doubled on each subsequent attempt
    pub initial_backoff: Duration,

    /// Upper bound on the retry delay
    pub max_backoff: Duration,

    /// Retry 429 responses after their `Retry-After` interval instead of
    /// surfacing them (counts toward `max_retries`)
    pub retry_rate_limited: bool,

    /// Request-rate quotas; `None` disables client-side throttling
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(10),
            verify_tls: true,
            default_headers: HashMap::new(),
            default_query: HashMap::new(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
            retry_rate_limited: false,
            rate_limit: None,
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the given base URL and all other values
    /// at their defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    /// Create a configuration builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL prepended to relative endpoints
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Enable or disable TLS certificate verification
    #[must_use]
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.config.verify_tls = verify;
        self
    }

    /// Add a header sent with every request
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .default_headers
            .insert(name.into(), value.into());
        self
    }

    /// Add a query parameter sent with every request
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_query.insert(name.into(), value.into());
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the maximum retry count for transport-level failures
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Set the initial and maximum retry delays
    #[must_use]
    pub fn backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Opt in to retrying 429 responses after their `Retry-After` interval
    #[must_use]
    pub fn retry_rate_limited(mut self, retry: bool) -> Self {
        self.config.retry_rate_limited = retry;
        self
    }

    /// Throttle outgoing requests with the given quotas
    #[must_use]
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.base_url.is_none());
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.verify_tls);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_backoff, Duration::from_secs(1));
        assert_eq!(config.max_backoff, Duration::from_secs(10));
        assert!(!config.retry_rate_limited);
        assert!(config.rate_limit.is_none());
        assert!(config.user_agent.starts_with("clientele/"));
    }

    #[test]
    fn test_new_sets_base_url() {
        let config = ClientConfig::new("https://api.example.com");
        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .base_url("https://api.example.com/v2")
            .timeout(Duration::from_secs(30))
            .verify_tls(false)
            .header("X-Api-Version", "2024-01-01")
            .param("format", "json")
            .max_retries(5)
            .backoff(Duration::from_millis(100), Duration::from_secs(2))
            .retry_rate_limited(true)
            .build();

        assert_eq!(
            config.base_url.as_deref(),
            Some("https://api.example.com/v2")
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.verify_tls);
        assert_eq!(
            config
                .default_headers
                .get("X-Api-Version")
                .map(String::as_str),
            Some("2024-01-01")
        );
        assert_eq!(
            config.default_query.get("format").map(String::as_str),
            Some("json")
        );
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.initial_backoff, Duration::from_millis(100));
        assert_eq!(config.max_backoff, Duration::from_secs(2));
        assert!(config.retry_rate_limited);
    }
}
