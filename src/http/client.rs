//! HTTP API client
//!
//! [`ApiClient`] owns the transport and drives the request pipeline: build,
//! authenticate, send, classify, then retry on transport failure or decode
//! on success. Responses that classify as paginated are handed to the
//! pagination engine and come back as an aggregated [`PageSet`].

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Request, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::rate_limit::RateLimiter;
use super::request::RequestOptions;
use super::stats::{ClientStats, StatsTracker};
use crate::auth::{AuthStrategy, NoAuth};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::pagination::{self, PageKey, PageSet};
use crate::response::{ApiResponse, DefaultPolicy, ResponsePolicy};

/// Result of one logical call
#[derive(Debug)]
pub enum Outcome {
    /// A single classified response
    Single(ApiResponse),
    /// An aggregated multi-page response
    Paged(PageSet),
}

impl Outcome {
    /// Whether the call followed pagination links
    pub fn is_paged(&self) -> bool {
        matches!(self, Self::Paged(_))
    }

    /// The first (or only) response of the call
    pub fn first(&self) -> Option<&ApiResponse> {
        match self {
            Self::Single(response) => Some(response),
            Self::Paged(set) => set.first(),
        }
    }

    /// Every response of the call in arrival order
    pub fn responses(&self) -> &[ApiResponse] {
        match self {
            Self::Single(response) => std::slice::from_ref(response),
            Self::Paged(set) => &set.responses,
        }
    }

    /// The extracted results of the call: the single response's result
    /// list, or the aggregated limit-truncated results of every page
    pub fn results(&self) -> &[Value] {
        match self {
            Self::Single(response) => response.result_list(),
            Self::Paged(set) => set.results(),
        }
    }

    /// Unwrap the single response; `None` when the call paginated
    pub fn into_single(self) -> Option<ApiResponse> {
        match self {
            Self::Single(response) => Some(response),
            Self::Paged(_) => None,
        }
    }

    /// Unwrap the page aggregate; `None` for single responses
    pub fn into_paged(self) -> Option<PageSet> {
        match self {
            Self::Paged(set) => Some(set),
            Self::Single(_) => None,
        }
    }
}

/// HTTP API client with pluggable authentication, transport retries, rate
/// limiting, and transparent pagination
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    auth: Arc<dyn AuthStrategy>,
    policy: Arc<dyn ResponsePolicy>,
    limiter: Option<RateLimiter>,
    stats: StatsTracker,
    failed: AtomicBool,
}

impl ApiClient {
    /// Create a client with no authentication and the default response
    /// policy
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_parts(config, Arc::new(NoAuth), Arc::new(DefaultPolicy))
    }

    /// Create a client with the given auth strategy
    pub fn with_auth(config: ClientConfig, auth: impl AuthStrategy + 'static) -> Result<Self> {
        Self::with_parts(config, Arc::new(auth), Arc::new(DefaultPolicy))
    }

    /// Create a client from explicit parts
    pub fn with_parts(
        config: ClientConfig,
        auth: Arc<dyn AuthStrategy>,
        policy: Arc<dyn ResponsePolicy>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(Error::Http)?;

        let limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            http,
            config,
            auth,
            policy,
            limiter,
            stats: StatsTracker::new(),
            failed: AtomicBool::new(false),
        })
    }

    /// Replace the auth strategy
    pub fn set_auth(&mut self, auth: impl AuthStrategy + 'static) {
        self.auth = Arc::new(auth);
    }

    /// Replace the response policy
    pub fn set_policy(&mut self, policy: impl ResponsePolicy + 'static) {
        self.policy = Arc::new(policy);
    }

    /// The client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ========================================================================
    // Convenience methods
    // ========================================================================

    /// Make a GET request with default options
    pub async fn get(&self, endpoint: &str) -> Result<Outcome> {
        self.send(Method::GET, endpoint, RequestOptions::default())
            .await
    }

    /// Make a GET request with options
    pub async fn get_with_options(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Outcome> {
        self.send(Method::GET, endpoint, options).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, endpoint: &str, body: Value) -> Result<Outcome> {
        self.send(Method::POST, endpoint, RequestOptions::new().json(body))
            .await
    }

    /// Make a POST request with options
    pub async fn post_with_options(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Outcome> {
        self.send(Method::POST, endpoint, options).await
    }

    /// Make a GET request and deserialize the body into `T`.
    ///
    /// Single exchange: pagination is not followed, and a body that does
    /// not parse as `T` is a hard validation error.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.get_json_with_options(endpoint, RequestOptions::default())
            .await
    }

    /// Make a GET request with options and deserialize the body into `T`
    pub async fn get_json_with_options<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let response = self.send_once(Method::GET, endpoint, &options).await?;
        response.parse()
    }

    // ========================================================================
    // Request pipeline
    // ========================================================================

    /// Send a request, transparently following pagination.
    ///
    /// Returns [`Outcome::Single`] for ordinary responses. When the response
    /// classifies as paginated, the engine follows the chain and the whole
    /// aggregate comes back as [`Outcome::Paged`].
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Outcome> {
        let response = self.send_once(method, endpoint, &options).await?;

        if response.is_paginated() {
            let set = pagination::follow_pages(self, endpoint, &options, response).await?;
            Ok(Outcome::Paged(set))
        } else {
            Ok(Outcome::Single(response))
        }
    }

    /// Send one physical exchange without pagination delegation: abort
    /// check, rate limiting, build, authenticate, send, classify, retry on
    /// transport failure, decode.
    pub async fn send_once(
        &self,
        method: Method,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse> {
        let policy = options
            .policy
            .clone()
            .unwrap_or_else(|| Arc::clone(&self.policy));
        let url = self.resolve_url(endpoint)?;
        let max_retries = self.config.max_retries;
        let mut attempt: u32 = 0;

        loop {
            // Re-checked every attempt so in-flight retry loops abort too
            if self.failed.load(Ordering::SeqCst) {
                return Err(Error::Aborted);
            }

            // Wait for rate limiter
            if let Some(ref limiter) = self.limiter {
                limiter.wait().await;
            }

            let mut request = self.build_request(&method, &url, options)?;
            self.auth.authenticate(&mut request)?;

            debug!(
                "Sending request: {} {} (attempt {}/{})",
                method,
                url,
                attempt + 1,
                max_retries + 1
            );
            self.stats.record_request();

            let exchange = async {
                let raw = self.http.execute(request).await?;
                ApiResponse::from_response(method.clone(), raw, Arc::clone(&policy)).await
            };

            match exchange.await {
                Ok(response) => {
                    if response.is_rate_limit_fatal() {
                        warn!("Fatal rate limit on {} {}", method, url);
                        return Err(Error::rate_limit_failure(
                            response.body_text().into_owned(),
                        ));
                    }

                    if response.is_rate_limited() {
                        let retry_after = extract_retry_after(&response);
                        if self.config.retry_rate_limited && attempt < max_retries {
                            warn!(
                                "Rate limited on {} {}, attempt {}/{}, retrying in {}s",
                                method,
                                url,
                                attempt + 1,
                                max_retries + 1,
                                retry_after
                            );
                            tokio::time::sleep(Duration::from_secs(retry_after)).await;
                            attempt += 1;
                            self.stats.record_retry();
                            continue;
                        }
                        warn!(
                            "Rate limited on {} {} (retry after {}s)",
                            method, url, retry_after
                        );
                        return Err(Error::RateLimited {
                            retry_after_seconds: retry_after,
                        });
                    }

                    let status = response.status();
                    if options.raise_for_status
                        && (status.is_client_error() || status.is_server_error())
                    {
                        warn!("HTTP {} from {} {}", status.as_u16(), method, url);
                        return Err(Error::http_status(
                            status.as_u16(),
                            response.body_text().into_owned(),
                        ));
                    }

                    response.decode().await?;
                    debug!(
                        "Request succeeded: {} {} ({})",
                        method,
                        url,
                        status.as_u16()
                    );
                    return Ok(response);
                }
                Err(e) => {
                    if attempt < max_retries {
                        let delay = self.retry_backoff(attempt);
                        if e.is_timeout() {
                            warn!(
                                "Request timeout: {} {}, attempt {}/{}, retrying in {:?}",
                                method,
                                url,
                                attempt + 1,
                                max_retries + 1,
                                delay
                            );
                        } else {
                            warn!(
                                "Transport error: {}, attempt {}/{}, retrying in {:?}",
                                e,
                                attempt + 1,
                                max_retries + 1,
                                delay
                            );
                        }
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        self.stats.record_retry();
                        continue;
                    }

                    return Err(if e.is_timeout() {
                        Error::Timeout {
                            timeout_ms: options
                                .timeout
                                .unwrap_or(self.config.timeout)
                                .as_millis() as u64,
                        }
                    } else {
                        Error::Http(e)
                    });
                }
            }
        }
    }

    // ========================================================================
    // Lifecycle and stats
    // ========================================================================

    /// Mark the client as failed. Every subsequent send aborts before
    /// touching the transport, attempts already inside a retry loop
    /// included.
    pub fn mark_failed(&self) {
        warn!("Client marked as failed; subsequent requests will abort");
        self.failed.store(true, Ordering::SeqCst);
    }

    /// Whether the failure flag is set
    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    /// Snapshot of the request statistics
    pub fn stats(&self) -> ClientStats {
        self.stats.snapshot()
    }

    /// Whether rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.limiter.is_some()
    }

    // ========================================================================
    // Request building
    // ========================================================================

    /// Resolve an endpoint against the configured base URL. Absolute
    /// http(s) URLs pass through untouched.
    fn resolve_url(&self, endpoint: &str) -> Result<Url> {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return Ok(Url::parse(endpoint)?);
        }

        let base = self.config.base_url.as_deref().ok_or_else(|| {
            Error::config(format!("Relative endpoint {endpoint:?} requires a base URL"))
        })?;

        let joined = format!(
            "{}/{}",
            base.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        Ok(Url::parse(&joined)?)
    }

    /// Build one owned request from the resolved URL and the options merged
    /// over the configured defaults.
    ///
    /// Header names merge case-insensitively, so a per-request header
    /// replaces a default under any spelling. Query parameters already
    /// embedded in the URL win over carried ones: carried parameters are
    /// only appended when the URL does not set them.
    fn build_request(
        &self,
        method: &Method,
        url: &Url,
        options: &RequestOptions,
    ) -> Result<Request> {
        let mut builder = self.http.request(method.clone(), url.clone());

        let mut headers: HashMap<String, String> = self
            .config
            .default_headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
            .collect();
        headers.extend(
            options
                .headers
                .iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value.clone())),
        );
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut query = self.config.default_query.clone();
        query.extend(
            options
                .query
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        let extra: Vec<(String, String)> = query
            .into_iter()
            .filter(|(name, _)| {
                !url.query_pairs().any(|(existing, _)| existing == name.as_str())
            })
            .collect();
        if !extra.is_empty() {
            builder = builder.query(&extra);
        }

        if let Some(ref body) = options.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(Error::Http)
    }

    /// Normalized identity of a request, for pagination cycle comparison
    pub(crate) fn page_key(
        &self,
        endpoint: &str,
        query: &HashMap<String, String>,
    ) -> Result<PageKey> {
        let url = self.resolve_url(endpoint)?;
        let mut merged = self.config.default_query.clone();
        merged.extend(
            query
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        Ok(PageKey::new(&url, &merged))
    }

    /// Exponential backoff delay for a retry attempt, capped at the
    /// configured maximum
    pub(crate) fn retry_backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        let delay = self.config.initial_backoff.saturating_mul(factor);
        std::cmp::min(delay, self.config.max_backoff)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.limiter.is_some())
            .field("failed", &self.is_failed())
            .finish_non_exhaustive()
    }
}

/// Seconds to wait from a rate-limited response's `Retry-After` header,
/// defaulting to 60 when absent or not delta-seconds
fn extract_retry_after(response: &ApiResponse) -> u64 {
    response
        .header("retry-after")
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(60)
}
