//! Per-request options
//!
//! [`RequestOptions`] carries everything a caller can vary per logical call:
//! extra headers and query parameters, a JSON body, status-error raising,
//! the pagination result limit, a timeout override, and a response-policy
//! override. Defaults are empty except `raise_for_status`, which is on.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::response::ResponsePolicy;

/// Caller-supplied options for one logical call
#[derive(Clone)]
pub struct RequestOptions {
    /// Extra headers; override the configured defaults on collision
    pub headers: HashMap<String, String>,

    /// Extra query parameters; override the configured defaults on collision
    pub query: HashMap<String, String>,

    /// JSON request body
    pub body: Option<Value>,

    /// Fail with an HTTP status error on 4xx/5xx responses
    pub raise_for_status: bool,

    /// Cap on the number of aggregated pagination results
    pub result_limit: Option<usize>,

    /// Override the configured timeout for this call
    pub timeout: Option<Duration>,

    /// Override the client's response policy for this call
    pub policy: Option<Arc<dyn ResponsePolicy>>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            query: HashMap::new(),
            body: None,
            raise_for_status: true,
            result_limit: None,
            timeout: None,
            policy: None,
        }
    }
}

impl RequestOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Set the JSON request body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Enable or disable failing on 4xx/5xx statuses
    #[must_use]
    pub fn raise_for_status(mut self, raise: bool) -> Self {
        self.raise_for_status = raise;
        self
    }

    /// Cap the number of aggregated pagination results
    #[must_use]
    pub fn result_limit(mut self, limit: usize) -> Self {
        self.result_limit = Some(limit);
        self
    }

    /// Override the configured timeout for this call
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the client's response policy for this call
    #[must_use]
    pub fn policy(mut self, policy: impl ResponsePolicy + 'static) -> Self {
        self.policy = Some(Arc::new(policy));
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("headers", &self.headers)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("raise_for_status", &self.raise_for_status)
            .field("result_limit", &self.result_limit)
            .field("timeout", &self.timeout)
            .field("policy_override", &self.policy.is_some())
            .finish()
    }
}
