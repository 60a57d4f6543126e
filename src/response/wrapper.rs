//! Response wrapper
//!
//! [`ApiResponse`] wraps one physical HTTP exchange: the buffered raw parts
//! plus cached classification and decoded content. Instances are created by
//! the request pipeline but can also be built from raw parts for testing
//! custom policies without a live transport.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use once_cell::sync::OnceCell;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::content::{decode_body, Content};
use super::policy::ResponsePolicy;
use crate::error::{Error, Result};
use crate::pagination::PageRequest;

/// Bodies at or above this size decode on the blocking thread pool
const DECODE_OFFLOAD_BYTES: usize = 64 * 1024;

/// One wrapped HTTP response
pub struct ApiResponse {
    method: Method,
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    content_type: String,
    content: OnceCell<Content>,
    links: OnceCell<HashMap<String, String>>,
    policy: Arc<dyn ResponsePolicy>,
}

impl ApiResponse {
    /// Create a wrapper from raw response parts.
    ///
    /// `method` is the method of the originating request; it drives the
    /// pagination classification.
    pub fn new(
        method: Method,
        url: Url,
        status: StatusCode,
        headers: HeaderMap,
        body: impl Into<Bytes>,
        policy: Arc<dyn ResponsePolicy>,
    ) -> Self {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        Self {
            method,
            url,
            status,
            headers,
            body: body.into(),
            content_type,
            content: OnceCell::new(),
            links: OnceCell::new(),
            policy,
        }
    }

    /// Buffer a transport response into a wrapper
    pub(crate) async fn from_response(
        method: Method,
        response: reqwest::Response,
        policy: Arc<dyn ResponsePolicy>,
    ) -> std::result::Result<Self, reqwest::Error> {
        let status = response.status();
        let url = response.url().clone();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(Self::new(method, url, status, headers, body, policy))
    }

    // ========================================================================
    // Raw accessors
    // ========================================================================

    /// HTTP status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Method of the originating request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Final URL of the exchange
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A single response header as UTF-8, if present and representable
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// The verbatim `Content-Type` header value, empty string when absent
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The raw response body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The raw body as text, with invalid UTF-8 replaced
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    // ========================================================================
    // Classification (delegated to the policy)
    // ========================================================================

    /// Whether this response reports a rate limit
    pub fn is_rate_limited(&self) -> bool {
        self.policy.is_rate_limited(self)
    }

    /// Whether this response reports a non-retryable rate-limit condition
    pub fn is_rate_limit_fatal(&self) -> bool {
        self.policy.is_rate_limit_fatal(self)
    }

    /// Relation name to URL map of pagination links, parsed once and cached
    pub fn pagination_links(&self) -> &HashMap<String, String> {
        self.links.get_or_init(|| self.policy.pagination_links(self))
    }

    /// URL of the next page, if the response links one
    pub fn next_link(&self) -> Option<&str> {
        self.pagination_links().get("next").map(String::as_str)
    }

    /// Whether this response continues on a further page
    pub fn is_paginated(&self) -> bool {
        self.policy.is_paginated(self)
    }

    /// Request overrides that fetch the next page, if any
    pub fn pagination_payload(&self) -> Option<PageRequest> {
        self.policy.pagination_payload(self)
    }

    // ========================================================================
    // Content decoding
    // ========================================================================

    /// Decode the body according to its content type, caching the result.
    ///
    /// Large bodies decode on the blocking thread pool so concurrent tasks
    /// are not stalled. Malformed JSON falls back to raw bytes with a logged
    /// warning; the only failure here is an aborted decode task.
    pub async fn decode(&self) -> Result<&Content> {
        if let Some(content) = self.content.get() {
            return Ok(content);
        }

        let decoded = if self.body.len() >= DECODE_OFFLOAD_BYTES {
            let content_type = self.content_type.clone();
            let body = self.body.clone();
            tokio::task::spawn_blocking(move || decode_body(&content_type, &body))
                .await
                .map_err(|e| Error::decode(format!("Decode task failed: {e}")))?
        } else {
            decode_body(&self.content_type, &self.body)
        };

        Ok(self.content.get_or_init(|| decoded))
    }

    /// The decoded content, if [`decode`](Self::decode) has run
    pub fn content(&self) -> Option<&Content> {
        self.content.get()
    }

    /// The decoded JSON document, if the content decoded as JSON
    pub fn json(&self) -> Option<&Value> {
        self.content.get().and_then(Content::as_json)
    }

    /// The decoded content as a list of JSON values; empty unless the body
    /// decoded to a JSON array
    pub fn result_list(&self) -> &[Value] {
        self.content.get().map(Content::as_list).unwrap_or(&[])
    }

    /// Deserialize the raw body into `T`.
    ///
    /// Unlike [`decode`](Self::decode), a body that does not parse as JSON
    /// matching `T` is a hard [`Error::Validation`], regardless of the
    /// declared content type.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::validation(format!(
                "Response body does not match the requested type: {e}"
            ))
        })
    }
}

impl fmt::Debug for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiResponse")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("status", &self.status.as_u16())
            .field("content_type", &self.content_type)
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}
