//! Response classification policy
//!
//! [`ResponsePolicy`] holds the override points for how a wrapped response
//! is classified. The defaults implement the common REST conventions;
//! implement the trait to adapt a client to APIs that signal rate limits or
//! pagination differently (body cursors, custom headers, quota errors).

use std::collections::HashMap;

use reqwest::Method;

use super::wrapper::ApiResponse;
use crate::pagination::PageRequest;

/// Classification hooks for wrapped responses
pub trait ResponsePolicy: Send + Sync {
    /// Whether the response reports a rate limit the caller may retry later.
    /// Defaults to HTTP 429.
    fn is_rate_limited(&self, response: &ApiResponse) -> bool {
        response.status().as_u16() == 429
    }

    /// Whether the response reports a rate-limit condition that must never
    /// be retried (quota bans and the like). Defaults to false.
    fn is_rate_limit_fatal(&self, response: &ApiResponse) -> bool {
        let _ = response;
        false
    }

    /// Relation name to URL map of the response's pagination links.
    ///
    /// Implementations should read the response's raw headers or body here
    /// rather than call [`ApiResponse::pagination_links`], which caches the
    /// result of this very method.
    fn pagination_links(&self, response: &ApiResponse) -> HashMap<String, String> {
        response
            .header("link")
            .map(parse_link_header)
            .unwrap_or_default()
    }

    /// Whether the response continues on a further page. Defaults to a
    /// `rel="next"` link on a response to a GET request.
    fn is_paginated(&self, response: &ApiResponse) -> bool {
        response.method() == &Method::GET && response.pagination_links().contains_key("next")
    }

    /// Request overrides that fetch the next page, or `None` when the
    /// response is the last page
    fn pagination_payload(&self, response: &ApiResponse) -> Option<PageRequest> {
        response.next_link().map(PageRequest::url)
    }
}

/// Default REST conventions: HTTP 429 rate limiting, `Link` header
/// pagination following `rel="next"` on GET responses
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl ResponsePolicy for DefaultPolicy {}

/// Parse an RFC 5988 `Link` header into a relation → URL map.
///
/// Entries look like `<https://api.example.com/items?page=2>; rel="next"`,
/// comma-separated. Entries without a URL or a `rel` parameter are skipped.
pub(crate) fn parse_link_header(header: &str) -> HashMap<String, String> {
    let mut links = HashMap::new();

    for entry in header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in entry.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(value) = segment.strip_prefix("rel=") {
                rel = Some(value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel)) = (url, rel) {
            links.insert(rel.to_string(), url.to_string());
        }
    }

    links
}
