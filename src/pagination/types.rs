//! Pagination types
//!
//! [`PageRequest`] is the payload a response policy derives from one page to
//! fetch the next; [`PageSet`] is the aggregate a paginated logical call
//! returns. [`PageKey`] is the normalized identity the engine uses to detect
//! pagination cycles.

use std::collections::{BTreeMap, HashMap, HashSet};

use reqwest::Url;
use serde_json::Value;

use crate::response::ApiResponse;

/// Request overrides that fetch the next page of a paginated call
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// Endpoint or absolute URL of the next page
    pub endpoint: String,

    /// Query parameters merged over the caller's for the follow-up request
    /// (payload values win)
    pub query: HashMap<String, String>,
}

impl PageRequest {
    /// Payload pointing at the given endpoint or absolute URL
    pub fn url(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            query: HashMap::new(),
        }
    }

    /// Add a query parameter override
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

/// Aggregate of one paginated logical call
#[derive(Debug, Default)]
pub struct PageSet {
    /// Responses in arrival order
    pub responses: Vec<ApiResponse>,

    /// Flattened result lists of every page in order, truncated to the
    /// caller's result limit when one was set
    pub results: Vec<Value>,
}

impl PageSet {
    /// Number of pages fetched
    pub fn page_count(&self) -> usize {
        self.responses.len()
    }

    /// Whether no pages were aggregated
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// The first page
    pub fn first(&self) -> Option<&ApiResponse> {
        self.responses.first()
    }

    /// The last page
    pub fn last(&self) -> Option<&ApiResponse> {
        self.responses.last()
    }

    /// The aggregated results
    pub fn results(&self) -> &[Value] {
        &self.results
    }
}

/// Normalized identity of one issued page request.
///
/// Two requests are the same page when their resolved URLs (query and
/// fragment stripped) and effective query maps are equal. Parameters
/// embedded in the URL override carried ones, mirroring how the request is
/// actually built, so a next link that legitimately changes an embedded
/// parameter never compares equal to the request that carried it. A name
/// repeated in the URL keeps every value in order; lists differing at any
/// position identify different pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct PageKey {
    url: String,
    query: BTreeMap<String, Vec<String>>,
}

impl PageKey {
    /// Build a key from a resolved URL and the query parameters carried
    /// outside of it
    pub(crate) fn new(url: &Url, carried: &HashMap<String, String>) -> Self {
        let mut query: BTreeMap<String, Vec<String>> = carried
            .iter()
            .map(|(key, value)| (key.clone(), vec![value.clone()]))
            .collect();

        // The first URL occurrence of a name replaces the carried value;
        // later occurrences accumulate
        let mut embedded: HashSet<String> = HashSet::new();
        for (key, value) in url.query_pairs() {
            let key = key.into_owned();
            let value = value.into_owned();
            if embedded.insert(key.clone()) {
                query.insert(key, vec![value]);
            } else if let Some(values) = query.get_mut(&key) {
                values.push(value);
            }
        }

        let mut base = url.clone();
        base.set_query(None);
        base.set_fragment(None);

        Self {
            url: base.to_string(),
            query,
        }
    }
}
