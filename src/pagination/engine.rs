//! Pagination engine
//!
//! Drives a paginated logical call to completion: pages are fetched strictly
//! sequentially (each follow-up derives from the previous response's
//! pagination payload), results are aggregated in arrival order, and every
//! follow-up is checked against the pages already requested so a cycling
//! next link fails fast instead of looping forever.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::types::{PageKey, PageSet};
use crate::error::{Error, Result};
use crate::http::{ApiClient, RequestOptions};
use crate::response::ApiResponse;

/// Follow a paginated logical call to completion.
///
/// `first` is the already-classified first page; `endpoint` and `options`
/// are the caller's original values for the logical call. Follow-up requests
/// reuse the original method and carry the caller's query parameters, with
/// the pagination payload's values winning.
pub(crate) async fn follow_pages(
    client: &ApiClient,
    endpoint: &str,
    options: &RequestOptions,
    first: ApiResponse,
) -> Result<PageSet> {
    let method = first.method().clone();
    let limit = options.result_limit;
    let mut set = PageSet::default();

    let mut visited: HashSet<PageKey> = HashSet::new();
    visited.insert(client.page_key(endpoint, &options.query)?);

    let mut pending = Some(first);
    while let Some(page) = pending.take() {
        set.results.extend_from_slice(page.result_list());
        let payload = page.pagination_payload();
        set.responses.push(page);

        if let Some(limit) = limit {
            if set.results.len() >= limit {
                debug!(
                    "Result limit of {} reached after {} pages",
                    limit,
                    set.responses.len()
                );
                break;
            }
        }

        let Some(payload) = payload else { break };

        let mut next_options = options.clone();
        next_options.query.extend(payload.query);

        let key = client.page_key(&payload.endpoint, &next_options.query)?;
        if !visited.insert(key) {
            warn!(
                "Pagination cycle detected at {}; aborting call",
                payload.endpoint
            );
            client.mark_failed();
            return Err(Error::PaginationCycle {
                url: payload.endpoint,
            });
        }

        debug!("Following pagination link: {}", payload.endpoint);
        let next = client
            .send_once(method.clone(), &payload.endpoint, &next_options)
            .await?;
        pending = Some(next);
    }

    if let Some(limit) = limit {
        set.results.truncate(limit);
    }

    Ok(set)
}
