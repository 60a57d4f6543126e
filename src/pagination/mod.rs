//! Pagination module
//!
//! # Overview
//!
//! When a response classifies as paginated, the engine keeps the logical
//! call going: it re-invokes the request pipeline with the response's
//! pagination payload, aggregates every page and its extracted results in
//! arrival order, enforces the caller's result limit, and detects cycles by
//! comparing each follow-up's resolved options against every page already
//! requested in the call.
//!
//! The pagination style itself is pluggable: the engine only consumes
//! [`pagination_payload`](crate::response::ResponsePolicy::pagination_payload),
//! so a custom policy can derive next pages from body cursors instead of
//! `Link` headers.

mod engine;
mod types;

pub(crate) use engine::follow_pages;
pub(crate) use types::PageKey;
pub use types::{PageRequest, PageSet};
