//! HTTP client module
//!
//! Provides the request pipeline with retry, rate limiting, and response
//! classification.
//!
//! # Features
//!
//! - **Automatic Retries**: Transport failures retried with exponential backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Classification**: Fatal rate limits, 429s, and error statuses mapped to errors
//! - **Pagination**: Paginated responses handed to the pagination engine

mod client;
mod rate_limit;
mod request;
mod stats;

pub use client::{ApiClient, Outcome};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use request::RequestOptions;
pub use stats::ClientStats;
