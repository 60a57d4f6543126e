// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Clientele
//!
//! A reusable toolkit for building HTTP API clients: pluggable
//! authentication, a retrying request pipeline, lazy content decoding, and
//! transparent link-header pagination.
//!
//! ## Features
//!
//! - **Pluggable Auth**: None, HTTP Basic, and token-header strategies
//! - **Request Pipeline**: Transport retries with backoff, rate limiting, response classification
//! - **Lazy Decoding**: JSON, text, or bytes decoded once on demand and cached
//! - **Transparent Pagination**: Link-header chains followed and aggregated, with cycle detection
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use clientele::{ApiClient, ClientConfig, Result, TokenAuth};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::builder()
//!         .base_url("https://api.example.com")
//!         .max_retries(3)
//!         .build();
//!     let client = ApiClient::with_auth(config, TokenAuth::new("secret-token"))?;
//!
//!     // Single response, deserialized
//!     let user: serde_json::Value = client.get_json("/user").await?;
//!
//!     // Paginated responses are followed and aggregated transparently
//!     let outcome = client.get("/user/repos").await?;
//!     for repo in outcome.results() {
//!         println!("{}", repo["full_name"]);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           ApiClient                             │
//! │   get()/post()/send() → Outcome::Single | Outcome::Paged        │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬────────────┬──────┴────────┬───────────────────────┐
//! │   Auth   │  Pipeline  │   Response    │      Pagination       │
//! ├──────────┼────────────┼───────────────┼───────────────────────┤
//! │ NoAuth   │ Retry      │ Classify      │ Link header follow    │
//! │ Basic    │ Backoff    │ Decode (lazy) │ Cycle detection       │
//! │ Token    │ Rate limit │ Policy hooks  │ Result aggregation    │
//! └──────────┴────────────┴───────────────┴───────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client toolkit
pub mod error;

/// Client configuration and builder
pub mod config;

/// Authentication strategies
pub mod auth;

/// HTTP pipeline with retry and rate limiting
pub mod http;

/// Response wrapper, decoding, and classification policies
pub mod response;

/// Link-header pagination engine
pub mod pagination;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{AuthStrategy, BasicAuth, BearerTokenAuth, NoAuth, TokenAuth};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result, ResultExt};
pub use http::{ApiClient, ClientStats, Outcome, RateLimiter, RateLimiterConfig, RequestOptions};
pub use pagination::{PageRequest, PageSet};
pub use response::{ApiResponse, Content, DefaultPolicy, ResponsePolicy};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
