//! Response wrapping module
//!
//! # Overview
//!
//! Every physical HTTP exchange produces an [`ApiResponse`]: the raw status,
//! headers, and buffered body, plus classification (rate limited? paginated?)
//! and content decoding. Classification is delegated to an injected
//! [`ResponsePolicy`] so clients can adapt to APIs that signal rate limits or
//! pagination unconventionally; [`DefaultPolicy`] implements the common REST
//! conventions (HTTP 429, `Link` headers with `rel="next"`).
//!
//! Decoding is lazy and cached: the body stays raw until [`ApiResponse::decode`]
//! runs, after which [`Content`] is available through the accessors.

mod content;
mod policy;
mod wrapper;

pub use content::Content;
pub use policy::{DefaultPolicy, ResponsePolicy};
pub use wrapper::ApiResponse;
