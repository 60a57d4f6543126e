//! Authentication module
//!
//! Supports: no auth, HTTP Basic, and token headers with a configurable
//! name and value prefix (`Bearer` by default).
//!
//! A strategy mutates the outgoing request's headers in place and has no
//! other side effects. One strategy instance is shared read-only across
//! every request of a client.

mod strategies;

pub use strategies::{AuthStrategy, BasicAuth, BearerTokenAuth, NoAuth, TokenAuth};
