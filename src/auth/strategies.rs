//! Authentication strategy implementations
//!
//! Each strategy attaches credentials to an owned request right before it
//! is handed to the transport. Empty credentials are treated as absent:
//! the request goes out without an auth header rather than with a
//! malformed one.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Request;

use crate::error::{Error, Result};

/// Applies credentials to an outgoing request.
///
/// The pipeline builds a fresh request per attempt and holds it exclusively,
/// so implementations mutate headers directly without synchronization.
/// `authenticate` only fails when a credential cannot be represented as an
/// HTTP header value.
pub trait AuthStrategy: Send + Sync {
    /// Attach credentials to the request's headers
    fn authenticate(&self, request: &mut Request) -> Result<()>;
}

// ============================================================================
// NoAuth
// ============================================================================

/// No authentication; leaves every request untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl AuthStrategy for NoAuth {
    fn authenticate(&self, _request: &mut Request) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// BasicAuth
// ============================================================================

/// HTTP Basic authentication (RFC 7617)
///
/// Sets `Authorization: Basic <base64(username:password)>`. When both
/// username and password are empty the request is left unchanged.
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    /// Create a Basic auth strategy
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl AuthStrategy for BasicAuth {
    fn authenticate(&self, request: &mut Request) -> Result<()> {
        if self.username.is_empty() && self.password.is_empty() {
            return Ok(());
        }

        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        let value = HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(|e| Error::auth(format!("Invalid Basic credentials: {e}")))?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TokenAuth
// ============================================================================

/// Token authentication with a configurable header name and value prefix
///
/// Defaults to `Authorization: Bearer <token>`. With an empty prefix the
/// bare token is sent; with an empty token the request is left unchanged.
#[derive(Clone)]
pub struct TokenAuth {
    token: String,
    header_name: String,
    header_prefix: String,
}

/// Bearer-token authentication: [`TokenAuth`] with its default `Bearer`
/// prefix and `Authorization` header
pub type BearerTokenAuth = TokenAuth;

impl TokenAuth {
    /// Create a token strategy targeting `Authorization: Bearer <token>`
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            header_name: "Authorization".to_string(),
            header_prefix: "Bearer".to_string(),
        }
    }

    /// Send the token in a different header
    #[must_use]
    pub fn with_header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    /// Change the value prefix; an empty prefix sends the bare token
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.header_prefix = prefix.into();
        self
    }
}

impl AuthStrategy for TokenAuth {
    fn authenticate(&self, request: &mut Request) -> Result<()> {
        if self.token.is_empty() {
            return Ok(());
        }

        let value = if self.header_prefix.is_empty() {
            self.token.clone()
        } else {
            format!("{} {}", self.header_prefix, self.token)
        };

        let name = HeaderName::from_bytes(self.header_name.as_bytes()).map_err(|e| {
            Error::auth(format!(
                "Invalid auth header name {:?}: {e}",
                self.header_name
            ))
        })?;
        let value = HeaderValue::from_str(&value)
            .map_err(|e| Error::auth(format!("Invalid auth header value: {e}")))?;
        request.headers_mut().insert(name, value);
        Ok(())
    }
}

impl fmt::Debug for TokenAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuth")
            .field("header_name", &self.header_name)
            .field("header_prefix", &self.header_prefix)
            .finish_non_exhaustive()
    }
}
