//! Error types for the clientele toolkit
//!
//! All fallible operations in this crate return [`Result`], an alias over the
//! single [`Error`] enum. Variants are grouped by the pipeline stage that
//! produces them; `is_retryable` reflects the transport-only retry policy.

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building and sending API requests
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Configuration errors
    // =========================================================================
    /// Invalid client configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Endpoint or base URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // =========================================================================
    // Authentication errors
    // =========================================================================
    /// Credentials could not be applied to the request
    #[error("Authentication error: {message}")]
    Auth {
        /// Error message
        message: String,
    },

    // =========================================================================
    // Transport and pipeline errors
    // =========================================================================
    /// The client was marked as failed; no request was sent
    #[error("Client is marked as failed; request aborted")]
    Aborted,

    /// Connection-level failure from the HTTP transport
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request exceeded its timeout
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout in milliseconds
        timeout_ms: u64,
    },

    /// Response carried an error status code
    #[error("HTTP error {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// The server reported a rate limit (HTTP 429)
    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited {
        /// Seconds to wait before retrying, from the `Retry-After` header
        retry_after_seconds: u64,
    },

    /// A rate-limit condition the client must not retry
    #[error("Rate limit failure: {message}")]
    RateLimitFailure {
        /// Error message
        message: String,
    },

    // =========================================================================
    // Decoding errors
    // =========================================================================
    /// Response body did not match the requested type
    #[error("Response validation failed: {message}")]
    Validation {
        /// Error message
        message: String,
    },

    /// Response body could not be decoded
    #[error("Decode error: {message}")]
    Decode {
        /// Error message
        message: String,
    },

    // =========================================================================
    // Pagination errors
    // =========================================================================
    /// A pagination chain revisited an already-requested page
    #[error("Pagination cycle detected at {url}")]
    PaginationCycle {
        /// The repeated page URL
        url: String,
    },

    // =========================================================================
    // Generic errors
    // =========================================================================
    /// Generic error with a message
    #[error("{0}")]
    Other(String),

    /// Wrapped error from user-supplied strategy or policy code
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a non-retryable rate-limit failure
    pub fn rate_limit_failure(message: impl Into<String>) -> Self {
        Self::RateLimitFailure {
            message: message.into(),
        }
    }

    /// Whether the pipeline may retry after this error.
    ///
    /// Only transport-level failures qualify; status-level errors (including
    /// 429) are classified and surfaced instead of blindly retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout { .. })
    }

    /// Whether this error is a rate-limit signal of either severity
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::RateLimitFailure { .. })
    }

    /// The HTTP status associated with this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add a message in front of the underlying error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add a lazily-built message in front of the underlying error
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Other(format!("{}: {}", message.into(), e.into())))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Other(format!("{}: {}", f(), e.into())))
    }
}
