//! Decoded response content
//!
//! [`Content`] is the result of decoding a response body according to its
//! declared content type. Decoding never fails: JSON bodies that do not
//! parse fall back to raw bytes with a logged warning.

use bytes::Bytes;
use serde_json::Value;
use tracing::warn;

/// Decoded body of an API response
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Parsed JSON document
    Json(Value),
    /// Decoded text body
    Text(String),
    /// Raw bytes: binary content types, or JSON that failed to parse
    Bytes(Bytes),
    /// No body
    Empty,
}

impl Content {
    /// The parsed JSON document, if this is JSON content
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The decoded text, if this is text content
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The raw bytes, if this is byte content
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The decoded content as a list of JSON values; empty unless the
    /// content is a JSON array
    pub fn as_list(&self) -> &[Value] {
        match self {
            Self::Json(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// Whether there was no body to decode
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Whether a `Content-Type` value denotes JSON (`application/json` or any
/// `+json` structured syntax suffix; parameters ignored)
fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Whether a `Content-Type` value denotes text
fn is_text_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    essence.starts_with("text/")
}

/// Decode a response body according to its declared content type
pub(crate) fn decode_body(content_type: &str, body: &Bytes) -> Content {
    if body.is_empty() {
        return Content::Empty;
    }

    if is_json_content_type(content_type) {
        return match serde_json::from_slice(body) {
            Ok(value) => Content::Json(value),
            Err(e) => {
                warn!("JSON parsing failed, keeping raw body: {}", e);
                Content::Bytes(body.clone())
            }
        };
    }

    if is_text_content_type(content_type) {
        return Content::Text(String::from_utf8_lossy(body).into_owned());
    }

    Content::Bytes(body.clone())
}
