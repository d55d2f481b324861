//! HTTP transport error types.
//!
//! This module defines errors that can occur while a prepared request is on
//! the wire: connection failures, timeouts, redirect loops and body reads.

use std::fmt;

/// Errors that can occur during HTTP request execution.
///
/// Every variant is terminal for the call; the engine never retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Request timed out before the full response was read.
    Timeout,

    /// Connection could not be established.
    ///
    /// This includes refused connections and DNS resolution failures.
    Connect(String),

    /// Redirect policy was violated (too many redirects or a loop).
    Redirect(String),

    /// Response body could not be read or decoded.
    Body(String),

    /// The HTTP client could not be created from its configuration.
    Client(String),

    /// Any other transport failure.
    Other(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Timeout => write!(f, "Request timed out"),
            TransportError::Connect(msg) => write!(f, "Connection failed: {}", msg),
            TransportError::Redirect(msg) => write!(f, "Redirect error: {}", msg),
            TransportError::Body(msg) => write!(f, "Failed to read response body: {}", msg),
            TransportError::Client(msg) => write!(f, "HTTP client error: {}", msg),
            TransportError::Other(msg) => write!(f, "Network error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// Convert reqwest errors to TransportError.
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_redirect() {
            TransportError::Redirect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            TransportError::Body(err.to_string())
        } else if err.is_builder() {
            TransportError::Client(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}
