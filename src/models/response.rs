//! HTTP response data models.
//!
//! This module defines the outcome of one request execution: status, headers,
//! cookies, raw body, elapsed time and the JSON classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A cookie received through a `Set-Cookie` response header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseCookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    pub max_age: Option<Duration>,
    pub secure: bool,
    pub http_only: bool,
}

impl ResponseCookie {
    /// Creates a cookie with only a name and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            expires: None,
            max_age: None,
            secure: false,
            http_only: false,
        }
    }
}

/// Represents an HTTP response received from a server.
///
/// Built fresh for every execution and not modified after it is returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code (e.g., 200, 404, 500).
    pub status_code: u16,

    /// Canonical reason phrase (e.g., "OK", "Not Found").
    pub status_text: String,

    /// Response headers. Repeated headers are joined with `", "`.
    pub headers: HashMap<String, String>,

    pub cookies: Vec<ResponseCookie>,

    /// Response body as raw bytes.
    pub body: Vec<u8>,

    /// Wall-clock time from dispatch until the body was fully read.
    pub elapsed: Duration,

    /// Whether the body parses as a complete JSON document.
    pub is_json: bool,

    /// Four-space indented rendering of the body, set only when `is_json` is.
    pub json: Option<String>,
}

impl Response {
    /// Creates an empty, non-JSON response with the given status.
    pub fn new(status_code: u16, status_text: impl Into<String>) -> Self {
        Self {
            status_code,
            status_text: status_text.into(),
            headers: HashMap::new(),
            cookies: Vec::new(),
            body: Vec::new(),
            elapsed: Duration::ZERO,
            is_json: false,
            json: None,
        }
    }

    /// Checks if the response status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Gets a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Gets a cookie by name.
    pub fn cookie(&self, name: &str) -> Option<&ResponseCookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    /// Attempts to read the body as UTF-8 text.
    pub fn body_as_string(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }

    /// Body size in bytes.
    pub fn size(&self) -> usize {
        self.body.len()
    }

    /// Text to show in a response view: the pretty JSON when available,
    /// otherwise the body decoded lossily.
    pub fn display_body(&self) -> String {
        match &self.json {
            Some(json) => json.clone(),
            None => String::from_utf8_lossy(&self.body).into_owned(),
        }
    }

    /// One-line summary, e.g. `200 OK, 120ms, 2.1 KB`.
    pub fn status_line(&self) -> String {
        format!(
            "{} {}, {}ms, {}",
            self.status_code,
            self.status_text,
            self.elapsed.as_millis(),
            format_size(self.size())
        )
    }
}

fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}
