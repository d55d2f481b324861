//! Response classification and JSON helpers.
//!
//! A response is JSON when its body parses as JSON, regardless of the
//! `Content-Type` header. JSON bodies get a pretty-printed copy with
//! four-space indentation. Pretty-printing only changes whitespace: numbers,
//! key order and duplicate keys are kept exactly as received.

pub mod json_path;

pub use json_path::{get_json_path, PathError};

use crate::models::Response;
use serde::de::IgnoredAny;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

const INDENT: &str = "    ";

/// Errors that can occur during response formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// JSON parsing or formatting error.
    JsonError(String),

    /// UTF-8 encoding error.
    EncodingError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::JsonError(msg) => write!(f, "JSON formatting error: {}", msg),
            FormatError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
        }
    }
}

impl std::error::Error for FormatError {}

/// Returns true if `text` parses completely as a JSON document.
pub fn is_json(text: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(text).is_ok()
}

/// Pretty-prints JSON with four-space indentation.
///
/// The document is validated, then re-indented token by token, so number
/// literals, key order and duplicate keys come through unchanged. Empty
/// objects and arrays stay on one line.
///
/// # Examples
///
/// ```
/// use rest_engine::formatter::pretty_json;
///
/// let pretty = pretty_json(br#"{"a":1}"#).unwrap();
/// assert_eq!(pretty, "{\n    \"a\": 1\n}");
/// ```
pub fn pretty_json(bytes: &[u8]) -> Result<String, FormatError> {
    let text =
        std::str::from_utf8(bytes).map_err(|e| FormatError::EncodingError(e.to_string()))?;
    serde_json::from_str::<IgnoredAny>(text).map_err(|e| FormatError::JsonError(e.to_string()))?;

    Ok(reindent(text))
}

/// Rewrites the whitespace of already validated JSON.
fn reindent(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            ' ' | '\t' | '\n' | '\r' => {}
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '{' | '[' => {
                out.push(ch);
                skip_whitespace(&mut chars);
                match chars.peek() {
                    Some('}') | Some(']') => {
                        if let Some(close) = chars.next() {
                            out.push(close);
                        }
                    }
                    _ => {
                        depth += 1;
                        push_newline(&mut out, depth);
                    }
                }
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                push_newline(&mut out, depth);
                out.push(ch);
            }
            ',' => {
                out.push(ch);
                push_newline(&mut out, depth);
            }
            ':' => out.push_str(": "),
            _ => out.push(ch),
        }
    }

    out
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while matches!(chars.peek(), Some(' ' | '\t' | '\n' | '\r')) {
        chars.next();
    }
}

fn push_newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Parses a JSON object into a map.
///
/// Fails if the text is not JSON or its top level is not an object.
pub fn parse_json(text: &str) -> Result<Map<String, Value>, FormatError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(FormatError::JsonError(format!(
            "expected a JSON object, found {}",
            value_kind(&other)
        ))),
        Err(e) => Err(FormatError::JsonError(e.to_string())),
    }
}

/// Serializes a value to compact JSON bytes.
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, FormatError> {
    serde_json::to_vec(value).map_err(|e| FormatError::JsonError(e.to_string()))
}

/// Marks a response as JSON or not and fills in its pretty-printed body.
///
/// Bodies that are not valid UTF-8 are never JSON.
pub fn classify(mut response: Response) -> Result<Response, FormatError> {
    let json = match std::str::from_utf8(&response.body) {
        Ok(text) if is_json(text) => Some(pretty_json(text.as_bytes())?),
        _ => None,
    };

    response.is_json = json.is_some();
    response.json = json;

    log::debug!(
        "Classified {} byte response as {}",
        response.body.len(),
        if response.is_json { "JSON" } else { "non-JSON" }
    );

    Ok(response)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
