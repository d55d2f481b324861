//! JSON path extraction.
//!
//! Supports a small path dialect: an optional leading `$`, dot-separated
//! field names, `[n]` array indices and `["key"]` / `['key']` quoted fields
//! for keys that contain dots or spaces.

use serde_json::Value;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Errors raised while extracting a value by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The document is not valid JSON.
    InvalidJson(String),
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidJson(msg) => write!(f, "Cannot evaluate path on invalid JSON: {}", msg),
        }
    }
}

impl std::error::Error for PathError {}

/// Represents a segment in a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    /// Object field access (e.g., "user", "name")
    Field(String),

    /// Array index access (e.g., [0], [5])
    Index(usize),
}

/// Looks up `path` inside `json_text`.
///
/// Returns `Ok(None)` when any segment is missing, an index is out of range,
/// a segment is applied to the wrong kind of value, the path itself cannot
/// be parsed, or the value found is JSON `null`. Only a malformed document
/// is an error.
///
/// # Examples
///
/// ```
/// use rest_engine::formatter::get_json_path;
///
/// let body = r#"{"session": {"id": "abc123"}, "items": [1, 2]}"#;
///
/// let id = get_json_path(body, "session.id").unwrap();
/// assert_eq!(id, Some(serde_json::json!("abc123")));
///
/// let missing = get_json_path(body, "items[5]").unwrap();
/// assert_eq!(missing, None);
/// ```
pub fn get_json_path(json_text: &str, path: &str) -> Result<Option<Value>, PathError> {
    let document: Value =
        serde_json::from_str(json_text).map_err(|e| PathError::InvalidJson(e.to_string()))?;

    let segments = match parse_segments(path) {
        Some(segments) => segments,
        None => {
            log::debug!("Unparseable JSON path '{}', treating as no match", path);
            return Ok(None);
        }
    };

    let mut current = &document;
    for segment in &segments {
        let next = match segment {
            PathSegment::Field(name) => current.as_object().and_then(|o| o.get(name)),
            PathSegment::Index(index) => current.as_array().and_then(|a| a.get(*index)),
        };

        match next {
            Some(value) => current = value,
            None => return Ok(None),
        }
    }

    if current.is_null() {
        Ok(None)
    } else {
        Ok(Some(current.clone()))
    }
}

/// Splits a path into segments. Returns `None` for an unterminated or
/// non-numeric bracket.
fn parse_segments(path: &str) -> Option<Vec<PathSegment>> {
    let path = path.trim();
    let path = path.strip_prefix('$').unwrap_or(path);

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => flush_field(&mut current, &mut segments),
            '[' => {
                flush_field(&mut current, &mut segments);
                segments.push(parse_bracket(&mut chars)?);
            }
            _ => current.push(ch),
        }
    }

    flush_field(&mut current, &mut segments);
    Some(segments)
}

fn flush_field(current: &mut String, segments: &mut Vec<PathSegment>) {
    if !current.is_empty() {
        segments.push(PathSegment::Field(std::mem::take(current)));
    }
}

/// Parses the inside of `[...]`, consuming the closing bracket.
fn parse_bracket(chars: &mut Peekable<Chars<'_>>) -> Option<PathSegment> {
    match chars.peek().copied() {
        Some(quote @ ('"' | '\'')) => {
            chars.next();
            let mut key = String::new();
            loop {
                match chars.next()? {
                    c if c == quote => break,
                    c => key.push(c),
                }
            }
            match chars.next()? {
                ']' => Some(PathSegment::Field(key)),
                _ => None,
            }
        }
        _ => {
            let mut index = String::new();
            loop {
                match chars.next()? {
                    ']' => break,
                    c => index.push(c),
                }
            }
            index.trim().parse::<usize>().ok().map(PathSegment::Index)
        }
    }
}
