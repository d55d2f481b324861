//! Request construction error types.

use std::fmt;

/// The part of a request that could not be turned into a transport request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestField {
    Method,
    Url,
    /// A header, identified by its name.
    Header(String),
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestField::Method => write!(f, "method"),
            RequestField::Url => write!(f, "URL"),
            RequestField::Header(name) => write!(f, "header '{}'", name),
        }
    }
}

/// A resolved template could not be assembled into a transport request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionError {
    /// The offending field.
    pub field: RequestField,
    pub message: String,
}

impl ConstructionError {
    pub fn new(field: RequestField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid request {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConstructionError {}

/// Convert URL parsing errors to ConstructionError.
impl From<url::ParseError> for ConstructionError {
    fn from(err: url::ParseError) -> Self {
        ConstructionError::new(RequestField::Url, err.to_string())
    }
}
