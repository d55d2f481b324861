//! Request assembly.
//!
//! Turns a fully resolved [`RequestTemplate`] into a transport-ready
//! [`PreparedRequest`]: method, URL with path parameters applied, headers in
//! template order, encoded body, and authentication.

pub mod error;
pub mod path_params;

pub use error::{ConstructionError, RequestField};

use crate::auth::apply_authentication;
use crate::models::{KeyValue, RequestBody, RequestTemplate};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use url::Url;

/// Encoded request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedBody {
    Empty,
    /// Raw text, sent as-is.
    Text(String),
    /// `application/x-www-form-urlencoded` serialization of form fields.
    Form(String),
}

impl PreparedBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, PreparedBody::Empty)
    }

    /// The payload text, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PreparedBody::Empty => None,
            PreparedBody::Text(text) | PreparedBody::Form(text) => Some(text),
        }
    }
}

/// A request ready to hand to the executor.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: reqwest::Method,
    pub url: Url,
    /// Headers in template order; repeated names keep every value.
    pub headers: HeaderMap,
    pub body: PreparedBody,
}

impl PreparedRequest {
    /// First value of a header, if it is valid text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// All values of a header, in insertion order.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }
}

/// Assembles a resolved template into a transport request.
///
/// # Errors
///
/// Returns a [`ConstructionError`] naming the field when the URL does not
/// parse, uses a scheme other than HTTP(S), or when a header name or value
/// is not valid.
///
/// # Examples
///
/// ```
/// use rest_engine::assembler::assemble;
/// use rest_engine::models::{HttpMethod, RequestTemplate};
///
/// let mut request = RequestTemplate::new("r1", HttpMethod::GET, "https://api.example.com/items/{id}");
/// request.add_path_param("id", "42");
///
/// let prepared = assemble(&request).unwrap();
/// assert_eq!(prepared.url.as_str(), "https://api.example.com/items/42");
/// ```
pub fn assemble(request: &RequestTemplate) -> Result<PreparedRequest, ConstructionError> {
    let url = parse_url(&path_params::apply_path_params(
        &request.url,
        &request.path_params,
    ))?;

    let mut headers = HeaderMap::new();
    for header in request.headers.iter().filter(|h| h.enabled && !h.key.is_empty()) {
        let (name, value) = header_pair(&header.key, &header.value)?;
        headers.append(name, value);
    }

    let body = match &request.body {
        RequestBody::None => PreparedBody::Empty,
        RequestBody::Raw { data, .. } if data.is_empty() => PreparedBody::Empty,
        RequestBody::Raw { content_type, data } => {
            if !content_type.is_empty() && !headers.contains_key(CONTENT_TYPE) {
                let (name, value) = header_pair(CONTENT_TYPE.as_str(), content_type)?;
                headers.insert(name, value);
            }
            PreparedBody::Text(data.clone())
        }
        // Both variants share one encoding; Content-Type comes from the
        // template's headers.
        RequestBody::FormData { fields } | RequestBody::UrlEncoded { fields } => {
            encode_form(fields)
        }
    };

    apply_authentication(&request.auth, &mut headers)?;

    Ok(PreparedRequest {
        method: request.method.to_reqwest(),
        url,
        headers,
        body,
    })
}

fn parse_url(raw: &str) -> Result<Url, ConstructionError> {
    let url = Url::parse(raw.trim())?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConstructionError::new(
            RequestField::Url,
            format!("unsupported scheme '{}'", other),
        )),
    }
}

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ConstructionError> {
    let field = || RequestField::Header(name.to_string());

    let header_name = HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|e| ConstructionError::new(field(), e.to_string()))?;
    let header_value =
        HeaderValue::from_str(value).map_err(|e| ConstructionError::new(field(), e.to_string()))?;

    Ok((header_name, header_value))
}

fn encode_form(fields: &[KeyValue]) -> PreparedBody {
    let mut enabled = fields.iter().filter(|f| f.enabled).peekable();
    if enabled.peek().is_none() {
        return PreparedBody::Empty;
    }

    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(enabled.map(|f| (f.key.as_str(), f.value.as_str())))
        .finish();
    PreparedBody::Form(encoded)
}
