//! HTTP request template data models.
//!
//! This module defines the stored, user-editable request definition the engine
//! works from: method, URL, headers, parameters, body, authentication and the
//! optional post-request action. Every textual field may carry `{{name}}`
//! placeholders that are resolved before the request is assembled.

use crate::assembler::error::{ConstructionError, RequestField};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// HTTP request method.
///
/// The fixed set of methods a request template can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// HTTP DELETE method - remove a resource
    DELETE,
    /// HTTP HEAD method - retrieve headers only
    HEAD,
    /// HTTP OPTIONS method - describe communication options
    OPTIONS,
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }

    /// Converts the method into the transport's method type.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::PATCH => reqwest::Method::PATCH,
            HttpMethod::DELETE => reqwest::Method::DELETE,
            HttpMethod::HEAD => reqwest::Method::HEAD,
            HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
        }
    }
}

impl FromStr for HttpMethod {
    type Err = ConstructionError;

    /// Parses a method name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "PATCH" => Ok(HttpMethod::PATCH),
            "DELETE" => Ok(HttpMethod::DELETE),
            "HEAD" => Ok(HttpMethod::HEAD),
            "OPTIONS" => Ok(HttpMethod::OPTIONS),
            _ => Err(ConstructionError::new(
                RequestField::Method,
                format!("unsupported HTTP method '{}'", s),
            )),
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_enabled() -> bool {
    true
}

/// An ordered key/value pair used for headers, parameters, form fields and
/// environment values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,

    /// Disabled pairs are kept in the template but skipped when assembling.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl KeyValue {
    /// Creates an enabled pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Creates a pair that is stored but ignored by the assembler.
    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(key, value)
        }
    }
}

/// Request body. Exactly one variant is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RequestBody {
    /// No body.
    #[default]
    None,

    /// Raw text with a declared content-type hint (e.g. `application/json`).
    Raw {
        #[serde(default)]
        content_type: String,
        data: String,
    },

    /// Form fields.
    FormData { fields: Vec<KeyValue> },

    /// URL-encoded fields.
    UrlEncoded { fields: Vec<KeyValue> },
}

impl RequestBody {
    /// Creates a raw text body.
    pub fn raw(content_type: impl Into<String>, data: impl Into<String>) -> Self {
        RequestBody::Raw {
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Returns `true` if this body would produce no payload.
    pub fn is_empty(&self) -> bool {
        match self {
            RequestBody::None => true,
            RequestBody::Raw { data, .. } => data.is_empty(),
            RequestBody::FormData { fields } | RequestBody::UrlEncoded { fields } => {
                !fields.iter().any(|f| f.enabled)
            }
        }
    }
}

/// Authentication configured on a request.
///
/// `Auth::None` is the explicit "no authentication" marker; a variant whose
/// credentials are empty is kept as configured but has no effect.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Auth {
    #[default]
    None,
    /// `Authorization: Bearer <token>`
    Bearer { token: String },
    /// HTTP Basic authentication (RFC 7617)
    Basic { username: String, password: String },
    /// Custom header carrying an API key.
    ApiKey { key: String, value: String },
}

/// Where a set-environment action reads its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SetEnvSource {
    /// A JSON path into the response body.
    ResponseBody,
    /// A response header. Not implemented yet; treated as a no-op.
    ResponseHeader,
    /// A response cookie. Not implemented yet; treated as a no-op.
    ResponseCookie,
}

/// Store a value taken from the response into the active environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetEnvAction {
    pub from: SetEnvSource,

    /// JSON path (for `ResponseBody`), header or cookie name.
    pub from_key: String,

    /// Environment key that receives the value.
    pub target: String,
}

/// Side effect run after a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PostRequestAction {
    SetEnv(SetEnvAction),

    /// User script. Stored for the editor; the engine does not run scripts.
    Script { language: String, source: String },
}

impl PostRequestAction {
    /// Shorthand for a set-environment action reading from the JSON body.
    pub fn set_env_from_body(path: impl Into<String>, target: impl Into<String>) -> Self {
        PostRequestAction::SetEnv(SetEnvAction {
            from: SetEnvSource::ResponseBody,
            from_key: path.into(),
            target: target.into(),
        })
    }
}

/// A stored HTTP request definition.
///
/// Templates are owned by the storage layer. The engine clones a template
/// before resolving it, so the stored copy never sees substituted values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTemplate {
    /// Unique identifier used by the request store.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    pub method: HttpMethod,

    /// Target URL. May contain `{{variable}}` placeholders and `{key}` path
    /// parameter tokens.
    pub url: String,

    #[serde(default)]
    pub headers: Vec<KeyValue>,

    /// Values for `{key}` tokens in the URL path.
    #[serde(default)]
    pub path_params: Vec<KeyValue>,

    /// Query parameters, already merged into `url` by the editor. They are
    /// resolved along with everything else but not re-applied.
    #[serde(default)]
    pub query_params: Vec<KeyValue>,

    #[serde(default)]
    pub body: RequestBody,

    #[serde(default)]
    pub auth: Auth,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_request: Option<PostRequestAction>,
}

impl RequestTemplate {
    /// Creates a template with no headers, parameters, body or auth.
    pub fn new(id: impl Into<String>, method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            method,
            url: url.into(),
            headers: Vec::new(),
            path_params: Vec::new(),
            query_params: Vec::new(),
            body: RequestBody::None,
            auth: Auth::None,
            post_request: None,
        }
    }

    /// Appends a header. Existing headers with the same name are kept.
    pub fn add_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.push(KeyValue::new(key, value));
    }

    pub fn add_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.path_params.push(KeyValue::new(key, value));
    }

    pub fn add_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query_params.push(KeyValue::new(key, value));
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_post_request(mut self, action: PostRequestAction) -> Self {
        self.post_request = Some(action);
        self
    }

    /// Returns the first enabled header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.enabled && h.key.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}
