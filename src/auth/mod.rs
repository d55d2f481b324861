//! HTTP authentication module.
//!
//! Turns a resolved [`Auth`] setting into request headers. Authentication is
//! only added when the request does not already carry the header explicitly,
//! and only when every credential the scheme needs is non-empty.

pub mod basic;

use crate::assembler::error::{ConstructionError, RequestField};
use crate::models::Auth;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};

/// Formats a token into a Bearer authentication header value.
pub fn bearer_token(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Applies authentication to a header map.
///
/// # Returns
///
/// `Ok(true)` if a header was added, `Ok(false)` if the scheme was skipped
/// (no auth, missing credentials, or header already present), and an error
/// if the credentials do not form a valid header.
///
/// # Examples
///
/// ```
/// use rest_engine::auth::apply_authentication;
/// use rest_engine::models::Auth;
/// use reqwest::header::HeaderMap;
///
/// let mut headers = HeaderMap::new();
/// let auth = Auth::Bearer { token: "abc123".to_string() };
///
/// assert!(apply_authentication(&auth, &mut headers).unwrap());
/// assert_eq!(headers["authorization"], "Bearer abc123");
/// ```
pub fn apply_authentication(auth: &Auth, headers: &mut HeaderMap) -> Result<bool, ConstructionError> {
    let (name, value) = match auth {
        Auth::None => return Ok(false),
        Auth::Bearer { token } => {
            if token.is_empty() {
                return Ok(false);
            }
            (AUTHORIZATION, bearer_token(token))
        }
        Auth::Basic { username, password } => {
            if username.is_empty() || password.is_empty() {
                return Ok(false);
            }
            (AUTHORIZATION, basic::basic_auth(username, password))
        }
        Auth::ApiKey { key, value } => {
            if key.is_empty() || value.is_empty() {
                return Ok(false);
            }
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                ConstructionError::new(RequestField::Header(key.clone()), e.to_string())
            })?;
            (name, value.clone())
        }
    };

    if headers.contains_key(&name) {
        log::debug!("Skipping {} auth: '{}' header already set", auth_kind(auth), name);
        return Ok(false);
    }

    let value = HeaderValue::from_str(&value)
        .map_err(|e| ConstructionError::new(RequestField::Header(name.to_string()), e.to_string()))?;
    headers.insert(name, value);

    Ok(true)
}

fn auth_kind(auth: &Auth) -> &'static str {
    match auth {
        Auth::None => "no",
        Auth::Bearer { .. } => "bearer",
        Auth::Basic { .. } => "basic",
        Auth::ApiKey { .. } => "API key",
    }
}
