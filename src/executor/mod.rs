//! HTTP request executor.
//!
//! This module sends a [`PreparedRequest`] with reqwest, measures the time
//! from dispatch until the body is fully read, and captures status, headers,
//! cookies and body. Failures surface as [`TransportError`]; nothing is
//! retried.

pub mod config;
pub mod error;

pub use config::ExecutionConfig;
pub use error::TransportError;

use crate::assembler::PreparedRequest;
use crate::models::{Response, ResponseCookie};
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use std::collections::HashMap;
use std::time::Instant;

/// Sends prepared requests over a reusable HTTP client.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
    config: ExecutionConfig,
}

impl HttpExecutor {
    /// Builds the underlying client from `config`.
    pub fn new(config: ExecutionConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .redirect(config.redirect_policy())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Builds an executor from the global configuration.
    pub fn from_global_config() -> Result<Self, TransportError> {
        Self::new(ExecutionConfig::from_global_config())
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Executes a prepared request and returns the raw, unclassified response.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rest_engine::assembler::assemble;
    /// use rest_engine::executor::{ExecutionConfig, HttpExecutor};
    /// use rest_engine::models::{HttpMethod, RequestTemplate};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let request = RequestTemplate::new("r1", HttpMethod::GET, "https://httpbin.org/get");
    /// let executor = HttpExecutor::new(ExecutionConfig::new(10_000))?;
    ///
    /// let response = executor.execute(&assemble(&request)?).await?;
    /// println!("{}", response.status_line());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute(&self, request: &PreparedRequest) -> Result<Response, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());

        if let Some(body) = request.body.as_str() {
            builder = builder.body(body.to_string());
        }

        log::debug!("Sending {} {}", request.method, request.url);

        let start = Instant::now();
        let result = send(builder).await;
        let elapsed = start.elapsed();

        match result {
            Ok((status, headers, cookies, body)) => {
                log::info!(
                    "{} {} -> {} in {}ms ({} bytes)",
                    request.method,
                    request.url,
                    status.as_u16(),
                    elapsed.as_millis(),
                    body.len()
                );

                Ok(Response {
                    status_code: status.as_u16(),
                    status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
                    headers,
                    cookies,
                    body,
                    elapsed,
                    is_json: false,
                    json: None,
                })
            }
            Err(err) => {
                log::warn!("{} {} failed: {}", request.method, request.url, err);
                Err(err)
            }
        }
    }
}

type RawParts = (
    reqwest::StatusCode,
    HashMap<String, String>,
    Vec<ResponseCookie>,
    Vec<u8>,
);

async fn send(builder: reqwest::RequestBuilder) -> Result<RawParts, TransportError> {
    let response = builder.send().await?;

    let status = response.status();
    let headers = join_headers(response.headers());
    let cookies: Vec<ResponseCookie> = response.cookies().map(convert_cookie).collect();

    // The client timeout also covers the body, so read errors go through
    // the same classification as send errors.
    let body = response.bytes().await?.to_vec();

    Ok((status, headers, cookies, body))
}

/// Flattens a header map, joining repeated headers with `", "`.
pub fn join_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .keys()
        .map(|name| {
            let values: Vec<String> = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect();
            (name.as_str().to_string(), values.join(", "))
        })
        .collect()
}

fn convert_cookie(cookie: reqwest::cookie::Cookie<'_>) -> ResponseCookie {
    ResponseCookie {
        name: cookie.name().to_string(),
        value: cookie.value().to_string(),
        path: cookie.path().map(str::to_string),
        domain: cookie.domain().map(str::to_string),
        expires: cookie.expires().map(DateTime::<Utc>::from),
        max_age: cookie.max_age(),
        secure: cookie.secure(),
        http_only: cookie.http_only(),
    }
}
