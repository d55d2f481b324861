//! HTTP request execution configuration.
//!
//! This module defines the settings the transport client is built from:
//! timeout, redirect policy and user agent.

use crate::config::get_config;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for HTTP request execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Request timeout in milliseconds.
    ///
    /// Maximum time to wait for a complete response (including connection,
    /// headers, and body download).
    pub timeout_ms: u64,

    /// Whether 3xx responses are followed.
    pub follow_redirects: bool,

    /// Maximum number of redirects to follow.
    pub max_redirects: usize,

    /// `User-Agent` sent when the request does not set one.
    pub user_agent: String,
}

impl ExecutionConfig {
    /// Creates an ExecutionConfig with the given timeout and global defaults
    /// for everything else.
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            ..Self::from_global_config()
        }
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Creates an ExecutionConfig from the global engine configuration.
    pub fn from_global_config() -> Self {
        let global_config = get_config();
        Self {
            timeout_ms: global_config.timeout,
            follow_redirects: global_config.follow_redirects,
            max_redirects: global_config.max_redirects as usize,
            user_agent: global_config.user_agent,
        }
    }

    /// Builds the redirect policy for the HTTP client.
    pub fn redirect_policy(&self) -> reqwest::redirect::Policy {
        if self.follow_redirects {
            reqwest::redirect::Policy::limited(self.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        }
    }
}

impl Default for ExecutionConfig {
    /// Reads settings from the global engine configuration.
    fn default() -> Self {
        Self::from_global_config()
    }
}
