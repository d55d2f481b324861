//! Configuration management for the request engine.
//!
//! This module provides configuration loading, validation, and access through
//! a process-wide singleton. Settings are read from the "rest-engine" key of a
//! JSON settings document and merged with defaults.

pub mod schema;

pub use schema::EngineConfig;

use once_cell::sync::Lazy;
use serde_json::Value;
use std::fmt;
use std::sync::RwLock;

/// Key under which engine settings live in a settings document.
pub const SETTINGS_KEY: &str = "rest-engine";

/// Global configuration instance.
///
/// This is lazily initialized on first access and can be updated when settings change.
static CONFIG: Lazy<RwLock<EngineConfig>> = Lazy::new(|| RwLock::new(EngineConfig::default()));

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The settings could not be deserialized.
    Parse(String),
    /// The settings deserialized but failed validation.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Failed to parse settings: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Loads configuration from a JSON settings document.
///
/// Reads the "rest-engine" object, merges it with defaults, validates the
/// result, and installs it as the global configuration.
///
/// # Example
///
/// ```no_run
/// use rest_engine::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "rest-engine": {
///         "timeout": 60000,
///         "followRedirects": false
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.timeout, 60000);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<EngineConfig, ConfigError> {
    let mut config = EngineConfig::default();

    if let Some(settings) = settings_json {
        if let Some(engine_settings) = settings.get(SETTINGS_KEY) {
            let user_config = serde_json::from_value::<EngineConfig>(engine_settings.clone())
                .map_err(|e| ConfigError::Parse(e.to_string()))?;
            config = config.merge(&user_config);
        }
    }

    config.validate().map_err(ConfigError::Invalid)?;

    if let Ok(mut global_config) = CONFIG.write() {
        *global_config = config.clone();
    }

    log::debug!(
        "Loaded engine configuration (timeout {}ms, redirects {})",
        config.timeout,
        if config.follow_redirects { "on" } else { "off" }
    );

    Ok(config)
}

/// Gets the current global configuration.
///
/// Returns the default configuration if none has been loaded yet.
pub fn get_config() -> EngineConfig {
    CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_else(|_| EngineConfig::default())
}

/// Updates the global configuration in place.
///
/// If the result fails validation the defaults are restored.
pub fn update_config<F>(updater: F)
where
    F: FnOnce(&mut EngineConfig),
{
    if let Ok(mut config) = CONFIG.write() {
        updater(&mut config);

        if let Err(e) = config.validate() {
            log::warn!("Configuration validation failed after update: {}", e);
            *config = EngineConfig::default();
        }
    }
}

/// Resets the configuration to defaults.
pub fn reset_config() {
    if let Ok(mut config) = CONFIG.write() {
        *config = EngineConfig::default();
    }
}
