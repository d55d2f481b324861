//! Post-request actions.
//!
//! After a response is classified, a template's post-request action may copy
//! a value out of the JSON body into an environment variable and save the
//! environment.
//!
//! An action built with
//! `PostRequestAction::set_env_from_body("session.id", "token")` turns a
//! response of `{"session": {"id": "abc"}}` into `token = abc` in the
//! environment the request was sent with.

use crate::environment::Environment;
use crate::error::SendError;
use crate::formatter::get_json_path;
use crate::models::{PostRequestAction, Response, SetEnvSource};
use crate::store::EnvironmentStore;
use serde_json::Value;
use std::fmt;

/// Why a post-request action did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The template has no post-request action.
    NoAction,

    /// The action is not a set-environment action.
    UnsupportedAction,

    /// The value source is not the response body.
    UnsupportedSource,

    /// The response body is not JSON.
    NotJson,

    /// The path matched nothing (or matched `null`).
    PathNotFound,

    /// The path matched a value that is not a string.
    NotAString,

    /// The request was sent without an environment.
    NoEnvironment,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::NoAction => "no post-request action",
            SkipReason::UnsupportedAction => "action is not set-env",
            SkipReason::UnsupportedSource => "source is not the response body",
            SkipReason::NotJson => "response is not JSON",
            SkipReason::PathNotFound => "path not found",
            SkipReason::NotAString => "value is not a string",
            SkipReason::NoEnvironment => "no environment selected",
        };
        write!(f, "{}", reason)
    }
}

/// Result of applying a post-request action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOutcome {
    Skipped(SkipReason),

    /// `key` was set to `value` and the environment was saved.
    EnvironmentUpdated { key: String, value: String },
}

/// Applies `action` to `environment` using `response`, saving through `store`.
///
/// `environment` should be the stored copy, not the resolved snapshot, so
/// that only the target key changes. Only string values are stored. A save
/// failure is returned as [`SendError::EffectPersist`] and is never retried.
pub fn apply_post_request(
    action: Option<&PostRequestAction>,
    response: &Response,
    environment: Option<Environment>,
    store: &dyn EnvironmentStore,
) -> Result<EffectOutcome, SendError> {
    let outcome = run(action, response, environment, store)?;

    match &outcome {
        EffectOutcome::Skipped(reason) => log::debug!("Post-request action skipped: {}", reason),
        EffectOutcome::EnvironmentUpdated { key, .. } => {
            log::debug!("Post-request action set environment variable '{}'", key)
        }
    }

    Ok(outcome)
}

fn run(
    action: Option<&PostRequestAction>,
    response: &Response,
    environment: Option<Environment>,
    store: &dyn EnvironmentStore,
) -> Result<EffectOutcome, SendError> {
    let action = match action {
        Some(PostRequestAction::SetEnv(action)) => action,
        Some(_) => return Ok(EffectOutcome::Skipped(SkipReason::UnsupportedAction)),
        None => return Ok(EffectOutcome::Skipped(SkipReason::NoAction)),
    };

    if action.from != SetEnvSource::ResponseBody {
        return Ok(EffectOutcome::Skipped(SkipReason::UnsupportedSource));
    }

    if !response.is_json {
        return Ok(EffectOutcome::Skipped(SkipReason::NotJson));
    }

    let body = String::from_utf8_lossy(&response.body);
    let value = match get_json_path(&body, &action.from_key)? {
        Some(Value::String(value)) => value,
        Some(_) => return Ok(EffectOutcome::Skipped(SkipReason::NotAString)),
        None => return Ok(EffectOutcome::Skipped(SkipReason::PathNotFound)),
    };

    let mut environment = match environment {
        Some(environment) => environment,
        None => return Ok(EffectOutcome::Skipped(SkipReason::NoEnvironment)),
    };

    environment.set_key(action.target.clone(), value.clone());
    store
        .update_environment(&environment, false)
        .map_err(SendError::EffectPersist)?;

    Ok(EffectOutcome::EnvironmentUpdated {
        key: action.target.clone(),
        value,
    })
}
