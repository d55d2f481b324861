//! Built-in dynamic variables.
//!
//! `{{randomUUID4}}`, `{{timeNow}}` and `{{unixTimestamp}}` are recomputed on
//! every resolution pass and never persisted. The clock and UUID generator sit
//! behind [`BuiltinSource`] so tests can pin them.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// A random UUID v4, e.g. `3f1c…`.
pub const RANDOM_UUID4: &str = "randomUUID4";

/// Current UTC time in RFC 3339, e.g. `2024-05-01T12:00:00Z`.
pub const TIME_NOW: &str = "timeNow";

/// Current UTC Unix timestamp in seconds.
pub const UNIX_TIMESTAMP: &str = "unixTimestamp";

/// Names of all built-in variables.
pub const BUILTIN_NAMES: [&str; 3] = [RANDOM_UUID4, TIME_NOW, UNIX_TIMESTAMP];

/// Supplies the clock and identifier values behind the built-in variables.
pub trait BuiltinSource: Send + Sync {
    fn new_uuid(&self) -> Uuid;

    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock and random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBuiltins;

impl BuiltinSource for SystemBuiltins {
    fn new_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same UUID and instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedBuiltins {
    pub uuid: Uuid,
    pub now: DateTime<Utc>,
}

impl FixedBuiltins {
    pub fn new(uuid: Uuid, now: DateTime<Utc>) -> Self {
        Self { uuid, now }
    }
}

impl BuiltinSource for FixedBuiltins {
    fn new_uuid(&self) -> Uuid {
        self.uuid
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Computes the built-in variables for one resolution pass.
///
/// The clock is read once so `timeNow` and `unixTimestamp` agree.
pub fn builtin_variables(source: &dyn BuiltinSource) -> Vec<(String, String)> {
    let now = source.now();

    vec![
        (RANDOM_UUID4.to_string(), source.new_uuid().to_string()),
        (
            TIME_NOW.to_string(),
            now.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        (UNIX_TIMESTAMP.to_string(), now.timestamp().to_string()),
    ]
}
