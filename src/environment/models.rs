//! Environment data models.
//!
//! An environment is a named, ordered set of substitution variables scoped to
//! a deployment context (e.g. "staging"). Values may reference built-in
//! variables such as `{{timeNow}}`.

use crate::models::KeyValue;
use serde::{Deserialize, Serialize};

/// Represents a single environment with its variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Environment {
    /// Unique identifier used by the environment store.
    pub id: String,

    /// Environment name (e.g., "dev", "staging", "production").
    #[serde(default)]
    pub name: String,

    /// Ordered variables. Keys are unique.
    #[serde(default)]
    pub values: Vec<KeyValue>,
}

impl Environment {
    /// Creates an empty environment.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Gets a variable value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|kv| kv.key == key)
            .map(|kv| kv.value.as_str())
    }

    /// Sets a variable, replacing the value in place if the key exists and
    /// appending it otherwise.
    pub fn set_key(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.values.iter_mut().find(|kv| kv.key == key) {
            Some(existing) => existing.value = value,
            None => self.values.push(KeyValue::new(key, value)),
        }
    }

    /// Removes a variable, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.values.iter().position(|kv| kv.key == key)?;
        Some(self.values.remove(index).value)
    }

    /// Checks if a variable exists.
    pub fn contains(&self, key: &str) -> bool {
        self.values.iter().any(|kv| kv.key == key)
    }

    /// Returns the number of variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks if the environment has no variables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
