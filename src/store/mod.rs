//! Storage interfaces for request templates and environments.
//!
//! The engine only reads templates and reads or updates environments; how
//! they are persisted is up to the embedder. [`MemoryStore`] is a simple
//! in-process implementation.

use crate::environment::Environment;
use crate::models::RequestTemplate;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Errors reported by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing storage cannot be reached or is in a broken state.
    Unavailable(String),

    /// The store refused the write.
    Rejected(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
            StoreError::Rejected(msg) => write!(f, "Store rejected update: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Read access to request templates.
pub trait RequestStore: Send + Sync {
    fn get_request(&self, id: &str) -> Option<RequestTemplate>;
}

/// Read and write access to environments.
pub trait EnvironmentStore: Send + Sync {
    fn get_environment(&self, id: &str) -> Option<Environment>;

    /// Replaces the stored environment with the same id.
    ///
    /// `notify` asks the store to tell its observers; the engine always
    /// passes `false`.
    fn update_environment(&self, environment: &Environment, notify: bool)
        -> Result<(), StoreError>;
}

impl<T: RequestStore + ?Sized> RequestStore for Arc<T> {
    fn get_request(&self, id: &str) -> Option<RequestTemplate> {
        (**self).get_request(id)
    }
}

impl<T: EnvironmentStore + ?Sized> EnvironmentStore for Arc<T> {
    fn get_environment(&self, id: &str) -> Option<Environment> {
        (**self).get_environment(id)
    }

    fn update_environment(
        &self,
        environment: &Environment,
        notify: bool,
    ) -> Result<(), StoreError> {
        (**self).update_environment(environment, notify)
    }
}

/// In-memory store for templates and environments.
///
/// Clones share the same underlying maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    requests: Arc<RwLock<HashMap<String, RequestTemplate>>>,
    environments: Arc<RwLock<HashMap<String, Environment>>>,
    updates: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a request template, keyed by its id.
    pub fn insert_request(&self, request: RequestTemplate) {
        if let Ok(mut requests) = self.requests.write() {
            requests.insert(request.id.clone(), request);
        }
    }

    /// Adds or replaces an environment, keyed by its id.
    pub fn insert_environment(&self, environment: Environment) {
        if let Ok(mut environments) = self.environments.write() {
            environments.insert(environment.id.clone(), environment);
        }
    }

    /// Number of `update_environment` calls that succeeded.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

impl RequestStore for MemoryStore {
    fn get_request(&self, id: &str) -> Option<RequestTemplate> {
        self.requests.read().ok()?.get(id).cloned()
    }
}

impl EnvironmentStore for MemoryStore {
    fn get_environment(&self, id: &str) -> Option<Environment> {
        self.environments.read().ok()?.get(id).cloned()
    }

    fn update_environment(
        &self,
        environment: &Environment,
        _notify: bool,
    ) -> Result<(), StoreError> {
        let mut environments = self
            .environments
            .write()
            .map_err(|_| StoreError::Unavailable("environment lock poisoned".to_string()))?;

        environments.insert(environment.id.clone(), environment.clone());
        self.updates.fetch_add(1, Ordering::SeqCst);

        log::debug!("Stored environment '{}'", environment.id);
        Ok(())
    }
}
