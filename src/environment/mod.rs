//! Environment management.
//!
//! Environments are loaded and persisted by the storage layer (see
//! [`crate::store`]). The engine reads them, resolves built-in variables in a
//! snapshot, and writes a value back only through the post-request action.

pub mod models;

pub use models::Environment;
