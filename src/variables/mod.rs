//! Variables module.
//!
//! This module provides variable resolution for request templates: built-in
//! dynamic variables, environment variables and `{{name}}` substitution.

pub mod builtins;
pub mod resolver;
pub mod substitution;

pub use builtins::{builtin_variables, BuiltinSource, FixedBuiltins, SystemBuiltins};
pub use resolver::{apply_variables, resolve_environment, resolve_request, Resolved};
pub use substitution::{substitute_variables, VariableContext};
