//! Request template resolution.
//!
//! Merges built-in variables with the active environment and substitutes the
//! result into every textual field of a request template:
//!
//! 1. built-ins are computed (`randomUUID4`, `timeNow`, `unixTimestamp`);
//! 2. environment values are resolved against the built-ins, then every
//!    environment key is added to the variable set, overriding a built-in of
//!    the same name;
//! 3. the merged set is substituted into URL, headers, path and query
//!    parameters, body and authentication fields.
//!
//! The stored environment is never modified; a resolved snapshot is returned
//! instead.

use super::builtins::{builtin_variables, BuiltinSource};
use super::substitution::VariableContext;
use crate::environment::Environment;
use crate::models::{Auth, KeyValue, RequestBody, RequestTemplate};

/// Output of [`resolve_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The template with every known placeholder substituted.
    pub request: RequestTemplate,

    /// Snapshot of the environment with built-ins expanded in its values.
    pub environment: Option<Environment>,
}

/// Returns a copy of `environment` whose values have built-in placeholders
/// expanded. Other placeholders are left as they are.
pub fn resolve_environment(environment: &Environment, builtins: &VariableContext) -> Environment {
    let mut resolved = environment.clone();
    resolve_pairs(&mut resolved.values, builtins);
    resolved
}

/// Resolves a request template against built-ins and an optional environment.
///
/// The template is taken by value: callers pass their own copy so the stored
/// original keeps its placeholders.
pub fn resolve_request(
    mut request: RequestTemplate,
    environment: Option<&Environment>,
    source: &dyn BuiltinSource,
) -> Resolved {
    let builtins = VariableContext::from_pairs(builtin_variables(source));
    let mut context = builtins.clone();

    let environment = environment.map(|env| {
        let resolved = resolve_environment(env, &builtins);
        context.extend(
            resolved
                .values
                .iter()
                .filter(|kv| kv.enabled)
                .map(|kv| (kv.key.clone(), kv.value.clone())),
        );
        resolved
    });

    log::debug!(
        "Resolving request '{}' with {} variables (environment: {})",
        request.id,
        context.len(),
        environment
            .as_ref()
            .map(|env| env.name.as_str())
            .unwrap_or("none")
    );

    apply_variables(&mut request, &context);

    Resolved {
        request,
        environment,
    }
}

/// Substitutes the context into every field that accepts placeholders.
///
/// The post-request action is left alone: its path and target are not
/// substitution targets.
pub fn apply_variables(request: &mut RequestTemplate, context: &VariableContext) {
    context.substitute_in_place(&mut request.url);
    resolve_pairs(&mut request.headers, context);
    resolve_pairs(&mut request.path_params, context);
    resolve_pairs(&mut request.query_params, context);

    match &mut request.body {
        RequestBody::None => {}
        RequestBody::Raw { data, .. } => context.substitute_in_place(data),
        RequestBody::FormData { fields } | RequestBody::UrlEncoded { fields } => {
            resolve_pairs(fields, context)
        }
    }

    match &mut request.auth {
        Auth::None => {}
        Auth::Bearer { token } => context.substitute_in_place(token),
        Auth::Basic { username, password } => {
            context.substitute_in_place(username);
            context.substitute_in_place(password);
        }
        Auth::ApiKey { key, value } => {
            context.substitute_in_place(key);
            context.substitute_in_place(value);
        }
    }
}

fn resolve_pairs(pairs: &mut [KeyValue], context: &VariableContext) {
    for pair in pairs {
        context.substitute_in_place(&mut pair.value);
    }
}
