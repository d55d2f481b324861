//! Variable substitution engine.
//!
//! Replaces `{{name}}` placeholders with values from a [`VariableContext`].
//! Substitution is a single literal pass: names are matched exactly, unknown
//! placeholders are left untouched, and substituted values are never scanned
//! again.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::HashMap;

/// Cached regex pattern for matching `{{variableName}}`.
static VARIABLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("Failed to compile variable regex"));

/// The active variable set for one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableContext {
    variables: HashMap<String, String>,
}

impl VariableContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context from name/value pairs. Later pairs win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut context = Self::new();
        context.extend(pairs);
        context
    }

    /// Inserts a variable, overriding any previous value of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Inserts every pair, overriding existing names.
    pub fn extend<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in pairs {
            self.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Substitutes every known `{{name}}` in `text`.
    pub fn substitute<'a>(&self, text: &'a str) -> Cow<'a, str> {
        substitute_variables(text, self)
    }

    /// Substitutes in place, leaving the string untouched when nothing matched.
    pub fn substitute_in_place(&self, text: &mut String) {
        if let Cow::Owned(resolved) = self.substitute(text) {
            *text = resolved;
        }
    }
}

/// Substitutes all `{{variable}}` patterns in the input text.
///
/// Placeholders whose name is not in the context are kept verbatim, so a
/// missing variable is never an error.
///
/// # Examples
///
/// ```
/// use rest_engine::variables::{substitute_variables, VariableContext};
///
/// let context = VariableContext::from_pairs([("baseUrl", "https://api.example.com")]);
///
/// let result = substitute_variables("{{baseUrl}}/users/{{id}}", &context);
/// assert_eq!(result, "https://api.example.com/users/{{id}}");
/// ```
pub fn substitute_variables<'a>(text: &'a str, context: &VariableContext) -> Cow<'a, str> {
    // Fast path: if there are no variable markers at all, return original text
    if !text.contains("{{") || context.is_empty() {
        return Cow::Borrowed(text);
    }

    let mut replaced = false;
    let result = VARIABLE_REGEX.replace_all(text, |caps: &Captures| match context.get(&caps[1]) {
        Some(value) => {
            replaced = true;
            value.to_string()
        }
        None => caps[0].to_string(),
    });

    if replaced {
        result
    } else {
        Cow::Borrowed(text)
    }
}
