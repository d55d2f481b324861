//! Path parameter substitution.
//!
//! Path parameters use single braces (`/items/{id}`) and are resolved against
//! the template's own parameter list. Only the path part of the URL is
//! touched, and `{{variable}}` tokens are always copied through verbatim.

use crate::models::KeyValue;

/// Replaces `{key}` tokens in the path of `url` with matching parameter values.
///
/// Tokens without an enabled parameter are kept as-is. When a key appears
/// more than once in `params`, the first enabled entry wins.
///
/// # Examples
///
/// ```
/// use rest_engine::assembler::path_params::apply_path_params;
/// use rest_engine::models::KeyValue;
///
/// let url = apply_path_params(
///     "https://api.example.com/items/{id}?q={id}",
///     &[KeyValue::new("id", "42")],
/// );
/// assert_eq!(url, "https://api.example.com/items/42?q={id}");
/// ```
pub fn apply_path_params(url: &str, params: &[KeyValue]) -> String {
    if !params.iter().any(|p| p.enabled) || !url.contains('{') {
        return url.to_string();
    }

    let (start, end) = path_bounds(url);
    let path = replace_path_tokens(&url[start..end], |key| {
        params
            .iter()
            .find(|p| p.enabled && p.key == key)
            .map(|p| p.value.as_str())
    });

    let mut result = String::with_capacity(url.len() + path.len());
    result.push_str(&url[..start]);
    result.push_str(&path);
    result.push_str(&url[end..]);
    result
}

/// Byte range of the path: after the authority, before `?` or `#`.
fn path_bounds(url: &str) -> (usize, usize) {
    let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);

    let start = url[after_scheme..]
        .find(|c| c == '/' || c == '?' || c == '#')
        .map(|i| after_scheme + i)
        .unwrap_or(url.len());

    let end = url[start..]
        .find(|c| c == '?' || c == '#')
        .map(|i| start + i)
        .unwrap_or(url.len());

    (start, end)
}

fn replace_path_tokens<'a, F>(path: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        if tail.starts_with("{{") {
            match tail.find("}}") {
                Some(close) => {
                    out.push_str(&tail[..close + 2]);
                    rest = &tail[close + 2..];
                }
                None => {
                    out.push_str(tail);
                    rest = "";
                }
            }
            continue;
        }

        match tail[1..].find(|c| c == '{' || c == '}') {
            Some(i) if tail.as_bytes()[i + 1] == b'}' => {
                let token = &tail[..i + 2];
                match lookup(&tail[1..i + 1]) {
                    Some(value) => push_path_value(&mut out, value),
                    None => out.push_str(token),
                }
                rest = &tail[i + 2..];
            }
            _ => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

// `?` and `#` would end the path early.
fn push_path_value(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            _ => out.push(c),
        }
    }
}
