//! Property tests for template resolution

use super::fixed_builtins;

use proptest::prelude::*;
use rest_engine::assembler::assemble;
use rest_engine::environment::Environment;
use rest_engine::models::{HttpMethod, RequestTemplate};
use rest_engine::variables::resolve_request;

fn plain_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 /:._-]{0,40}"
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,10}"
}

proptest! {
    #[test]
    fn prop_text_without_placeholders_is_unchanged(
        url in plain_text(),
        header in plain_text(),
        key in identifier(),
        value in plain_text(),
    ) {
        let mut template = RequestTemplate::new("r", HttpMethod::GET, url);
        template.add_header("X-Plain", header);

        let mut env = Environment::new("dev", "Dev");
        env.set_key(key, value);

        let resolved = resolve_request(template.clone(), Some(&env), &fixed_builtins());
        prop_assert_eq!(resolved.request, template);
    }

    #[test]
    fn prop_path_params_and_variables_are_independent(
        segment in identifier(),
        var_value in "[a-z0-9]{1,12}",
        param_value in "[a-z0-9]{1,12}",
    ) {
        // `{segment}` is a path parameter; `{{segment}}` is a variable with
        // the same name.
        let url = format!("http://localhost/{{{{{0}}}}}/{{{0}}}", segment);
        let mut template = RequestTemplate::new("r", HttpMethod::GET, url);
        template.add_path_param(segment.clone(), param_value.clone());

        let mut env = Environment::new("dev", "Dev");
        env.set_key(segment, var_value.clone());

        let resolved = resolve_request(template, Some(&env), &fixed_builtins());
        let prepared = assemble(&resolved.request).unwrap();

        let expected = format!("/{}/{}", var_value, param_value);
        prop_assert_eq!(prepared.url.path(), expected.as_str());
    }
}
