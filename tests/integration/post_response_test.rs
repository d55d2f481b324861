//! Post-request action integration tests
//!
//! These tests verify that values extracted from JSON responses are written
//! back to the stored environment and picked up by the next request.

use super::{fixed_builtins, init_test_env, service_for, test_executor, ReadOnlyStore};

use rest_engine::environment::Environment;
use rest_engine::models::{HttpMethod, PostRequestAction, RequestTemplate};
use rest_engine::store::{EnvironmentStore, MemoryStore, StoreError};
use rest_engine::{RequestService, SendError};

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn login_template(base: &str) -> RequestTemplate {
    RequestTemplate::new("login", HttpMethod::POST, format!("{}/login", base))
        .with_post_request(PostRequestAction::set_env_from_body("session.id", "sid"))
}

fn dev_environment() -> Environment {
    let mut env = Environment::new("dev", "Development");
    env.set_key("stamp", "{{timeNow}}");
    env
}

#[tokio::test]
async fn test_session_id_is_saved_and_reused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"session": {"id": "abc123"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("x-session", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": "ada"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.insert_request(login_template(&server.uri()));
    let mut me = RequestTemplate::new("me", HttpMethod::GET, format!("{}/me", server.uri()));
    me.add_header("X-Session", "{{sid}}");
    store.insert_request(me);
    store.insert_environment(dev_environment());

    let service = service_for(&store);
    let response = service.send_request("login", Some("dev")).await.unwrap();
    assert!(response.is_json);

    let saved = store.get_environment("dev").unwrap();
    assert_eq!(saved.get("sid"), Some("abc123"));
    // Only the target key changes; built-ins in other values stay unexpanded.
    assert_eq!(saved.get("stamp"), Some("{{timeNow}}"));
    assert_eq!(store.update_count(), 1);

    let response = service.send_request("me", Some("dev")).await.unwrap();
    assert_eq!(response.status_code, 200);
}

#[tokio::test]
async fn test_non_json_response_leaves_environment_alone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("session=abc123"))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.insert_request(login_template(&server.uri()));
    store.insert_environment(dev_environment());

    let response = service_for(&store)
        .send_request("login", Some("dev"))
        .await
        .unwrap();

    assert!(!response.is_json);
    assert_eq!(store.get_environment("dev"), Some(dev_environment()));
    assert_eq!(store.update_count(), 0);
}

#[tokio::test]
async fn test_missing_or_non_string_value_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"session": {"id": 99}})))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.insert_request(login_template(&server.uri()));
    store.insert_environment(dev_environment());

    let response = service_for(&store)
        .send_request("login", Some("dev"))
        .await
        .unwrap();

    assert!(response.is_json);
    assert!(store.get_environment("dev").unwrap().get("sid").is_none());
    assert_eq!(store.update_count(), 0);
}

#[tokio::test]
async fn test_action_without_environment_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"session": {"id": "x"}})))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.insert_request(login_template(&server.uri()));

    let response = service_for(&store).send_request("login", None).await.unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(store.update_count(), 0);
}

#[tokio::test]
async fn test_persist_failure_discards_response() {
    init_test_env();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"session": {"id": "x"}})))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.insert_request(login_template(&server.uri()));
    store.insert_environment(dev_environment());

    let service = RequestService::new(store.clone(), ReadOnlyStore(store.clone()), test_executor(5_000))
        .with_builtins(fixed_builtins());

    let err = service.send_request("login", Some("dev")).await.unwrap_err();
    assert_eq!(
        err,
        SendError::EffectPersist(StoreError::Unavailable("disk full".to_string()))
    );
    assert_eq!(store.get_environment("dev"), Some(dev_environment()));
}
