//! End-to-end send tests against a local mock server
//!
//! These tests cover resolution, assembly, execution and classification
//! through `RequestService::send_request`.

use super::{init_test_env, service_for, test_executor};

use rest_engine::assembler::RequestField;
use rest_engine::environment::Environment;
use rest_engine::executor::TransportError;
use rest_engine::models::{Auth, HttpMethod, KeyValue, RequestBody, RequestTemplate};
use rest_engine::store::{MemoryStore, RequestStore};
use rest_engine::{EntityKind, RequestService, SendError};

use serde_json::json;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn env_with(id: &str, pairs: &[(&str, &str)]) -> Environment {
    let mut env = Environment::new(id, id.to_uppercase());
    for (key, value) in pairs {
        env.set_key(*key, *value);
    }
    env
}

#[tokio::test]
async fn test_path_param_and_header_resolution() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/7"))
        .and(header("x-api-key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "Ada"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let mut template = RequestTemplate::new("user", HttpMethod::GET, "{{base}}/users/{id}");
    template.add_path_param("id", "{{userId}}");
    template.add_header("X-Api-Key", "{{apiKey}}");
    store.insert_request(template);
    store.insert_environment(env_with(
        "dev",
        &[("base", server.uri().as_str()), ("userId", "7"), ("apiKey", "secret-key")],
    ));

    let response = service_for(&store)
        .send_request("user", Some("dev"))
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert!(response.is_json);
    assert_eq!(
        response.json.as_deref(),
        Some("{\n    \"id\": 7,\n    \"name\": \"Ada\"\n}")
    );
    assert!(response.elapsed > Duration::ZERO);
}

#[tokio::test]
async fn test_builtins_reach_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(header("x-trace", "6f9619ff-8b86-d011-b42d-00cf4fc964ff"))
        .and(query_param("ts", "1714566600"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let mut template = RequestTemplate::new(
        "ping",
        HttpMethod::GET,
        format!("{}/ping?ts={{{{unixTimestamp}}}}", server.uri()),
    );
    template.add_header("X-Trace", "{{randomUUID4}}");
    store.insert_request(template);

    let response = service_for(&store).send_request("ping", None).await.unwrap();

    assert_eq!(response.status_code, 204);
    assert!(!response.is_json);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_environment_overrides_builtin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-now", "frozen"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let mut template = RequestTemplate::new("r", HttpMethod::GET, server.uri());
    template.add_header("X-Now", "{{timeNow}}");
    store.insert_request(template);
    store.insert_environment(env_with("dev", &[("timeNow", "frozen")]));

    let response = service_for(&store).send_request("r", Some("dev")).await.unwrap();
    assert_eq!(response.status_code, 200);
}

#[tokio::test]
async fn test_auth_and_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header("authorization", "Bearer tok-1"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"sku": "A-1", "qty": 2})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.insert_request(
        RequestTemplate::new("order", HttpMethod::POST, format!("{}/orders", server.uri()))
            .with_body(RequestBody::raw(
                "application/json",
                r#"{"sku": "{{sku}}", "qty": 2}"#,
            ))
            .with_auth(Auth::Bearer {
                token: "{{token}}".to_string(),
            }),
    );
    store.insert_environment(env_with("dev", &[("sku", "A-1"), ("token", "tok-1")]));

    let response = service_for(&store)
        .send_request("order", Some("dev"))
        .await
        .unwrap();

    assert_eq!(response.status_code, 201);
    assert_eq!(response.status_text, "Created");
    assert!(response.is_success());
}

#[tokio::test]
async fn test_explicit_authorization_header_wins() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Custom abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let mut template = RequestTemplate::new("r", HttpMethod::GET, server.uri()).with_auth(
        Auth::Basic {
            username: "user".to_string(),
            password: "pass".to_string(),
        },
    );
    template.add_header("Authorization", "Custom abc");
    store.insert_request(template);

    let response = service_for(&store).send_request("r", None).await.unwrap();
    assert_eq!(response.status_code, 200);
}

#[tokio::test]
async fn test_url_encoded_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string("name=Ada+L&lang=en"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let mut template = RequestTemplate::new("form", HttpMethod::POST, server.uri()).with_body(
        RequestBody::UrlEncoded {
            fields: vec![
                KeyValue::new("name", "{{name}}"),
                KeyValue::disabled("skip", "me"),
                KeyValue::new("lang", "en"),
            ],
        },
    );
    template.add_header("Content-Type", "application/x-www-form-urlencoded");
    store.insert_request(template);
    store.insert_environment(env_with("dev", &[("name", "Ada L")]));

    let response = service_for(&store)
        .send_request("form", Some("dev"))
        .await
        .unwrap();
    assert_eq!(response.status_code, 200);
}

#[tokio::test]
async fn test_non_success_status_is_a_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.insert_request(RequestTemplate::new("r", HttpMethod::GET, server.uri()));

    let response = service_for(&store).send_request("r", None).await.unwrap();
    assert_eq!(response.status_code, 404);
    assert!(!response.is_success());
    assert!(!response.is_json);
    assert_eq!(response.body, b"missing".to_vec());
}

#[tokio::test]
async fn test_cookies_and_repeated_headers_are_captured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "session=abc123; Path=/; HttpOnly")
                .append_header("set-cookie", "theme=dark; Path=/ui")
                .append_header("x-tag", "a")
                .append_header("x-tag", "b"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.insert_request(RequestTemplate::new("r", HttpMethod::GET, server.uri()));

    let response = service_for(&store).send_request("r", None).await.unwrap();

    assert_eq!(response.headers["x-tag"], "a, b");
    assert_eq!(response.cookies.len(), 2);

    let session = response.cookie("session").expect("session cookie");
    assert_eq!(session.value, "abc123");
    assert_eq!(session.path.as_deref(), Some("/"));
    assert!(session.http_only);
    assert!(!session.secure);

    let theme = response.cookie("theme").expect("theme cookie");
    assert_eq!(theme.value, "dark");
    assert_eq!(theme.path.as_deref(), Some("/ui"));
    assert!(!theme.http_only);
}

#[tokio::test]
async fn test_stored_template_survives_two_sends() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-token", "alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(header("x-token", "beta"))
        .respond_with(ResponseTemplate::new(200).set_body_string("b"))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let mut template = RequestTemplate::new("r", HttpMethod::GET, "{{base}}/items");
    template.add_header("X-Token", "{{token}}");
    store.insert_request(template.clone());
    store.insert_environment(env_with("a", &[("base", server.uri().as_str()), ("token", "alpha")]));
    store.insert_environment(env_with("b", &[("base", server.uri().as_str()), ("token", "beta")]));

    let service = service_for(&store);
    let first = service.send_request("r", Some("a")).await.unwrap();
    let second = service.send_request("r", Some("b")).await.unwrap();

    assert_eq!(first.body, b"a".to_vec());
    assert_eq!(second.body, b"b".to_vec());
    assert_eq!(store.get_request("r"), Some(template));
}

#[tokio::test]
async fn test_not_found_errors() {
    let store = MemoryStore::new();
    store.insert_request(RequestTemplate::new("r", HttpMethod::GET, "http://localhost/"));
    let service = service_for(&store);

    let err = service.send_request("missing", None).await.unwrap_err();
    assert_eq!(err, SendError::not_found(EntityKind::Request, "missing"));

    let err = service.send_request("r", Some("prod")).await.unwrap_err();
    assert_eq!(err, SendError::not_found(EntityKind::Environment, "prod"));
}

#[tokio::test]
async fn test_invalid_url_is_construction_error() {
    let store = MemoryStore::new();
    store.insert_request(RequestTemplate::new("r", HttpMethod::GET, "{{base}}/x"));

    let err = service_for(&store).send_request("r", None).await.unwrap_err();
    match err {
        SendError::Construction(e) => assert_eq!(e.field, RequestField::Url),
        other => panic!("expected construction error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let store = MemoryStore::new();
    store.insert_request(RequestTemplate::new(
        "r",
        HttpMethod::GET,
        format!("http://127.0.0.1:{}/", port),
    ));

    let err = service_for(&store).send_request("r", None).await.unwrap_err();
    assert!(
        matches!(err, SendError::Transport(TransportError::Connect(_))),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    init_test_env();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    store.insert_request(RequestTemplate::new("r", HttpMethod::GET, server.uri()));

    let service = RequestService::new(store.clone(), store.clone(), test_executor(100));
    let err = service.send_request("r", None).await.unwrap_err();
    assert_eq!(err, SendError::Transport(TransportError::Timeout));
}

/// Serves one response whose headers arrive at once but whose body stalls.
fn stalled_body_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request);
            let _ = stream.write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 64\r\n\r\n{\"partial\":",
            );
            let _ = stream.flush();
            std::thread::sleep(Duration::from_secs(2));
        }
    });

    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_timeout_while_reading_body_is_timeout() {
    init_test_env();
    let url = stalled_body_server();

    let store = MemoryStore::new();
    store.insert_request(RequestTemplate::new("r", HttpMethod::GET, url));

    let service = RequestService::new(store.clone(), store.clone(), test_executor(300));
    let err = service.send_request("r", None).await.unwrap_err();
    assert_eq!(err, SendError::Transport(TransportError::Timeout));
}
