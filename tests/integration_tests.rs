//! Integration tests using a mock HTTP server
//!
//! Tests the full end-to-end flow: config → auth → request pipeline →
//! decoding → pagination, through the public API only.

use clientele::{
    ApiClient, BasicAuth, ClientConfig, Content, Error, RequestOptions, TokenAuth,
};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

// ============================================================================
// Client Flow Tests
// ============================================================================

#[tokio::test]
async fn test_get_json_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [
                {"id": 1, "name": "Alice"},
                {"id": 2, "name": "Bob"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(ClientConfig::new(mock_server.uri())).unwrap();
    let body: serde_json::Value = client.get_json("/api/users").await.unwrap();

    assert_eq!(body["users"].as_array().unwrap().len(), 2);
    assert_eq!(body["users"][0]["name"], "Alice");
}

#[tokio::test]
async fn test_post_json_round_trip() {
    let mock_server = MockServer::start().await;

    let payload = json!({"title": "foo", "body": "bar", "userId": 1});

    Mock::given(method("POST"))
        .and(path("/api/posts"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 101,
            "title": "foo",
            "body": "bar",
            "userId": 1
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(ClientConfig::new(mock_server.uri())).unwrap();
    let outcome = client.post("/api/posts", payload).await.unwrap();

    let response = outcome.into_single().unwrap();
    assert_eq!(response.status(), 201);

    let created = response.json().unwrap();
    assert_eq!(created["id"], 101);
    assert_eq!(created["title"], "foo");
    assert_eq!(created["body"], "bar");
}

#[tokio::test]
async fn test_typed_parse_end_to_end() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u64,
        name: String,
    }

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Alice"},
            {"id": 2, "name": "Bob"}
        ])))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(ClientConfig::new(mock_server.uri())).unwrap();
    let users: Vec<User> = client.get_json("/api/users").await.unwrap();

    assert_eq!(
        users,
        vec![
            User {
                id: 1,
                name: "Alice".to_string()
            },
            User {
                id: 2,
                name: "Bob".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn test_basic_auth_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/secure"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"authenticated": true})))
        .mount(&mock_server)
        .await;

    let client = ApiClient::with_auth(
        ClientConfig::new(mock_server.uri()),
        BasicAuth::new("user", "pass"),
    )
    .unwrap();
    let outcome = client.get("/api/secure").await.unwrap();

    let body = outcome.first().unwrap().json().unwrap();
    assert_eq!(body["authenticated"], true);
}

#[tokio::test]
async fn test_api_key_header_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .and(header("X-Api-Key", "secret123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let auth = TokenAuth::new("secret123")
        .with_header_name("X-Api-Key")
        .with_prefix("");
    let client = ApiClient::with_auth(ClientConfig::new(mock_server.uri()), auth).unwrap();
    let outcome = client.get("/api/data").await.unwrap();

    assert!(outcome.first().unwrap().is_success());
}

#[tokio::test]
async fn test_http_error_details() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/not-found"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Not found"
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(ClientConfig::new(mock_server.uri())).unwrap();
    let err = client.get("/api/not-found").await.unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("Not found"));
        }
        other => panic!("Expected HttpStatus error, got {other:?}"),
    }
}

// ============================================================================
// Content Handling Tests
// ============================================================================

#[tokio::test]
async fn test_no_content_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/items/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(ClientConfig::new(mock_server.uri())).unwrap();
    let outcome = client
        .send(
            reqwest::Method::DELETE,
            "/api/items/1",
            RequestOptions::default(),
        )
        .await
        .unwrap();

    let response = outcome.into_single().unwrap();
    assert!(response.is_success());
    assert_eq!(response.content(), Some(&Content::Empty));
    assert!(response.result_list().is_empty());
}

#[tokio::test]
async fn test_text_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/motd"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain; charset=utf-8")
                .set_body_string("hello, world"),
        )
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(ClientConfig::new(mock_server.uri())).unwrap();
    let outcome = client.get("/api/motd").await.unwrap();

    let response = outcome.into_single().unwrap();
    assert_eq!(
        response.content(),
        Some(&Content::Text("hello, world".to_string()))
    );
    assert_eq!(response.body_text(), "hello, world");
}

// ============================================================================
// Pagination Flow Tests
// ============================================================================

#[tokio::test]
async fn test_paginated_get_end_to_end() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/repos"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    format!("<{}/api/repos?page=2>; rel=\"next\"", mock_server.uri()).as_str(),
                )
                .set_body_json(json!([
                    {"id": 1, "name": "repo1"},
                    {"id": 2, "name": "repo2"}
                ])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/repos"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    format!("<{}/api/repos?page=3>; rel=\"next\"", mock_server.uri()).as_str(),
                )
                .set_body_json(json!([{"id": 3, "name": "repo3"}])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/repos"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(ClientConfig::new(mock_server.uri())).unwrap();
    let outcome = client.get("/api/repos").await.unwrap();

    assert!(outcome.is_paged());
    let set = outcome.into_paged().unwrap();
    assert_eq!(set.page_count(), 3);
    assert!(set.first().unwrap().header("link").is_some());
    assert!(set.last().unwrap().next_link().is_none());

    let names: Vec<&str> = set
        .results()
        .iter()
        .map(|repo| repo["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["repo1", "repo2", "repo3"]);
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test]
async fn test_concurrent_requests_share_client() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/endpoint"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(10)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(ClientConfig::new(mock_server.uri())).unwrap();

    let calls = (0..10).map(|_| client.get("/api/endpoint"));
    let outcomes = futures::future::join_all(calls).await;

    for outcome in outcomes {
        assert!(outcome.unwrap().first().unwrap().is_success());
    }

    let stats = client.stats();
    assert_eq!(stats.total_requests, 10);
    assert_eq!(stats.retried_requests, 0);
    assert!(stats.max_requests_per_second >= 1);
}
