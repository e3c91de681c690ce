//! HTTP surface tests: router driven with `oneshot`, analyzers faked

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use consultlog::{
    AnalysisError, AppState, EnrichmentPipeline, ReformattedTranscript, SqliteRecordStore,
    TextAnalyzer, build_router,
};

/// Analyzer that always returns the same outcome
struct Fixed<T>(Option<T>);

#[async_trait]
impl<T: Clone + Send + Sync + 'static> TextAnalyzer for Fixed<T> {
    type Output = T;

    async fn analyze(&self, _text: &str) -> Result<T, AnalysisError> {
        self.0.clone().ok_or_else(|| AnalysisError::Status {
            endpoint: "http://fake".to_string(),
            status: 503,
            body: "down".to_string(),
        })
    }
}

struct Collaborators {
    risk: Option<i32>,
    sentiment: Option<&'static str>,
    reformat: Option<ReformattedTranscript>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            risk: Some(42),
            sentiment: Some("neutral"),
            reformat: Some(ReformattedTranscript {
                updated_text: "How are you?@@Tired.".to_string(),
                start_with_doctor: true,
            }),
        }
    }
}

async fn test_app(collaborators: Collaborators) -> Router {
    let store = SqliteRecordStore::in_memory().await.unwrap();
    app_with_store(store, collaborators)
}

fn app_with_store(store: SqliteRecordStore, collaborators: Collaborators) -> Router {
    let pipeline = EnrichmentPipeline::new(
        Arc::new(Fixed(collaborators.risk)),
        Arc::new(Fixed(collaborators.sentiment.map(String::from))),
        Arc::new(store),
    );
    build_router(AppState::new(
        pipeline,
        Arc::new(Fixed(collaborators.reformat)),
    ))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, record) = send(app, json_request(Method::POST, "/chats", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    record
}

#[tokio::test]
async fn test_create_uses_analysis_results() {
    let app = test_app(Collaborators::default()).await;

    let record = create(&app, json!({"text": "Doctor: hi@@Patient: hello"})).await;

    assert_eq!(record["riskScore"], 42);
    assert_eq!(record["memo"], "Sentiment: neutral");
    assert_eq!(record["startWithDoctor"], false);
    assert_eq!(record["text"], "Doctor: hi@@Patient: hello");
    assert!(record["id"].as_i64().is_some());
    assert!(record["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_falls_back_when_analysis_is_down() {
    let app = test_app(Collaborators {
        risk: None,
        sentiment: None,
        ..Default::default()
    })
    .await;

    let record = create(
        &app,
        json!({"text": "hello", "riskScore": 7, "memo": "note", "startWithDoctor": true}),
    )
    .await;

    assert_eq!(record["riskScore"], 7);
    assert_eq!(record["memo"], "note");
    assert_eq!(record["startWithDoctor"], true);
}

#[tokio::test]
async fn test_machine_score_and_sentiment_merge() {
    let app = test_app(Collaborators {
        risk: Some(88),
        sentiment: Some("negative"),
        ..Default::default()
    })
    .await;

    let record = create(
        &app,
        json!({"text": "hello", "riskScore": 10, "memo": "follow-up needed"}),
    )
    .await;

    assert_eq!(record["riskScore"], 88);
    assert_eq!(record["memo"], "Sentiment: negative | follow-up needed");
}

#[tokio::test]
async fn test_create_requires_text() {
    let app = test_app(Collaborators::default()).await;

    let (status, body) = send(&app, json_request(Method::POST, "/chats", json!({"memo": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "text field is required");

    let (_, listed) = send(&app, empty_request(Method::GET, "/chats")).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let app = test_app(Collaborators::default()).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/chats")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"text\": "))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_get_round_trip_and_not_found() {
    let app = test_app(Collaborators::default()).await;
    let created = create(&app, json!({"text": "a@@b"})).await;
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = send(&app, empty_request(Method::GET, &format!("/chats/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, empty_request(Method::GET, "/chats/9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Chat not found");

    let (status, body) = send(&app, empty_request(Method::GET, "/chats/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_list_newest_first() {
    let app = test_app(Collaborators::default()).await;
    let mut ids = Vec::new();
    for text in ["first", "second", "third"] {
        let record = create(&app, json!({"text": text})).await;
        ids.push(record["id"].as_i64().unwrap());
    }

    let (status, listed) = send(&app, empty_request(Method::GET, "/chats")).await;
    assert_eq!(status, StatusCode::OK);

    let listed_ids: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    ids.reverse();
    assert_eq!(listed_ids, ids);
}

#[tokio::test]
async fn test_partial_update_only_changes_memo() {
    let app = test_app(Collaborators::default()).await;
    let created = create(&app, json!({"text": "a@@b", "startWithDoctor": true})).await;
    let uri = format!("/chats/{}", created["id"]);

    let (status, updated) = send(&app, json_request(Method::PUT, &uri, json!({"memo": "reviewed"}))).await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = created.clone();
    expected["memo"] = json!("reviewed");
    assert_eq!(updated, expected);

    let (_, fetched) = send(&app, empty_request(Method::GET, &uri)).await;
    assert_eq!(fetched, expected);
}

#[tokio::test]
async fn test_update_validation_and_not_found() {
    let app = test_app(Collaborators::default()).await;
    let created = create(&app, json!({"text": "a@@b"})).await;
    let uri = format!("/chats/{}", created["id"]);

    let (status, _) = send(&app, json_request(Method::PUT, &uri, json!({"text": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, json_request(Method::PUT, "/chats/4040", json!({"riskScore": 3}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_get() {
    let app = test_app(Collaborators::default()).await;
    let created = create(&app, json!({"text": "bye"})).await;
    let uri = format!("/chats/{}", created["id"]);

    let (status, body) = send(&app, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Chat deleted successfully");

    let (status, _) = send(&app, empty_request(Method::GET, &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_process_chat_and_alias() {
    let app = test_app(Collaborators::default()).await;
    let request_body = json!({
        "createdAt": "2025-06-01T10:00:00Z",
        "text": "How are you? Tired.",
        "memo": "intake"
    });

    for uri in ["/processChat", "/analyze"] {
        let (status, body) = send(&app, json_request(Method::POST, uri, request_body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "createdAt": "2025-06-01T10:00:00Z",
                "text": "How are you?@@Tired.",
                "memo": "intake",
                "startWithDoctor": true
            })
        );
    }

    // Reformatting never persists anything
    let (_, listed) = send(&app, empty_request(Method::GET, "/chats")).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_process_chat_failure_is_500() {
    let app = test_app(Collaborators {
        reformat: None,
        ..Default::default()
    })
    .await;

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/processChat", json!({"text": "hello there"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("LLM processing error"));
}

#[tokio::test]
async fn test_process_chat_requires_text() {
    let app = test_app(Collaborators::default()).await;

    let (status, _) = send(&app, json_request(Method::POST, "/processChat", json!({"memo": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let app = test_app(Collaborators::default()).await;

    let (status, body) = send(&app, empty_request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = test_app(Collaborators::default()).await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/chats")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_store_outage_is_500() {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = SqliteRecordStore::from_pool(pool.clone()).await.unwrap();
    let app = app_with_store(store, Collaborators::default());
    pool.close().await;

    let (status, body) = send(&app, empty_request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().starts_with("Database connection failed"));

    let (status, body) = send(&app, empty_request(Method::GET, "/chats")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, json_request(Method::POST, "/chats", json!({"text": "hello"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}
