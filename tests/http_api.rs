//! Integration tests for the Gavel REST API
//!
//! Exercises the full router with an in-memory object store and a
//! canned summarization client, so no network or filesystem state
//! is involved.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    routing::{get, post},
    Router,
};
use base64::Engine;
use serde_json::json;
use tower::ServiceExt as TowerServiceExt;
use tower_http::cors::CorsLayer;

use gavel::core::config::Config;
use gavel::core::error::Result;
use gavel::core::llm::{ChatMessage, ChatReply, SummarizationClient};
use gavel::core::services::Services;
use gavel::core::store::{MemoryObjectStore, ObjectStore};
use gavel::core::types::*;
use gavel::http::{self, middleware as http_middleware};

/// Summarization double that answers every completion with a fixed
/// JSON body
struct CannedClient;

#[async_trait]
impl SummarizationClient for CannedClient {
    async fn chat_completion(
        &self,
        _messages: &[ChatMessage],
        _max_tokens: u32,
        _json_response: bool,
    ) -> Result<ChatReply> {
        Ok(ChatReply {
            content: r#"{"columns": [], "response": []}"#.to_string(),
            usage: TokenUsage {
                prompt_tokens: 40,
                completion_tokens: 10,
                total_tokens: 50,
            },
        })
    }

    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }
}

/// Router over in-memory services; the store handle is returned for
/// seeding and inspection
fn create_test_app() -> (Router, Arc<MemoryObjectStore>) {
    let mut config = Config::default();
    config.storage.backend = "memory".to_string();

    let store = Arc::new(MemoryObjectStore::new());
    let services = Arc::new(Services::with_parts(
        config,
        Arc::clone(&store) as Arc<dyn ObjectStore>,
        Arc::new(CannedClient),
    ));

    let app = Router::new()
        .route("/health", get(http::health_handler))
        .route("/api/v1/documents", post(http::submit_document_handler))
        .route("/api/v1/places", get(http::places_handler))
        .route("/api/v1/index/group", post(http::build_group_handler))
        .route("/api/v1/index/place", post(http::build_place_handler))
        .route("/api/v1/cache/*key", get(http::cache_read_handler))
        .route("/api/v1/cache", post(http::cache_write_handler))
        .route("/api/v1/tasks", post(http::schedule_task_handler))
        .route("/api/v1/tasks/:task_id", get(http::task_status_handler))
        .layer(middleware::from_fn(http_middleware::log_request))
        .layer(CorsLayer::permissive())
        .with_state(services);

    (app, store)
}

async fn get_json<T: serde::de::DeserializeOwned>(app: Router, uri: &str) -> (StatusCode, T) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 64_000).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 64_000).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _store) = create_test_app();
    let (status, health): (_, HealthResponse) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[tokio::test]
async fn test_submit_document_persists_and_caches() {
    let (app, store) = create_test_app();

    let content = base64::engine::general_purpose::STANDARD.encode("Agenda item one\n\nApproved");
    let (status, body) = post_json(
        app.clone(),
        "/api/v1/documents",
        json!({"filename": "2024-03-12_1830.txt", "content_base64": content}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let submitted: SubmitDocumentResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(submitted.usage.total_tokens, 50);
    assert!(submitted.key.ends_with("/2024-03-12_1830.txt.txt"));
    assert!(submitted.response.contains("columns"));

    // Extracted text was persisted, normalized
    let persisted = store
        .read_text("minutes-uploads", &submitted.key)
        .await
        .unwrap();
    assert_eq!(persisted, "Agenda item one\nApproved");

    // The reply is cached under the blob key
    let (status, cached): (_, CacheReadResponse) =
        get_json(app, &format!("/api/v1/cache/{}", submitted.key)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cached.value.as_deref(), Some(submitted.response.as_str()));
}

#[tokio::test]
async fn test_submit_document_rejects_bad_base64() {
    let (app, _store) = create_test_app();
    let (status, _) = post_json(
        app,
        "/api/v1/documents",
        json!({"filename": "minutes.txt", "content_base64": "not base64!!!"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_document_rejects_unknown_extension() {
    let (app, _store) = create_test_app();
    let content = base64::engine::general_purpose::STANDARD.encode("x");
    let (status, _) = post_json(
        app,
        "/api/v1/documents",
        json!({"filename": "minutes.docx", "content_base64": content}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cache_write_then_read() {
    let (app, _store) = create_test_app();

    let (status, _) = post_json(
        app.clone(),
        "/api/v1/cache",
        json!({"key": "greeting", "value": "hello", "ttl_seconds": 300}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, read): (_, CacheReadResponse) = get_json(app, "/api/v1/cache/greeting").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read.value.as_deref(), Some("hello"));
}

#[tokio::test]
async fn test_cache_read_absent_key_is_null() {
    let (app, _store) = create_test_app();
    let (status, read): (_, CacheReadResponse) = get_json(app, "/api/v1/cache/absent").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read.value, None);
}

#[tokio::test]
async fn test_cache_write_empty_key_rejected() {
    let (app, _store) = create_test_app();
    let (status, _) = post_json(app, "/api/v1/cache", json!({"key": "", "value": "v"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_places_reports_failure_in_band() {
    let (app, store) = create_test_app();

    // No metadata seeded: success=false, no places key
    let (status, places): (_, PlacesResponse) = get_json(app.clone(), "/api/v1/places").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!places.success);
    assert_eq!(places.places, None);

    store.put_bytes(
        "minutes-meta",
        "places.json",
        br#"{"places": ["springfield"]}"#.to_vec(),
    );
    let (_, places): (_, PlacesResponse) = get_json(app, "/api/v1/places").await;
    assert!(places.success);
    assert_eq!(places.places, Some(vec!["springfield".to_string()]));
}

#[tokio::test]
async fn test_build_group_endpoint() {
    let (app, store) = create_test_app();
    store.put_bytes(
        "minutes",
        "springfield/zoning/2024-03-12_1830.txt",
        b"Rezoning request approved".to_vec(),
    );

    let (status, body) = post_json(
        app,
        "/api/v1/index/group",
        json!({"place": "springfield", "department": "zoning", "date": "2024-03-12"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let built: BuildGroupResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(built.group_id, "springfield-zoning-2024-03-12");
    assert!(built.token_count > 0);
    assert!(built.status.is_terminal());
    assert!(!built.status.is_failed());

    let artifact = format!("springfield/zoning/2024-03-12_{}.txt", built.token_count);
    assert!(store.read_text("minutes-index", &artifact).await.is_ok());
}

#[tokio::test]
async fn test_build_place_unknown_place_is_not_found() {
    let (app, _store) = create_test_app();
    let (status, _) = post_json(app, "/api/v1/index/place", json!({"place_name": "nowhere"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_lifecycle() {
    let (app, store) = create_test_app();

    let (status, body) = post_json(
        app.clone(),
        "/api/v1/tasks",
        json!({"filename": "notes.txt", "content": "remember the agenda"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let scheduled: ScheduleTaskResponse = serde_json::from_slice(&body).unwrap();

    // Poll until the background write finishes
    let mut task_status = String::new();
    for _ in 0..50 {
        let (_, polled): (_, TaskStatusResponse) = get_json(
            app.clone(),
            &format!("/api/v1/tasks/{}", scheduled.task_id),
        )
        .await;
        task_status = polled.status;
        if task_status != "pending" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(task_status, "Wrote minutes-uploads/notes.txt");
    assert_eq!(
        store.read_text("minutes-uploads", "notes.txt").await.unwrap(),
        "remember the agenda"
    );
}

#[tokio::test]
async fn test_task_unknown_id_sentinel() {
    let (app, _store) = create_test_app();
    let (status, polled): (_, TaskStatusResponse) =
        get_json(app, "/api/v1/tasks/no-such-task").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(polled.status, "Task not found");
}
