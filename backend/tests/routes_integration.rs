#![cfg(feature = "http-server")]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use subway_backend::db::repositories::LocalRepository;
use subway_backend::db::repository::FullRepository;
use subway_backend::http::{create_router, AppState};

fn app() -> Router {
    let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
    create_router(AppState::new(repo))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_line(app: &Router, name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/v1/lines",
        Some(json!({ "name": name, "color": "green" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn add_section(app: &Router, line_id: i64, source: &str, target: &str, distance: i64) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        &format!("/v1/lines/{}/sections", line_id),
        Some(json!({ "source": source, "target": target, "distance": distance })),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_section_flow() {
    let app = app();
    let line_id = create_line(&app, "Line2").await;

    let (status, body) = add_section(&app, line_id, "A", "B", 10).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["stations"], json!(["A", "B"]));

    let (status, body) = add_section(&app, line_id, "A", "D", 4).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["stations"], json!(["A", "D", "B"]));
    assert_eq!(body["total_distance"], 10);

    let (status, body) = send(&app, Method::GET, &format!("/v1/lines/{}", line_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Line2");
    assert_eq!(body["stations"], json!(["A", "D", "B"]));

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/v1/lines/{}/stations/D", line_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stations"], json!(["A", "B"]));

    let (status, body) = send(&app, Method::GET, "/v1/stations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stations"], json!(["A", "B", "D"]));
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn test_chain_errors_map_to_statuses() {
    let app = app();
    let line_id = create_line(&app, "Line4").await;
    add_section(&app, line_id, "A", "B", 10).await;

    let (status, body) = add_section(&app, line_id, "A", "D", 10).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DISTANCE_TOO_LONG");

    let (status, body) = add_section(&app, line_id, "B", "A", 3).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_SEGMENT");

    let (status, body) = add_section(&app, line_id, "X", "Y", 3).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DISCONNECTED_SEGMENT");

    let (status, body) = add_section(&app, line_id, "A", "C", 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_SEGMENT");

    let (status, body) = add_section(&app, line_id, "A", "C", -5).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/v1/lines/{}/stations/Q", line_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "STATION_NOT_FOUND");
}

#[tokio::test]
async fn test_line_validation_and_conflict() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/lines",
        Some(json!({ "name": "AB", "color": "red" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_LINE");

    create_line(&app, "Green").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/lines",
        Some(json!({ "name": "Green", "color": "blue" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_list_and_delete_lines() {
    let app = app();
    let first = create_line(&app, "Red").await;
    let second = create_line(&app, "Blue").await;
    add_section(&app, second, "X", "Y", 2).await;

    let (status, body) = send(&app, Method::GET, "/v1/lines", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["lines"][1]["stations"], json!(["X", "Y"]));

    let (status, _) = send(&app, Method::DELETE, &format!("/v1/lines/{}", first), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/v1/lines/{}", first), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send(&app, Method::DELETE, &format!("/v1/lines/{}", first), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
