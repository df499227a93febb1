// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use greendex::config::Config;
use greendex::db::{Persisted, Store};
use greendex::routes::create_router;
use greendex::AppState;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app backed by the in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(
        Config::test_default(),
        Store::new_mock(),
        Persisted::default(),
    ));

    (create_router(state.clone()), state)
}

/// Create a test app whose store writes to `dir`.
#[allow(dead_code)]
pub async fn create_test_app_on_disk(dir: &Path) -> (Router, Arc<AppState>) {
    let (store, persisted) = Store::open(dir).await.unwrap();
    let state = Arc::new(AppState::new(Config::test_default(), store, persisted));

    (create_router(state.clone()), state)
}

/// Send a request and decode the JSON response body (`Null` if empty).
#[allow(dead_code)]
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Log a trip through the API and return the response body.
#[allow(dead_code)]
pub async fn log_trip(app: &Router, trip: Value) -> Value {
    let (status, body) = send_json(app, "POST", "/api/trips", Some(trip)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected response: {}", body);
    body
}
