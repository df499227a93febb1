// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Settings update, validation and reset tests.

use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_default_settings() {
    let (app, _) = common::create_test_app();

    let (status, body) = common::send_json(&app, "GET", "/api/settings", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["factors"]["car_gas"], 0.404);
    assert_eq!(body["factors"]["bus"], 0.18);
    assert_eq!(body["rideshare_occupancy"], 1.5);
    assert_eq!(body["default_unit"], "mi");
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let (app, state) = common::create_test_app();

    let (status, body) = common::send_json(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({ "rideshare_occupancy": 2.0 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rideshare_occupancy"], 2.0);
    assert_eq!(body["factors"]["bus"], 0.18);
    assert_eq!(body["default_unit"], "mi");
    assert_eq!(state.emissions.read().await.settings().rideshare_occupancy, 2.0);
}

#[tokio::test]
async fn test_invalid_update_changes_nothing() {
    let (app, _) = common::create_test_app();

    let factors = json!({
        "car_gas": 0.404, "rideshare": 0.404, "bus": 12.0, "subway_metro": 0.09,
        "train_commuter": 0.14, "bike": -1.0, "walk": 0.0
    });
    let (status, body) = common::send_json(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({ "factors": factors, "rideshare_occupancy": 0.0, "default_unit": "km" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("bus"));
    assert!(details.contains("bike"));
    assert!(details.contains("rideshare_occupancy"));

    let (_, body) = common::send_json(&app, "GET", "/api/settings", None).await;
    assert_eq!(body["factors"]["bus"], 0.18);
    assert_eq!(body["rideshare_occupancy"], 1.5);
    assert_eq!(body["default_unit"], "mi");
}

#[tokio::test]
async fn test_occupancy_bounds() {
    let (app, _) = common::create_test_app();

    let (status, _) = common::send_json(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({ "rideshare_occupancy": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::send_json(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({ "rideshare_occupancy": 10.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_reset_settings() {
    let (app, _) = common::create_test_app();

    common::send_json(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({ "rideshare_occupancy": 3.0, "default_unit": "km" })),
    )
    .await;

    let (status, body) = common::send_json(&app, "POST", "/api/settings/reset", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rideshare_occupancy"], 1.5);
    assert_eq!(body["default_unit"], "mi");
}

#[tokio::test]
async fn test_full_reset_clears_everything() {
    let (app, state) = common::create_test_app();

    common::log_trip(&app, json!({ "mode": "bike", "distance": 5.0 })).await;
    common::log_trip(&app, json!({ "mode": "bus", "distance": 5.0 })).await;
    common::send_json(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({ "rideshare_occupancy": 3.0 })),
    )
    .await;

    let (status, body) = common::send_json(&app, "POST", "/api/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trips_deleted"], 2);

    assert_eq!(state.store.trip_count().await, 0);
    assert!(state.achievements.lock().await.earned().is_empty());
    assert_eq!(state.emissions.read().await.settings().rideshare_occupancy, 1.5);

    // First Steps can be earned again
    let body = common::log_trip(&app, json!({ "mode": "walk", "distance": 1.0 })).await;
    assert_eq!(body["unlocked"][0]["id"], "first_log");
}

#[tokio::test]
async fn test_empty_update_rejected() {
    let (app, _) = common::create_test_app();

    let (status, body) =
        common::send_json(&app, "PUT", "/api/settings", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["details"], "Settings update has no fields");
}
