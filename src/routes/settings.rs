// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Emission settings and data reset routes.

use crate::error::{AppError, Result};
use crate::models::{EmissionSettings, SettingsUpdate};
use crate::services::{AchievementEngine, EmissionsEngine};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/settings", get(get_settings).put(update_settings))
        .route("/api/settings/reset", post(reset_settings))
        .route("/api/reset", post(reset_all))
}

async fn get_settings(State(state): State<Arc<AppState>>) -> Json<EmissionSettings> {
    Json(state.emissions.read().await.settings())
}

/// Apply a partial update. Nothing changes unless every field is valid.
async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<EmissionSettings>> {
    if update.is_empty() {
        return Err(AppError::BadRequest("Settings update has no fields".to_string()));
    }
    EmissionsEngine::check_update(&update).map_err(AppError::Validation)?;

    let mut engine = state.emissions.write().await;
    let mut updated = engine.clone();
    updated.update_settings(update);
    let settings = updated.settings();
    state.store.save_settings(&settings).await?;
    *engine = updated;

    tracing::info!(
        rideshare_occupancy = settings.rideshare_occupancy,
        default_unit = %settings.default_unit,
        "Settings updated"
    );

    Ok(Json(settings))
}

async fn reset_settings(State(state): State<Arc<AppState>>) -> Result<Json<EmissionSettings>> {
    let mut engine = state.emissions.write().await;
    let settings = EmissionSettings::default();
    state.store.save_settings(&settings).await?;
    engine.reset();

    tracing::info!("Settings reset to defaults");
    Ok(Json(settings))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ResetResponse {
    pub success: bool,
    pub trips_deleted: u32,
}

/// Delete all trips and achievements and restore default settings.
///
/// Each document is committed in memory only after it is written, so a
/// failure part way leaves memory matching what is on disk.
async fn reset_all(State(state): State<Arc<AppState>>) -> Result<Json<ResetResponse>> {
    let mut achievements = state.achievements.lock().await;
    let mut engine = state.emissions.write().await;

    let trips_deleted = state.store.clear_trips().await? as u32;

    state.store.save_achievements(&[]).await?;
    *achievements = AchievementEngine::default();

    state
        .store
        .save_settings(&EmissionSettings::default())
        .await?;
    engine.reset();

    tracing::info!(trips_deleted, "All data reset");

    Ok(Json(ResetResponse {
        success: true,
        trips_deleted,
    }))
}
