// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for trips, estimates, achievements, stats and export.

use crate::error::{AppError, Result};
use crate::models::{
    AchievementCategory, AchievementDefinition, AchievementId, DashboardStats, DistanceUnit,
    NewTrip, TransportMode, Trip,
};
use crate::services::emissions::MAX_DISTANCE;
use crate::services::export::{export_filename, EMPTY_EXPORT};
use crate::services::{
    export_summary, prepare_export_rows, to_csv, AchievementEngine, EmissionsEngine,
    ExportSummary, TripTotals,
};
use crate::time_utils::{format_utc_rfc3339, today_local};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/trips", get(list_trips).post(create_trip))
        .route("/api/trips/{id}", delete(delete_trip))
        .route("/api/estimate", post(estimate))
        .route("/api/achievements", get(list_achievements))
        .route("/api/stats", get(get_stats))
        .route("/api/export", get(export_csv))
        .route("/api/export/summary", get(get_export_summary))
}

fn distance_problem() -> AppError {
    AppError::Validation(vec![format!(
        "distance: must be greater than 0 and at most {}",
        MAX_DISTANCE
    )])
}

// ─── Trips ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TripsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TripsResponse {
    pub trips: Vec<Trip>,
    pub total: u32,
    pub page: u32,
    pub per_page: u32,
}

/// List trips, most recent entry first.
async fn list_trips(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TripsQuery>,
) -> Result<Json<TripsResponse>> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);

    let trips = state.store.list_trips().await;
    let total = trips.len() as u32;
    let offset = (page - 1).saturating_mul(per_page) as usize;

    let trips: Vec<Trip> = trips
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .collect();

    tracing::debug!(page, per_page, total, returned = trips.len(), "Listed trips");

    Ok(Json(TripsResponse {
        trips,
        total,
        page,
        per_page,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripRequest {
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub mode: TransportMode,
    pub distance: f64,
    pub unit: Option<DistanceUnit>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Catalog entry as sent to the client.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AchievementInfo {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub requirement: String,
    pub category: AchievementCategory,
}

impl From<&AchievementDefinition> for AchievementInfo {
    fn from(def: &AchievementDefinition) -> Self {
        Self {
            id: def.id,
            name: def.name.to_string(),
            description: def.description.to_string(),
            icon: def.icon.to_string(),
            requirement: def.requirement.to_string(),
            category: def.category,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreateTripResponse {
    pub trip: Trip,
    /// Achievements unlocked by this trip
    pub unlocked: Vec<AchievementInfo>,
}

/// Log a trip, then check for newly earned achievements.
async fn create_trip(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<CreateTripResponse>)> {
    req.validate()?;
    if !EmissionsEngine::validate_distance(req.distance) {
        return Err(distance_problem());
    }

    // Impact is fixed at logging time with the settings in effect now
    let (unit, impact) = {
        let engine = state.emissions.read().await;
        let unit = req.unit.unwrap_or(engine.settings().default_unit);
        (unit, engine.calculate_trip(req.mode, req.distance, unit))
    };

    let new_trip = NewTrip {
        date: req.date.unwrap_or_else(today_local),
        mode: req.mode,
        distance: req.distance,
        unit: req.unit,
        notes: req.notes,
    };

    let mut achievements = state.achievements.lock().await;

    let trip = state.store.add_trip(new_trip, unit, impact).await?;
    tracing::info!(
        trip_id = %trip.id,
        mode = %trip.mode,
        distance = trip.distance,
        unit = %trip.unit,
        emissions = trip.emissions,
        savings = trip.savings,
        "Trip logged"
    );

    let trips = state.store.list_trips().await;
    let unlocked = evaluate_and_save(&state, &mut achievements, &trips).await;
    drop(achievements);

    Ok((
        StatusCode::CREATED,
        Json(CreateTripResponse {
            trip,
            unlocked: unlocked
                .iter()
                .map(|id| AchievementInfo::from(id.definition()))
                .collect(),
        }),
    ))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteTripResponse {
    pub success: bool,
    pub message: String,
}

/// Delete a trip. Earned achievements are kept.
async fn delete_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteTripResponse>> {
    let mut achievements = state.achievements.lock().await;

    if !state.store.delete_trip(&id).await? {
        return Err(AppError::NotFound(format!("Trip {} not found", id)));
    }
    tracing::info!(trip_id = %id, "Trip deleted");

    let trips = state.store.list_trips().await;
    evaluate_and_save(&state, &mut achievements, &trips).await;

    Ok(Json(DeleteTripResponse {
        success: true,
        message: format!("Trip {} deleted", id),
    }))
}

/// Evaluate achievements against `trips` and persist any unlocks.
///
/// The engine is only updated once the earned set is saved. If saving fails
/// the trip change still stands and nothing is reported as unlocked; the
/// next evaluation unlocks the same ids again.
async fn evaluate_and_save(
    state: &AppState,
    achievements: &mut AchievementEngine,
    trips: &[Trip],
) -> Vec<AchievementId> {
    let mut updated = achievements.clone();
    let unlocked = updated.evaluate(trips);
    if unlocked.is_empty() {
        return unlocked;
    }

    match state.store.save_achievements(&updated.earned()).await {
        Ok(()) => {
            *achievements = updated;
            unlocked
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                achievements = ?unlocked,
                "Failed to save earned achievements"
            );
            Vec::new()
        }
    }
}

// ─── Estimate ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub mode: TransportMode,
    pub distance: f64,
    pub unit: Option<DistanceUnit>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EstimateResponse {
    pub mode: TransportMode,
    pub distance: f64,
    pub unit: DistanceUnit,
    pub emissions: f64,
    pub savings: f64,
    /// kg CO₂e per mile actually applied
    pub effective_factor: f64,
}

/// Preview a trip's impact without storing it.
async fn estimate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>> {
    if !EmissionsEngine::validate_distance(req.distance) {
        return Err(distance_problem());
    }

    let engine = state.emissions.read().await;
    let unit = req.unit.unwrap_or(engine.settings().default_unit);
    let impact = engine.calculate_trip(req.mode, req.distance, unit);

    Ok(Json(EstimateResponse {
        mode: req.mode,
        distance: req.distance,
        unit,
        emissions: impact.emissions,
        savings: impact.savings,
        effective_factor: engine.effective_factor(req.mode),
    }))
}

// ─── Achievements ────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AchievementStatus {
    #[serde(flatten)]
    pub info: AchievementInfo,
    pub earned: bool,
    pub earned_at: Option<String>,
    pub progress: f64,
    pub target: f64,
    pub percentage: f64,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AchievementsResponse {
    pub achievements: Vec<AchievementStatus>,
    pub earned_count: u32,
    pub total: u32,
}

/// Full catalog with earned state and progress.
async fn list_achievements(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AchievementsResponse>> {
    let trips = state.store.list_trips().await;
    let totals = TripTotals::from_trips(&trips, today_local());
    let engine = state.achievements.lock().await;

    let achievements: Vec<AchievementStatus> = AchievementId::ALL
        .into_iter()
        .map(|id| {
            let earned_at = engine.earned_at(id);
            AchievementStatus {
                info: AchievementInfo::from(id.definition()),
                earned: earned_at.is_some(),
                earned_at: earned_at.map(format_utc_rfc3339),
                progress: AchievementEngine::progress_from_totals(id, &totals),
                target: id.definition().rule.target(),
                percentage: AchievementEngine::percentage_from_totals(id, &totals),
            }
        })
        .collect();

    let earned_count = achievements.iter().filter(|a| a.earned).count() as u32;

    Ok(Json(AchievementsResponse {
        total: achievements.len() as u32,
        achievements,
        earned_count,
    }))
}

// ─── Stats ───────────────────────────────────────────────────

/// Dashboard metrics for the whole trip log.
async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<DashboardStats>> {
    let trips = state.store.list_trips().await;
    Ok(Json(DashboardStats::from_trips(&trips, today_local())))
}

// ─── Export ──────────────────────────────────────────────────

/// Download the trip log as CSV.
async fn export_csv(State(state): State<Arc<AppState>>) -> Result<Response> {
    let trips = state.store.list_trips().await;

    if trips.is_empty() {
        return Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            EMPTY_EXPORT,
        )
            .into_response());
    }

    let csv = to_csv(&prepare_export_rows(&trips))?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(today_local())
    );

    tracing::info!(trips = trips.len(), bytes = csv.len(), "Exported trips");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

async fn get_export_summary(State(state): State<Arc<AppState>>) -> Result<Json<ExportSummary>> {
    let trips = state.store.list_trips().await;
    Ok(Json(export_summary(&trips)))
}
