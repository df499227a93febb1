// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed store for trips, settings and earned achievements.
//!
//! Each document is a single JSON file in the data directory. Documents are
//! always written whole: the new contents go to a temporary file that is then
//! renamed over the old one, so a crash never leaves a half-written file.
//!
//! The trip log is also kept in memory; all reads are served from there.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::db::collections;
use crate::error::AppError;
use crate::models::{
    DistanceUnit, EarnedAchievement, EmissionSettings, NewTrip, SettingsUpdate, Trip, TripImpact,
};
use crate::services::EmissionsEngine;

/// Documents that could not be read and were replaced by defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub recovered: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.recovered.is_empty()
    }

    fn recover(&mut self, document: &str, reason: impl std::fmt::Display) {
        tracing::warn!(
            document,
            reason = %reason,
            "Persisted document unreadable, falling back to defaults"
        );
        self.recovered.push(format!("{}: {}", document, reason));
    }
}

/// Settings and achievements read at startup; trips stay inside the store.
#[derive(Debug, Clone, Default)]
pub struct Persisted {
    pub settings: EmissionSettings,
    pub achievements: Vec<EarnedAchievement>,
    pub report: LoadReport,
}

/// Trip, settings and achievement storage.
///
/// Every mutation writes the new document first and only then replaces the
/// in-memory copy, so a failed write leaves the store unchanged.
pub struct Store {
    /// `None` for the in-memory mock
    dir: Option<PathBuf>,
    trips: RwLock<Vec<Trip>>,
}

impl Store {
    /// Open (creating if needed) the data directory and load every document.
    ///
    /// Unreadable documents are replaced by their defaults and listed in the
    /// returned report; only I/O failures are errors.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<(Self, Persisted), AppError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::Storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let mut report = LoadReport::default();

        let trips: Vec<Trip> = read_document(&dir, collections::TRIPS, &mut report)
            .await?
            .unwrap_or_default();
        let settings = load_settings(&dir, &mut report).await?;
        let achievements: Vec<EarnedAchievement> =
            read_document(&dir, collections::ACHIEVEMENTS, &mut report)
                .await?
                .unwrap_or_default();

        tracing::info!(
            dir = %dir.display(),
            trips = trips.len(),
            achievements = achievements.len(),
            recovered = report.recovered.len(),
            "Store opened"
        );

        let store = Self {
            dir: Some(dir),
            trips: RwLock::new(trips),
        };

        Ok((
            store,
            Persisted {
                settings,
                achievements,
                report,
            },
        ))
    }

    /// In-memory store for tests. Nothing is ever written to disk.
    pub fn new_mock() -> Self {
        Self {
            dir: None,
            trips: RwLock::new(Vec::new()),
        }
    }

    // ─── Trip Operations ─────────────────────────────────────────

    /// Snapshot of all trips, most recent entry first.
    pub async fn list_trips(&self) -> Vec<Trip> {
        self.trips.read().await.clone()
    }

    pub async fn trip_count(&self) -> usize {
        self.trips.read().await.len()
    }

    /// Store a new trip with a fresh id and return it.
    pub async fn add_trip(
        &self,
        new_trip: NewTrip,
        unit: DistanceUnit,
        impact: TripImpact,
    ) -> Result<Trip, AppError> {
        let trip = Trip::new(uuid::Uuid::new_v4().to_string(), new_trip, unit, impact);

        let mut trips = self.trips.write().await;
        let mut updated = Vec::with_capacity(trips.len() + 1);
        updated.push(trip.clone());
        updated.extend(trips.iter().cloned());

        self.write_document(collections::TRIPS, &updated).await?;
        *trips = updated;

        Ok(trip)
    }

    /// Remove a trip. Returns whether one was found.
    pub async fn delete_trip(&self, id: &str) -> Result<bool, AppError> {
        let mut trips = self.trips.write().await;
        if !trips.iter().any(|t| t.id == id) {
            return Ok(false);
        }

        let updated: Vec<Trip> = trips.iter().filter(|t| t.id != id).cloned().collect();
        self.write_document(collections::TRIPS, &updated).await?;
        *trips = updated;

        Ok(true)
    }

    // ─── Settings / Achievements ─────────────────────────────────

    pub async fn save_settings(&self, settings: &EmissionSettings) -> Result<(), AppError> {
        self.write_document(collections::SETTINGS, settings).await
    }

    pub async fn save_achievements(&self, earned: &[EarnedAchievement]) -> Result<(), AppError> {
        self.write_document(collections::ACHIEVEMENTS, earned).await
    }

    /// Drop every trip. Returns how many were removed.
    pub async fn clear_trips(&self) -> Result<usize, AppError> {
        let mut trips = self.trips.write().await;
        self.write_document(collections::TRIPS, &Vec::<Trip>::new()).await?;

        let removed = trips.len();
        trips.clear();
        Ok(removed)
    }

    async fn write_document<T: Serialize + ?Sized>(
        &self,
        name: &str,
        value: &T,
    ) -> Result<(), AppError> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };

        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| AppError::Storage(format!("Failed to encode {}: {}", name, e)))?;

        let path = dir.join(name);
        let tmp = dir.join(format!(".{}.tmp", name));
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::Storage(format!(
                "Failed to replace {}: {}",
                path.display(),
                e
            )));
        }

        tracing::debug!(document = name, bytes = json.len(), "Document saved");
        Ok(())
    }
}

/// Read and decode one document. `Ok(None)` if it is missing or unreadable.
async fn read_document<T: DeserializeOwned>(
    dir: &Path,
    name: &str,
    report: &mut LoadReport,
) -> Result<Option<T>, AppError> {
    let path = dir.join(name);
    let contents = match tokio::fs::read_to_string(&path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            report.recover(name, e);
            return Ok(None);
        }
        Err(e) => {
            return Err(AppError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            report.recover(name, e);
            Ok(None)
        }
    }
}

/// Persisted settings merged over the defaults.
///
/// Values that fail validation discard the whole document.
async fn load_settings(dir: &Path, report: &mut LoadReport) -> Result<EmissionSettings, AppError> {
    let Some(update) =
        read_document::<SettingsUpdate>(dir, collections::SETTINGS, report).await?
    else {
        return Ok(EmissionSettings::default());
    };

    if let Err(problems) = EmissionsEngine::check_update(&update) {
        report.recover(collections::SETTINGS, problems.join("; "));
        return Ok(EmissionSettings::default());
    }

    let mut engine = EmissionsEngine::default();
    engine.update_settings(update);
    Ok(engine.settings())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AchievementId, TransportMode};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn new_trip(day: u32, mode: TransportMode) -> NewTrip {
        NewTrip {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            mode,
            distance: 10.0,
            unit: None,
            notes: None,
        }
    }

    fn impact() -> TripImpact {
        TripImpact {
            emissions: 1.8,
            savings: 2.24,
        }
    }

    #[tokio::test]
    async fn test_open_empty_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let (store, persisted) = Store::open(dir.path()).await.unwrap();

        assert!(store.list_trips().await.is_empty());
        assert_eq!(persisted.settings, EmissionSettings::default());
        assert!(persisted.achievements.is_empty());
        assert!(persisted.report.is_clean());
    }

    #[tokio::test]
    async fn test_trips_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let (store, _) = Store::open(dir.path()).await.unwrap();
            store
                .add_trip(new_trip(1, TransportMode::Bus), DistanceUnit::Miles, impact())
                .await
                .unwrap();
            store
                .add_trip(new_trip(2, TransportMode::Bike), DistanceUnit::Miles, impact())
                .await
                .unwrap();
        }

        let (store, persisted) = Store::open(dir.path()).await.unwrap();
        let trips = store.list_trips().await;

        assert!(persisted.report.is_clean());
        assert_eq!(trips.len(), 2);
        // Most recent entry first
        assert_eq!(trips[0].mode, TransportMode::Bike);
        assert_eq!(trips[1].mode, TransportMode::Bus);
        assert_ne!(trips[0].id, trips[1].id);
    }

    #[tokio::test]
    async fn test_delete_trip() {
        let store = Store::new_mock();
        let trip = store
            .add_trip(new_trip(1, TransportMode::Walk), DistanceUnit::Miles, impact())
            .await
            .unwrap();

        assert!(!store.delete_trip("missing").await.unwrap());
        assert!(store.delete_trip(&trip.id).await.unwrap());
        assert_eq!(store.trip_count().await, 0);
    }

    #[tokio::test]
    async fn test_malformed_trips_recovered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(collections::TRIPS), "{not json").unwrap();

        let (store, persisted) = Store::open(dir.path()).await.unwrap();

        assert!(store.list_trips().await.is_empty());
        assert_eq!(persisted.report.recovered.len(), 1);
        assert!(persisted.report.recovered[0].starts_with("trips.json"));
    }

    #[tokio::test]
    async fn test_partial_settings_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(collections::SETTINGS),
            r#"{"rideshare_occupancy": 2.0}"#,
        )
        .unwrap();

        let (_, persisted) = Store::open(dir.path()).await.unwrap();

        assert!(persisted.report.is_clean());
        assert_eq!(persisted.settings.rideshare_occupancy, 2.0);
        assert_eq!(persisted.settings.factors.bus, 0.18);
        assert_eq!(persisted.settings.default_unit, DistanceUnit::Miles);
    }

    #[tokio::test]
    async fn test_invalid_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(collections::SETTINGS),
            r#"{"rideshare_occupancy": 0, "default_unit": "km"}"#,
        )
        .unwrap();

        let (_, persisted) = Store::open(dir.path()).await.unwrap();

        assert_eq!(persisted.settings, EmissionSettings::default());
        assert_eq!(persisted.report.recovered.len(), 1);
    }

    #[tokio::test]
    async fn test_settings_and_achievements_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = EmissionSettings::default();
        settings.default_unit = DistanceUnit::Kilometers;
        let earned = vec![EarnedAchievement {
            achievement_id: AchievementId::FirstLog,
            earned_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            progress: None,
        }];

        {
            let (store, _) = Store::open(dir.path()).await.unwrap();
            store.save_settings(&settings).await.unwrap();
            store.save_achievements(&earned).await.unwrap();
        }

        let (_, persisted) = Store::open(dir.path()).await.unwrap();
        assert_eq!(persisted.settings, settings);
        assert_eq!(persisted.achievements, earned);
    }

    #[tokio::test]
    async fn test_clear_trips() {
        let dir = tempfile::tempdir().unwrap();
        {
            let (store, _) = Store::open(dir.path()).await.unwrap();
            for day in [1, 2] {
                store
                    .add_trip(new_trip(day, TransportMode::Bus), DistanceUnit::Miles, impact())
                    .await
                    .unwrap();
            }
            assert_eq!(store.clear_trips().await.unwrap(), 2);
            assert_eq!(store.trip_count().await, 0);
        }

        let (store, _) = Store::open(dir.path()).await.unwrap();
        assert!(store.list_trips().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_add_leaves_trips_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _) = Store::open(dir.path()).await.unwrap();
        std::fs::remove_dir_all(dir.path()).unwrap();

        let result = store
            .add_trip(new_trip(1, TransportMode::Bus), DistanceUnit::Miles, impact())
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(store.trip_count().await, 0);
    }

    #[tokio::test]
    async fn test_failed_delete_and_clear_keep_trips() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _) = Store::open(dir.path()).await.unwrap();
        let trip = store
            .add_trip(new_trip(1, TransportMode::Bus), DistanceUnit::Miles, impact())
            .await
            .unwrap();
        std::fs::remove_dir_all(dir.path()).unwrap();

        assert!(store.delete_trip(&trip.id).await.is_err());
        assert!(store.clear_trips().await.is_err());

        let trips = store.list_trips().await;
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].id, trip.id);
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _) = Store::open(dir.path()).await.unwrap();
        // A directory in the way makes the rename fail
        std::fs::create_dir(dir.path().join(collections::ACHIEVEMENTS)).unwrap();

        assert!(store.save_achievements(&[]).await.is_err());
        assert!(!dir
            .path()
            .join(format!(".{}.tmp", collections::ACHIEVEMENTS))
            .exists());
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _) = Store::open(dir.path()).await.unwrap();
        store
            .add_trip(new_trip(1, TransportMode::Bus), DistanceUnit::Miles, impact())
            .await
            .unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![collections::TRIPS.to_string()]);
    }
}
