// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Achievement evaluation and progress tracking.
//!
//! The engine owns the set of earned achievements. Callers re-run
//! [`AchievementEngine::evaluate`] with the full trip history after every
//! change to it and persist [`AchievementEngine::earned`] afterwards.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::achievement::{AchievementId, AchievementRule, EarnedAchievement};
use crate::models::Trip;
use crate::services::streak::calculate_streak_on;
use crate::time_utils::today_local;

/// Quantities the achievement rules are measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripTotals {
    pub trip_count: usize,
    pub streak: u32,
    pub total_savings: f64,
}

impl TripTotals {
    pub fn from_trips(trips: &[Trip], today: NaiveDate) -> Self {
        Self {
            trip_count: trips.len(),
            streak: calculate_streak_on(trips.iter().map(|t| t.date), today),
            total_savings: trips.iter().map(|t| t.savings).sum(),
        }
    }

    /// Raw value of the quantity a rule measures.
    fn measure(&self, rule: AchievementRule) -> f64 {
        match rule {
            AchievementRule::TripCount(_) => self.trip_count as f64,
            AchievementRule::StreakDays(_) => f64::from(self.streak),
            AchievementRule::SavingsKg(_) => self.total_savings,
        }
    }

    fn satisfies(&self, rule: AchievementRule) -> bool {
        match rule {
            AchievementRule::TripCount(n) => self.trip_count >= n as usize,
            AchievementRule::StreakDays(n) => self.streak >= n,
            AchievementRule::SavingsKg(kg) => self.total_savings >= kg,
        }
    }
}

/// Tracks earned achievements and unlocks new ones.
#[derive(Debug, Clone, Default)]
pub struct AchievementEngine {
    earned: Vec<EarnedAchievement>,
}

impl AchievementEngine {
    /// Build from previously persisted records.
    ///
    /// Duplicate ids keep their first record.
    pub fn new(earned: Vec<EarnedAchievement>) -> Self {
        let mut engine = Self::default();
        for record in earned {
            if engine.has_achievement(record.achievement_id) {
                tracing::warn!(
                    achievement = %record.achievement_id,
                    "Dropping duplicate earned achievement record"
                );
                continue;
            }
            engine.earned.push(record);
        }
        engine
    }

    pub fn has_achievement(&self, id: AchievementId) -> bool {
        self.earned.iter().any(|e| e.achievement_id == id)
    }

    /// When `id` was earned, if it has been.
    pub fn earned_at(&self, id: AchievementId) -> Option<DateTime<Utc>> {
        self.earned
            .iter()
            .find(|e| e.achievement_id == id)
            .map(|e| e.earned_at)
    }

    /// Copy of all earned records, in unlock order.
    pub fn earned(&self) -> Vec<EarnedAchievement> {
        self.earned.clone()
    }

    /// Record `id` as earned now.
    ///
    /// Returns `false` without changing anything if it was already earned.
    pub fn unlock(&mut self, id: AchievementId) -> bool {
        self.unlock_at(id, Utc::now())
    }

    /// Record `id` as earned at `now`.
    pub fn unlock_at(&mut self, id: AchievementId, now: DateTime<Utc>) -> bool {
        if self.has_achievement(id) {
            return false;
        }

        self.earned.push(EarnedAchievement {
            achievement_id: id,
            earned_at: now,
            progress: None,
        });
        true
    }

    /// Evaluate every rule against `trips` and return the newly unlocked ids.
    pub fn evaluate(&mut self, trips: &[Trip]) -> Vec<AchievementId> {
        self.evaluate_on(trips, today_local(), Utc::now())
    }

    /// Evaluate with an explicit calendar day and unlock timestamp.
    ///
    /// Rules run in catalog order; achievements earned earlier are never
    /// reported again.
    pub fn evaluate_on(
        &mut self,
        trips: &[Trip],
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Vec<AchievementId> {
        let totals = TripTotals::from_trips(trips, today);

        let mut unlocked = Vec::new();
        for id in AchievementId::ALL {
            if totals.satisfies(id.definition().rule) && self.unlock_at(id, now) {
                unlocked.push(id);
            }
        }

        if !unlocked.is_empty() {
            tracing::info!(
                achievements = ?unlocked,
                trips = totals.trip_count,
                streak = totals.streak,
                total_savings = totals.total_savings,
                "Achievements unlocked"
            );
        }

        unlocked
    }

    /// Progress toward `id`, capped at its target.
    pub fn progress(id: AchievementId, trips: &[Trip]) -> f64 {
        Self::progress_on(id, trips, today_local())
    }

    pub fn progress_on(id: AchievementId, trips: &[Trip], today: NaiveDate) -> f64 {
        Self::progress_from_totals(id, &TripTotals::from_trips(trips, today))
    }

    /// Progress toward `id` as a percentage in `[0, 100]`.
    pub fn progress_percentage(id: AchievementId, trips: &[Trip]) -> f64 {
        Self::progress_percentage_on(id, trips, today_local())
    }

    pub fn progress_percentage_on(id: AchievementId, trips: &[Trip], today: NaiveDate) -> f64 {
        Self::percentage_from_totals(id, &TripTotals::from_trips(trips, today))
    }

    pub fn progress_from_totals(id: AchievementId, totals: &TripTotals) -> f64 {
        let rule = id.definition().rule;
        totals.measure(rule).min(rule.target())
    }

    pub fn percentage_from_totals(id: AchievementId, totals: &TripTotals) -> f64 {
        let target = id.definition().rule.target();
        Self::progress_from_totals(id, totals) / target * 100.0
    }
}
