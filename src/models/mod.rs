// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod achievement;
pub mod settings;
pub mod stats;
pub mod trip;

pub use achievement::{
    AchievementCategory, AchievementDefinition, AchievementId, AchievementRule, EarnedAchievement,
    CATALOG,
};
pub use settings::{EmissionFactors, EmissionSettings, SettingsUpdate};
pub use stats::DashboardStats;
pub use trip::{DistanceUnit, NewTrip, TransportMode, Trip, TripImpact};
