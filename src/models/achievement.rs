// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Achievement catalog and earned-achievement records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Identifier of a catalog achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum AchievementId {
    #[serde(rename = "first_log")]
    FirstLog,
    #[serde(rename = "streak_3")]
    Streak3,
    #[serde(rename = "streak_7")]
    Streak7,
    #[serde(rename = "savings_5kg")]
    Savings5Kg,
    #[serde(rename = "savings_25kg")]
    Savings25Kg,
}

impl AchievementId {
    /// All achievements, in evaluation order.
    pub const ALL: [AchievementId; 5] = [
        AchievementId::FirstLog,
        AchievementId::Streak3,
        AchievementId::Streak7,
        AchievementId::Savings5Kg,
        AchievementId::Savings25Kg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstLog => "first_log",
            Self::Streak3 => "streak_3",
            Self::Streak7 => "streak_7",
            Self::Savings5Kg => "savings_5kg",
            Self::Savings25Kg => "savings_25kg",
        }
    }

    /// Catalog entry for this id.
    pub fn definition(&self) -> &'static AchievementDefinition {
        // CATALOG is declared in ALL order
        &CATALOG[*self as usize]
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum AchievementCategory {
    Milestone,
    Streak,
    Savings,
}

/// Unlock condition of an achievement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AchievementRule {
    /// At least this many trips logged
    TripCount(u32),
    /// Current streak of at least this many days
    StreakDays(u32),
    /// Cumulative savings of at least this many kg CO₂e
    SavingsKg(f64),
}

impl AchievementRule {
    /// Value the measured quantity must reach.
    pub fn target(&self) -> f64 {
        match *self {
            Self::TripCount(n) => f64::from(n),
            Self::StreakDays(n) => f64::from(n),
            Self::SavingsKg(kg) => kg,
        }
    }
}

/// Static description of an achievement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AchievementDefinition {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub requirement: &'static str,
    pub category: AchievementCategory,
    pub rule: AchievementRule,
}

/// The fixed achievement catalog.
pub const CATALOG: [AchievementDefinition; 5] = [
    AchievementDefinition {
        id: AchievementId::FirstLog,
        name: "First Steps",
        description: "Logged your first trip",
        icon: "🎯",
        requirement: "Log 1 trip",
        category: AchievementCategory::Milestone,
        rule: AchievementRule::TripCount(1),
    },
    AchievementDefinition {
        id: AchievementId::Streak3,
        name: "Getting Started",
        description: "3-day logging streak",
        icon: "⚡",
        requirement: "Log trips for 3 consecutive days",
        category: AchievementCategory::Streak,
        rule: AchievementRule::StreakDays(3),
    },
    AchievementDefinition {
        id: AchievementId::Streak7,
        name: "Week Warrior",
        description: "7-day logging streak",
        icon: "🔥",
        requirement: "Log trips for 7 consecutive days",
        category: AchievementCategory::Streak,
        rule: AchievementRule::StreakDays(7),
    },
    AchievementDefinition {
        id: AchievementId::Savings5Kg,
        name: "Eco Saver",
        description: "Saved 5 kg CO₂e vs car",
        icon: "🌱",
        requirement: "Save 5 kg CO₂e compared to driving",
        category: AchievementCategory::Savings,
        rule: AchievementRule::SavingsKg(5.0),
    },
    AchievementDefinition {
        id: AchievementId::Savings25Kg,
        name: "Climate Champion",
        description: "Saved 25 kg CO₂e vs car",
        icon: "🏆",
        requirement: "Save 25 kg CO₂e compared to driving",
        category: AchievementCategory::Savings,
        rule: AchievementRule::SavingsKg(25.0),
    },
];

/// Record of an unlocked achievement. Created once, never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EarnedAchievement {
    pub achievement_id: AchievementId,
    pub earned_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}
