// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod achievements;
pub mod emissions;
pub mod export;
pub mod streak;

pub use achievements::{AchievementEngine, TripTotals};
pub use emissions::EmissionsEngine;
pub use export::{export_summary, prepare_export_rows, to_csv, ExportSummary};
pub use streak::calculate_streak_on;
