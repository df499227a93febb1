// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Dashboard statistics derived from the trip log.
//!
//! Everything here is recomputed from the full trip list on request; the
//! per-trip emissions and savings are used as stored.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::trip::{TransportMode, Trip};
use crate::services::emissions::round_to;
use crate::services::streak::calculate_streak_on;

/// Number of days in the daily series.
pub const DAILY_SERIES_DAYS: i64 = 14;
/// Trips on or after `today - WEEK_WINDOW_DAYS` count toward "this week".
pub const WEEK_WINDOW_DAYS: i64 = 7;

/// Emissions and savings totals over a period.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PeriodTotals {
    pub trips: u32,
    pub emissions: f64,
    pub savings: f64,
}

impl PeriodTotals {
    fn sum_of<'a>(trips: impl Iterator<Item = &'a Trip>) -> Self {
        let mut totals = Self::default();
        for trip in trips {
            totals.trips += 1;
            totals.emissions += trip.emissions;
            totals.savings += trip.savings;
        }
        totals.emissions = round_to(totals.emissions, 3);
        totals.savings = round_to(totals.savings, 3);
        totals
    }
}

/// Usage of a single transport mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ModeStats {
    pub mode: TransportMode,
    pub count: u32,
    pub emissions: f64,
    pub savings: f64,
    /// Miles
    pub distance: f64,
    /// Share of all trips (percent)
    pub percentage: f64,
}

/// Trips logged on one day of the week.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeekdayStats {
    pub weekday: String,
    pub count: u32,
    pub emissions: f64,
    pub savings: f64,
}

/// One day of the daily chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub emissions: f64,
    pub savings: f64,
    pub trips: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ImpactSummary {
    pub total_savings: f64,
    /// Miles across all modes
    pub total_distance: f64,
    /// Non-car trips as a percentage of all trips
    pub green_percentage: f64,
    pub total_trips: u32,
}

/// Everything the progress dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardStats {
    pub today: PeriodTotals,
    pub week: PeriodTotals,
    pub lifetime: PeriodTotals,
    pub streak: u32,
    /// Sorted by trip count, most used first
    pub modes: Vec<ModeStats>,
    /// Sorted by trip count, busiest day first
    pub weekly_pattern: Vec<WeekdayStats>,
    /// Last 14 days, oldest first
    pub daily: Vec<DailyPoint>,
    pub impact: ImpactSummary,
}

impl DashboardStats {
    pub fn from_trips(trips: &[Trip], today: NaiveDate) -> Self {
        let week_start = today - Duration::days(WEEK_WINDOW_DAYS);
        let total_trips = trips.len() as u32;

        Self {
            today: PeriodTotals::sum_of(trips.iter().filter(|t| t.date == today)),
            week: PeriodTotals::sum_of(trips.iter().filter(|t| t.date >= week_start)),
            lifetime: PeriodTotals::sum_of(trips.iter()),
            streak: calculate_streak_on(trips.iter().map(|t| t.date), today),
            modes: mode_breakdown(trips),
            weekly_pattern: weekly_pattern(trips),
            daily: daily_series(trips, today),
            impact: impact_summary(trips, total_trips),
        }
    }
}

fn mode_breakdown(trips: &[Trip]) -> Vec<ModeStats> {
    let mut by_mode: BTreeMap<TransportMode, ModeStats> = BTreeMap::new();

    for trip in trips {
        let stats = by_mode.entry(trip.mode).or_insert_with(|| ModeStats {
            mode: trip.mode,
            count: 0,
            emissions: 0.0,
            savings: 0.0,
            distance: 0.0,
            percentage: 0.0,
        });
        stats.count += 1;
        stats.emissions += trip.emissions;
        stats.savings += trip.savings;
        stats.distance += trip.distance_miles();
    }

    let total = trips.len() as f64;
    let mut modes: Vec<ModeStats> = by_mode
        .into_values()
        .map(|mut stats| {
            stats.emissions = round_to(stats.emissions, 3);
            stats.savings = round_to(stats.savings, 3);
            stats.distance = round_to(stats.distance, 1);
            stats.percentage = round_to(f64::from(stats.count) / total * 100.0, 1);
            stats
        })
        .collect();

    // Stable sort keeps mode order among ties
    modes.sort_by(|a, b| b.count.cmp(&a.count));
    modes
}

fn weekly_pattern(trips: &[Trip]) -> Vec<WeekdayStats> {
    let mut by_day: BTreeMap<u32, (Weekday, u32, f64, f64)> = BTreeMap::new();

    for trip in trips {
        let weekday = trip.date.weekday();
        let entry = by_day
            .entry(weekday.num_days_from_monday())
            .or_insert((weekday, 0, 0.0, 0.0));
        entry.1 += 1;
        entry.2 += trip.emissions;
        entry.3 += trip.savings;
    }

    let mut days: Vec<WeekdayStats> = by_day
        .into_values()
        .map(|(weekday, count, emissions, savings)| WeekdayStats {
            weekday: weekday_name(weekday).to_string(),
            count,
            emissions: round_to(emissions, 3),
            savings: round_to(savings, 3),
        })
        .collect();

    days.sort_by(|a, b| b.count.cmp(&a.count));
    days
}

fn daily_series(trips: &[Trip], today: NaiveDate) -> Vec<DailyPoint> {
    (0..DAILY_SERIES_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let totals = PeriodTotals::sum_of(trips.iter().filter(|t| t.date == date));
            DailyPoint {
                date,
                emissions: totals.emissions,
                savings: totals.savings,
                trips: totals.trips,
            }
        })
        .collect()
}

fn impact_summary(trips: &[Trip], total_trips: u32) -> ImpactSummary {
    let green_trips = trips.iter().filter(|t| t.mode.is_green()).count() as f64;
    let green_percentage = if total_trips > 0 {
        round_to(green_trips / f64::from(total_trips) * 100.0, 1)
    } else {
        0.0
    };

    ImpactSummary {
        total_savings: round_to(trips.iter().map(|t| t.savings).sum(), 3),
        total_distance: round_to(trips.iter().map(|t| t.distance_miles()).sum(), 1),
        green_percentage,
        total_trips,
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
