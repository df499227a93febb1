// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CSV export of the trip log.

use chrono::NaiveDate;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Trip;
use crate::services::emissions::round_to;

/// Body returned when there is nothing to export.
pub const EMPTY_EXPORT: &str = "No data to export";

const HEADERS: [&str; 7] = [
    "Date",
    "Transport Mode",
    "Distance",
    "Unit",
    "Emissions (kg CO₂e)",
    "Savings (kg CO₂e)",
    "Notes",
];

/// One exported trip row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub date: NaiveDate,
    /// Display label of the mode
    pub mode: &'static str,
    pub distance: f64,
    pub unit: &'static str,
    pub emissions: f64,
    pub savings: f64,
    pub notes: String,
}

/// Rows for `trips`, oldest first.
pub fn prepare_export_rows(trips: &[Trip]) -> Vec<ExportRow> {
    let mut sorted: Vec<&Trip> = trips.iter().collect();
    sorted.sort_by_key(|t| t.date);

    sorted
        .into_iter()
        .map(|trip| ExportRow {
            date: trip.date,
            mode: trip.mode.label(),
            distance: trip.distance,
            unit: trip.unit.as_str(),
            emissions: round_to(trip.emissions, 3),
            savings: round_to(trip.savings, 3),
            notes: trip.notes.clone().unwrap_or_default(),
        })
        .collect()
}

/// Render rows as CSV with a header line.
///
/// The header is bare. In data rows every text field is quoted and numbers
/// are not, so modes and notes are always quoted.
pub fn to_csv(rows: &[ExportRow]) -> anyhow::Result<String> {
    if rows.is_empty() {
        return Ok(EMPTY_EXPORT.to_string());
    }

    let mut out = HEADERS.join(",").into_bytes();
    out.push(b'\n');

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::NonNumeric)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    for row in rows {
        writer.write_record([
            row.date.to_string(),
            row.mode.to_string(),
            row.distance.to_string(),
            row.unit.to_string(),
            row.emissions.to_string(),
            row.savings.to_string(),
            row.notes.clone(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut csv = String::from_utf8(bytes)?;
    // No trailing newline after the last record
    let len = csv.trim_end_matches('\n').len();
    csv.truncate(len);
    Ok(csv)
}

/// Download filename for an export made on `today`.
pub fn export_filename(today: NaiveDate) -> String {
    format!("carbon-tracker-export-{}.csv", today.format("%Y-%m-%d"))
}

/// Totals shown before exporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExportSummary {
    pub total_trips: u32,
    pub date_range: String,
    pub total_emissions: f64,
    pub total_savings: f64,
    /// Miles, 1 decimal
    pub total_distance: f64,
}

pub fn export_summary(trips: &[Trip]) -> ExportSummary {
    let first = trips.iter().map(|t| t.date).min();
    let last = trips.iter().map(|t| t.date).max();

    let date_range = match (first, last) {
        (Some(first), Some(last)) if first == last => first.to_string(),
        (Some(first), Some(last)) => format!("{} - {}", first, last),
        _ => "No trips".to_string(),
    };

    ExportSummary {
        total_trips: trips.len() as u32,
        date_range,
        total_emissions: round_to(trips.iter().map(|t| t.emissions).sum(), 3),
        total_savings: round_to(trips.iter().map(|t| t.savings).sum(), 3),
        total_distance: round_to(trips.iter().map(|t| t.distance_miles()).sum(), 1),
    }
}
