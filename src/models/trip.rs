// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Commute trip model for storage and API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Miles per kilometer.
pub const KM_TO_MILES: f64 = 0.621371;

/// Transport mode used for a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TransportMode {
    CarGas,
    Rideshare,
    Bus,
    SubwayMetro,
    TrainCommuter,
    Bike,
    Walk,
}

impl TransportMode {
    /// Every mode, in display order.
    pub const ALL: [TransportMode; 7] = [
        TransportMode::CarGas,
        TransportMode::Rideshare,
        TransportMode::Bus,
        TransportMode::SubwayMetro,
        TransportMode::TrainCommuter,
        TransportMode::Bike,
        TransportMode::Walk,
    ];

    /// Stable identifier used in storage and the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CarGas => "car_gas",
            Self::Rideshare => "rideshare",
            Self::Bus => "bus",
            Self::SubwayMetro => "subway_metro",
            Self::TrainCommuter => "train_commuter",
            Self::Bike => "bike",
            Self::Walk => "walk",
        }
    }

    /// Human-readable label (used in exports).
    pub fn label(&self) -> &'static str {
        match self {
            Self::CarGas => "Car (Gas)",
            Self::Rideshare => "Rideshare",
            Self::Bus => "Bus",
            Self::SubwayMetro => "Subway/Metro",
            Self::TrainCommuter => "Train",
            Self::Bike => "Bike",
            Self::Walk => "Walk",
        }
    }

    /// Everything except driving alone counts as a green trip.
    pub fn is_green(&self) -> bool {
        *self != Self::CarGas
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit a trip distance was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum DistanceUnit {
    #[default]
    #[serde(rename = "mi")]
    Miles,
    #[serde(rename = "km")]
    Kilometers,
}

impl DistanceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Miles => "mi",
            Self::Kilometers => "km",
        }
    }

    /// Convert a distance in this unit to miles.
    pub fn to_miles(&self, distance: f64) -> f64 {
        match self {
            Self::Miles => distance,
            Self::Kilometers => distance * KM_TO_MILES,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emissions and savings computed for one trip (kg CO₂e, 3 decimals).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TripImpact {
    pub emissions: f64,
    pub savings: f64,
}

/// Stored trip record.
///
/// `emissions` and `savings` are fixed when the trip is created and are
/// never recomputed from later settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Trip {
    /// Opaque trip identifier
    pub id: String,
    /// Day the trip was logged for
    pub date: NaiveDate,
    pub mode: TransportMode,
    /// Distance in `unit`
    pub distance: f64,
    pub unit: DistanceUnit,
    /// kg CO₂e emitted
    pub emissions: f64,
    /// kg CO₂e avoided versus driving alone
    pub savings: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Trip {
    /// Build a stored trip from caller input and its computed impact.
    pub fn new(id: String, new_trip: NewTrip, unit: DistanceUnit, impact: TripImpact) -> Self {
        Self {
            id,
            date: new_trip.date,
            mode: new_trip.mode,
            distance: new_trip.distance,
            unit,
            emissions: impact.emissions,
            savings: impact.savings,
            notes: new_trip.notes.filter(|n| !n.trim().is_empty()),
        }
    }

    /// Trip distance converted to miles.
    pub fn distance_miles(&self) -> f64 {
        self.unit.to_miles(self.distance)
    }
}

/// Caller input for a new trip, before impact is computed.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub date: NaiveDate,
    pub mode: TransportMode,
    pub distance: f64,
    /// Falls back to the configured default unit
    pub unit: Option<DistanceUnit>,
    pub notes: Option<String>,
}
