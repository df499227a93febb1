// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Emission factor settings.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::trip::{DistanceUnit, TransportMode};

/// Per-mode emission factors (kg CO₂e per mile).
///
/// `rideshare` is the per-vehicle factor; it is divided by the configured
/// occupancy whenever it is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EmissionFactors {
    pub car_gas: f64,
    pub rideshare: f64,
    pub bus: f64,
    pub subway_metro: f64,
    pub train_commuter: f64,
    pub bike: f64,
    pub walk: f64,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            car_gas: 0.404,
            rideshare: 0.404,
            bus: 0.18,
            subway_metro: 0.09,
            train_commuter: 0.14,
            bike: 0.0,
            walk: 0.0,
        }
    }
}

impl EmissionFactors {
    /// Stored factor for a mode (before any occupancy sharing).
    pub fn get(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::CarGas => self.car_gas,
            TransportMode::Rideshare => self.rideshare,
            TransportMode::Bus => self.bus,
            TransportMode::SubwayMetro => self.subway_metro,
            TransportMode::TrainCommuter => self.train_commuter,
            TransportMode::Bike => self.bike,
            TransportMode::Walk => self.walk,
        }
    }

    /// Iterate `(mode, factor)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (TransportMode, f64)> + '_ {
        TransportMode::ALL.into_iter().map(|mode| (mode, self.get(mode)))
    }
}

/// Default rideshare occupancy (passengers per trip).
pub const DEFAULT_RIDESHARE_OCCUPANCY: f64 = 1.5;

/// Complete emission settings in effect for new trips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EmissionSettings {
    pub factors: EmissionFactors,
    /// Average passengers sharing a rideshare vehicle
    pub rideshare_occupancy: f64,
    /// Unit assumed when a trip doesn't specify one
    pub default_unit: DistanceUnit,
}

impl Default for EmissionSettings {
    fn default() -> Self {
        Self {
            factors: EmissionFactors::default(),
            rideshare_occupancy: DEFAULT_RIDESHARE_OCCUPANCY,
            default_unit: DistanceUnit::Miles,
        }
    }
}

/// Partial settings update. Present fields replace the current value whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub factors: Option<EmissionFactors>,
    #[serde(default)]
    pub rideshare_occupancy: Option<f64>,
    #[serde(default)]
    pub default_unit: Option<DistanceUnit>,
}

impl SettingsUpdate {
    /// True if no field is present.
    pub fn is_empty(&self) -> bool {
        self.factors.is_none() && self.rideshare_occupancy.is_none() && self.default_unit.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_factors() {
        let factors = EmissionFactors::default();
        assert_eq!(factors.get(TransportMode::CarGas), 0.404);
        assert_eq!(factors.get(TransportMode::Rideshare), 0.404);
        assert_eq!(factors.get(TransportMode::Bus), 0.18);
        assert_eq!(factors.get(TransportMode::SubwayMetro), 0.09);
        assert_eq!(factors.get(TransportMode::TrainCommuter), 0.14);
        assert_eq!(factors.get(TransportMode::Bike), 0.0);
        assert_eq!(factors.get(TransportMode::Walk), 0.0);
    }

    #[test]
    fn test_default_settings() {
        let settings = EmissionSettings::default();
        assert_eq!(settings.rideshare_occupancy, 1.5);
        assert_eq!(settings.default_unit, DistanceUnit::Miles);
    }

    #[test]
    fn test_iter_covers_every_mode() {
        let factors = EmissionFactors::default();
        let modes: Vec<TransportMode> = factors.iter().map(|(mode, _)| mode).collect();
        assert_eq!(modes, TransportMode::ALL.to_vec());
    }

    #[test]
    fn test_partial_update_from_json() {
        let update: SettingsUpdate =
            serde_json::from_str(r#"{ "rideshare_occupancy": 2.0 }"#).unwrap();

        assert_eq!(update.rideshare_occupancy, Some(2.0));
        assert!(update.factors.is_none());
        assert!(update.default_unit.is_none());
        assert!(!update.is_empty());
        assert!(SettingsUpdate::default().is_empty());
    }
}
