// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Emissions and savings calculation for individual trips.
//!
//! All factors are kg CO₂e per mile. Savings are measured against driving
//! the same distance alone in a gasoline car.

use crate::models::settings::{EmissionSettings, SettingsUpdate};
use crate::models::trip::{DistanceUnit, TransportMode, TripImpact};

/// Longest accepted trip distance.
pub const MAX_DISTANCE: f64 = 10_000.0;
/// Largest accepted emission factor (kg CO₂e per mile).
pub const MAX_EMISSION_FACTOR: f64 = 10.0;
/// Largest accepted rideshare occupancy.
pub const MAX_OCCUPANCY: f64 = 10.0;

/// Calculator holding the emission settings currently in effect.
///
/// The engine never validates its own input; callers check values with the
/// `validate_*` predicates before calculating or updating settings.
#[derive(Debug, Clone, Default)]
pub struct EmissionsEngine {
    settings: EmissionSettings,
}

impl EmissionsEngine {
    pub fn new(settings: EmissionSettings) -> Self {
        Self { settings }
    }

    /// Merge the present fields of `update` into the current settings.
    pub fn update_settings(&mut self, update: SettingsUpdate) {
        if let Some(factors) = update.factors {
            self.settings.factors = factors;
        }
        if let Some(occupancy) = update.rideshare_occupancy {
            self.settings.rideshare_occupancy = occupancy;
        }
        if let Some(unit) = update.default_unit {
            self.settings.default_unit = unit;
        }
    }

    /// Copy of the current settings.
    pub fn settings(&self) -> EmissionSettings {
        self.settings
    }

    /// Restore the default settings.
    pub fn reset(&mut self) {
        self.settings = EmissionSettings::default();
    }

    /// Factor actually applied to a trip in `mode`.
    pub fn effective_factor(&self, mode: TransportMode) -> f64 {
        let factor = self.settings.factors.get(mode);
        match mode {
            TransportMode::Rideshare => factor / self.settings.rideshare_occupancy,
            _ => factor,
        }
    }

    /// Unrounded emissions for a trip.
    pub fn calculate_emissions(&self, mode: TransportMode, distance: f64, unit: DistanceUnit) -> f64 {
        unit.to_miles(distance) * self.effective_factor(mode)
    }

    /// Unrounded savings versus driving alone, never negative.
    pub fn calculate_savings(&self, mode: TransportMode, distance: f64, unit: DistanceUnit) -> f64 {
        if mode == TransportMode::CarGas {
            return 0.0;
        }

        let car_factor = self.settings.factors.car_gas;
        let savings = unit.to_miles(distance) * (car_factor - self.effective_factor(mode));
        savings.max(0.0)
    }

    /// Emissions and savings for a trip, rounded to 3 decimals.
    pub fn calculate_trip(&self, mode: TransportMode, distance: f64, unit: DistanceUnit) -> TripImpact {
        TripImpact {
            emissions: round_to(self.calculate_emissions(mode, distance, unit), 3),
            savings: round_to(self.calculate_savings(mode, distance, unit), 3),
        }
    }

    /// `0 < distance <= 10000`.
    pub fn validate_distance(distance: f64) -> bool {
        distance > 0.0 && distance <= MAX_DISTANCE
    }

    /// `0 <= factor <= 10`.
    pub fn validate_emission_factor(factor: f64) -> bool {
        (0.0..=MAX_EMISSION_FACTOR).contains(&factor)
    }

    /// `0 < occupancy <= 10`.
    pub fn validate_occupancy(occupancy: f64) -> bool {
        occupancy > 0.0 && occupancy <= MAX_OCCUPANCY
    }

    /// Check every present field of a settings update.
    ///
    /// Returns one message per offending field.
    pub fn check_update(update: &SettingsUpdate) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();

        if let Some(factors) = &update.factors {
            for (mode, factor) in factors.iter() {
                if !Self::validate_emission_factor(factor) {
                    problems.push(format!(
                        "{}: must be between 0 and {} kg CO₂e per mile",
                        mode, MAX_EMISSION_FACTOR
                    ));
                }
            }
        }

        if let Some(occupancy) = update.rideshare_occupancy {
            if !Self::validate_occupancy(occupancy) {
                problems.push(format!(
                    "rideshare_occupancy: must be greater than 0 and at most {}",
                    MAX_OCCUPANCY
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
