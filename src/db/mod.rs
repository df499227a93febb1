// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer (JSON documents on local disk).

pub mod store;

pub use store::{LoadReport, Persisted, Store};

/// Document names as constants.
pub mod collections {
    /// Trip log, most recent entry first
    pub const TRIPS: &str = "trips.json";
    /// Emission settings in effect for new trips
    pub const SETTINGS: &str = "settings.json";
    /// Earned achievement records
    pub const ACHIEVEMENTS: &str = "achievements.json";
}
