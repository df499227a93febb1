// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Greendex: personal transportation carbon tracker
//!
//! This crate provides the backend API for logging trips, estimating their
//! CO₂e emissions and savings, and awarding achievements for greener habits.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::{Persisted, Store};
use services::{AchievementEngine, EmissionsEngine};
use tokio::sync::{Mutex, RwLock};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub emissions: RwLock<EmissionsEngine>,
    /// Held across evaluate-and-persist so unlocks are never reported twice
    pub achievements: Mutex<AchievementEngine>,
}

impl AppState {
    /// Build state from a store and the documents it loaded.
    pub fn new(config: Config, store: Store, persisted: Persisted) -> Self {
        Self {
            config,
            store,
            emissions: RwLock::new(EmissionsEngine::new(persisted.settings)),
            achievements: Mutex::new(AchievementEngine::new(persisted.achievements)),
        }
    }
}
