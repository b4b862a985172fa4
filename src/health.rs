//! `GET /health` endpoint handler.
//!
//! Always answers 200 with a [`HealthResponse`]: service name, version,
//! uptime, config snapshot metadata and cumulative request counters. It
//! reads the store without triggering a reload, so a broken config file
//! in development mode cannot make the health check fail.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub config: ConfigHealth,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct ConfigHealth {
    pub source: String,
    pub version: String,
    pub loaded_ago_seconds: u64,
    pub services: usize,
    pub reloads: u64,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub forwarded: u64,
    pub warnings: u64,
    pub failed: u64,
    pub rejected: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store = state.store.status().await;

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        config: ConfigHealth {
            source: store.source.to_string(),
            version: store.version,
            loaded_ago_seconds: store.loaded_ago_seconds,
            services: store.services,
            reloads: store.reloads,
        },
        stats: StatsResponse {
            forwarded: state.stats.forwarded.load(Ordering::Relaxed),
            warnings: state.stats.warnings.load(Ordering::Relaxed),
            failed: state.stats.failed.load(Ordering::Relaxed),
            rejected: state.stats.rejected.load(Ordering::Relaxed),
        },
    })
}
