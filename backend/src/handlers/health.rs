use std::sync::{Arc, OnceLock};
use std::time::Instant;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

static STARTED: OnceLock<Instant> = OnceLock::new();

/// Pins the uptime origin; called once from `main` before serving.
pub fn init_start_time() {
    STARTED.get_or_init(Instant::now);
}

fn uptime_secs() -> f64 {
    STARTED.get().map_or(0.0, |t| t.elapsed().as_secs_f64())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime: f64,
    /// Stylization endpoint this gateway forwards to. Reachability is not checked.
    pub backend: String,
    pub tracked_jobs: usize,
    pub history_limit: usize,
    pub persistent_store: bool,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime: uptime_secs(),
        backend: state.client.endpoint().to_string(),
        tracked_jobs: state.jobs.len(),
        history_limit: state.history.limit(),
        persistent_store: state.config.store_dir.is_some(),
    })
}

pub async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": env!("CARGO_PKG_NAME"),
        "apiVersion": "v1",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
