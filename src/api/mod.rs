pub mod insights;
pub mod macro_review;
pub mod what_if;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::clients::LlmEngine;
use crate::types::StatusResponse;

pub struct AppState {
    pub engine: LlmEngine,
    /// Advisory flag the dashboard polls to disable re-triggering while a
    /// completion call is running. Overlapping requests are neither
    /// serialized nor canceled.
    pub in_flight: AtomicBool,
}

impl AppState {
    pub fn new(engine: LlmEngine) -> Self {
        Self {
            engine,
            in_flight: AtomicBool::new(false),
        }
    }
}

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/insights", post(insights::handler))
        .route("/api/macro-review", post(macro_review::handler))
        .route("/api/what-if", post(what_if::handler))
        .route("/api/status", get(status))
        .route("/health", get(health_check))
}

async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        in_flight: state.in_flight.load(Ordering::SeqCst),
    })
}

async fn health_check() -> &'static str {
    "OK"
}
