//! Axum router wiring.
//!
//! Exposes a single `GET /metrics` scrape route; everything else is 404.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops};

pub const METRICS_PATH: &str = "/metrics";

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(METRICS_PATH, get(ops::metrics))
        .fallback(ops::not_found)
        .with_state(state)
}
