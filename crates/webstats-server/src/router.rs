//! Axum router wiring.
//!
//! One route: `GET /` renders the dashboard.

use axum::{routing::get, Router};

use crate::{app_state::AppState, handler};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::page))
        .with_state(state)
}
