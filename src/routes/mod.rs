//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the card endpoints and the health check under a single
//! Axum router. Cross-origin access is left wide open for browser and
//! shortcut clients, and every request gets a tracing span.

pub mod cards;

use axum::Router;
use axum::response::Json;
use axum::routing::{get, post};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "Business Card Processor";

/// Build the service router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health_check))
        .route("/process-card", post(cards::process_card))
        .route("/cards", get(cards::list_cards))
        .route("/cards/{id}", get(cards::get_card))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
}

/// `GET /` — liveness only; never touches the store.
async fn health_check() -> Json<HealthResponse> {
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
    Json(HealthResponse { status: "healthy", service: SERVICE_NAME, timestamp })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
