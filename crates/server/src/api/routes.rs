use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{aggregates, findings, handlers, runs};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Scheduler / pipeline status
        .route("/status", get(handlers::status))
        // Runs
        .route("/runs", get(runs::list_runs))
        .route("/runs", post(runs::trigger_run))
        // Quality findings
        .route("/findings", get(findings::query_findings))
        // Hourly aggregates
        .route("/metrics/hourly", get(aggregates::list_hourly))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .route("/metrics", get(handlers::prometheus_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
