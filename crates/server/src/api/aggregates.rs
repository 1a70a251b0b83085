use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use orderflow_core::{AggregateStore, HourlyMetric};

use crate::state::AppState;

/// Returns every hourly metric row, oldest hour first.
pub async fn list_hourly(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HourlyMetric>>, (StatusCode, String)> {
    state
        .aggregates()
        .all()
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
