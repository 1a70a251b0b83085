use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use orderflow_core::RunReport;

use crate::state::AppState;

/// Returns the run history, oldest first.
pub async fn list_runs(State(state): State<Arc<AppState>>) -> Json<Vec<RunReport>> {
    Json(state.scheduler().history().await)
}

/// Triggers a pipeline run for today's window and returns its report.
///
/// Waits for any in-flight scheduled run first; a trigger can never overlap
/// one. The response is 200 whatever the run status: the report itself says
/// whether the run succeeded, degraded or failed.
pub async fn trigger_run(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RunReport>, StatusCode> {
    let report = state.scheduler().trigger_now().await;
    Ok(Json(report))
}
