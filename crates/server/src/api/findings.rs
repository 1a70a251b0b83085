use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use orderflow_core::{CheckType, FindingFilter, FindingStore, QualityFinding, Severity};

use crate::state::AppState;

/// Maximum allowed limit for finding queries
const MAX_LIMIT: i64 = 1000;

/// Default limit for finding queries
const DEFAULT_LIMIT: i64 = 100;

/// Query parameters for the findings endpoint
#[derive(Debug, Deserialize)]
pub struct FindingQueryParams {
    /// Filter by check type ("duplicate" or "amount_mismatch")
    pub check_type: Option<String>,
    /// Filter by order ID
    pub order_id: Option<String>,
    /// Filter by severity ("warning" or "error")
    pub severity: Option<String>,
    /// Filter findings after this timestamp (ISO 8601)
    pub from: Option<DateTime<Utc>>,
    /// Filter findings before this timestamp (ISO 8601)
    pub to: Option<DateTime<Utc>>,
    /// Maximum number of findings to return (default 100, max 1000)
    pub limit: Option<i64>,
    /// Pagination offset (default 0)
    pub offset: Option<i64>,
}

/// Response for the findings endpoint
#[derive(Debug, Serialize)]
pub struct FindingQueryResponse {
    pub findings: Vec<QualityFinding>,
    /// Total number of matching findings
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

pub async fn query_findings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FindingQueryParams>,
) -> Result<Json<FindingQueryResponse>, (StatusCode, String)> {
    let mut filter = FindingFilter::new()
        .with_limit(params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT))
        .with_offset(params.offset.unwrap_or(0).max(0))
        .with_time_range(params.from, params.to);

    if let Some(ref value) = params.check_type {
        let check_type = CheckType::parse(value).ok_or((
            StatusCode::BAD_REQUEST,
            format!("unknown check_type: {}", value),
        ))?;
        filter = filter.with_check_type(check_type);
    }

    if let Some(ref value) = params.severity {
        let severity = Severity::parse(value).ok_or((
            StatusCode::BAD_REQUEST,
            format!("unknown severity: {}", value),
        ))?;
        filter = filter.with_severity(severity);
    }

    if let Some(order_id) = params.order_id {
        filter = filter.with_order_id(order_id);
    }

    let findings = state
        .findings()
        .query(&filter)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let total = state
        .findings()
        .count(&filter)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(FindingQueryResponse {
        findings,
        total,
        limit: filter.limit,
        offset: filter.offset,
    }))
}
