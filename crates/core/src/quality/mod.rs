//! Data-quality gate.
//!
//! Two independent checks over the window's staged rows. The duplicate check
//! is blocking: any order id staged more than once fails the run before the
//! fact merge can double-count it. The amount-consistency check only records
//! findings and never halts the pipeline. Both checks complete before the
//! gate returns, whatever their outcomes.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::findings::{CheckType, FindingError, FindingStore, QualityFinding, Severity};
use crate::model::Order;
use crate::warehouse::{StagingStore, WarehouseError};

/// Largest tolerated difference between the recorded and calculated totals.
pub const AMOUNT_TOLERANCE: f64 = 0.01;

/// Errors from the quality gate.
#[derive(Debug, Error)]
pub enum QualityError {
    /// One or more order ids were staged more than once in the window.
    #[error("{count} duplicate order id(s) staged in window")]
    DuplicateOrders { count: usize },

    /// Staged rows could not be read.
    #[error("warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    /// A finding could not be recorded.
    #[error("finding store error: {0}")]
    Findings(#[from] FindingError),
}

/// Summary of a completed (or failed) gate pass.
#[derive(Debug, Clone)]
pub struct QualityReport {
    /// Staged rows examined.
    pub rows_checked: usize,
    /// Amount-mismatch findings recorded.
    pub mismatch_findings: usize,
}

/// Runs the two quality checks for a window.
pub struct QualityGate;

impl QualityGate {
    /// Runs both checks over the window's staged rows.
    ///
    /// The checks are independent and run concurrently; both complete before
    /// this returns. A duplicate violation yields an error, but any
    /// mismatch findings from the concurrent check are still recorded first.
    pub async fn run(
        staging: &dyn StagingStore,
        findings: &dyn FindingStore,
        window: NaiveDate,
    ) -> Result<QualityReport, QualityError> {
        let staged = staging.orders_for_window(window)?;

        let (duplicate_result, mismatch_result) = tokio::join!(
            Self::check_duplicates(&staged, findings),
            Self::check_amounts(&staged, findings),
        );

        let mismatch_findings = mismatch_result?;
        duplicate_result?;

        info!(
            rows = staged.len(),
            mismatches = mismatch_findings,
            "quality gate passed"
        );

        Ok(QualityReport {
            rows_checked: staged.len(),
            mismatch_findings,
        })
    }

    /// Blocking check: no order id may be staged more than once.
    async fn check_duplicates(
        staged: &[Order],
        findings: &dyn FindingStore,
    ) -> Result<(), QualityError> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for order in staged {
            *counts.entry(order.order_id.as_str()).or_insert(0) += 1;
        }

        let duplicates: Vec<(&str, usize)> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .collect();

        if duplicates.is_empty() {
            return Ok(());
        }

        for (order_id, count) in &duplicates {
            warn!(order_id, count, "duplicate order id in staged window");
            findings.append(&QualityFinding::new(
                CheckType::Duplicate,
                *order_id,
                format!("order id staged {} times in window", count),
                Severity::Error,
            ))?;
        }

        Err(QualityError::DuplicateOrders {
            count: duplicates.len(),
        })
    }

    /// Non-blocking check: line items must sum to the recorded total.
    ///
    /// Returns the number of findings recorded.
    async fn check_amounts(
        staged: &[Order],
        findings: &dyn FindingStore,
    ) -> Result<usize, QualityError> {
        let mut recorded = 0;
        for order in staged {
            let calculated = order.calculated_total();
            if (calculated - order.total_amount).abs() > AMOUNT_TOLERANCE {
                findings.append(&QualityFinding::new(
                    CheckType::AmountMismatch,
                    order.order_id.as_str(),
                    format!(
                        "Calculated: {} vs Recorded: {}",
                        calculated, order.total_amount
                    ),
                    Severity::Warning,
                ))?;
                recorded += 1;
            }
        }
        Ok(recorded)
    }
}
