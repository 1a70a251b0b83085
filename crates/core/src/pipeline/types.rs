//! Types for the pipeline module.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Sense,
    Load,
    QualityGate,
    FactMerge,
    Aggregate,
    Archive,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Sense => "sense",
            Stage::Load => "load",
            Stage::QualityGate => "quality_gate",
            Stage::FactMerge => "fact_merge",
            Stage::Aggregate => "aggregate",
            Stage::Archive => "archive",
        }
    }
}

/// Final status of a run.
///
/// `Degraded` means the window's data is fully merged but some inputs could
/// not be archived; the next run retries them automatically. `Failed` means
/// no downstream stage ran and the run needs external retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Succeeded,
    Degraded,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Succeeded => "succeeded",
            RunStatus::Degraded => "degraded",
            RunStatus::Failed => "failed",
        }
    }
}

/// Everything an operator needs to know about one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    /// Logical processing window (date of the staged order timestamps).
    pub window: NaiveDate,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub status: RunStatus,
    /// Objects in the load-set snapshot.
    pub objects_in_load_set: usize,
    pub records_staged: usize,
    /// Amount-mismatch findings recorded by the quality gate.
    pub findings_recorded: usize,
    pub orders_merged: usize,
    pub rows_inserted: usize,
    pub hours_updated: usize,
    pub objects_archived: usize,
    /// Load-set objects left in landing after a partial archive.
    pub objects_unarchived: usize,
    /// Stage the run failed at, if it failed.
    pub failed_stage: Option<Stage>,
    pub error: Option<String>,
}

impl RunReport {
    /// A fresh report; counters fill in as stages complete.
    pub fn new(run_id: String, window: NaiveDate, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            window,
            started_at,
            finished_at: started_at,
            status: RunStatus::Failed,
            objects_in_load_set: 0,
            records_staged: 0,
            findings_recorded: 0,
            orders_merged: 0,
            rows_inserted: 0,
            hours_updated: 0,
            objects_archived: 0,
            objects_unarchived: 0,
            failed_stage: None,
            error: None,
        }
    }
}
