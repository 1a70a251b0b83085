use chrono::{DateTime, Utc};
use thiserror::Error;

use super::types::{CheckType, QualityFinding, Severity};

#[derive(Debug, Error)]
pub enum FindingError {
    #[error("Database error: {0}")]
    Database(String),
}

/// Filter for querying findings
#[derive(Debug, Clone, Default)]
pub struct FindingFilter {
    pub check_type: Option<CheckType>,
    pub order_id: Option<String>,
    pub severity: Option<Severity>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: i64,
    pub offset: i64,
}

impl FindingFilter {
    pub fn new() -> Self {
        Self {
            limit: 100,
            offset: 0,
            ..Default::default()
        }
    }

    pub fn with_check_type(mut self, check_type: CheckType) -> Self {
        self.check_type = Some(check_type);
        self
    }

    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_time_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

/// Trait for finding storage
pub trait FindingStore: Send + Sync {
    /// Append a finding to the log
    fn append(&self, finding: &QualityFinding) -> Result<(), FindingError>;

    /// Query findings with optional filters
    fn query(&self, filter: &FindingFilter) -> Result<Vec<QualityFinding>, FindingError>;

    /// Count matching findings
    fn count(&self, filter: &FindingFilter) -> Result<i64, FindingError>;
}
