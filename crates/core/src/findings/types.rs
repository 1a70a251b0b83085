use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of quality check that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    /// An order id appeared more than once in the window's staged rows.
    Duplicate,
    /// Line items did not sum to the recorded order total.
    AmountMismatch,
}

impl CheckType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckType::Duplicate => "duplicate",
            CheckType::AmountMismatch => "amount_mismatch",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "duplicate" => Some(CheckType::Duplicate),
            "amount_mismatch" => Some(CheckType::AmountMismatch),
            _ => None,
        }
    }
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "warning" => Some(Severity::Warning),
            "error" => Some(Severity::Error),
            _ => None,
        }
    }
}

/// An immutable record of a detected data-quality issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityFinding {
    /// Fresh unique id per finding.
    pub check_id: String,
    /// When the check ran.
    pub check_timestamp: DateTime<Utc>,
    pub check_type: CheckType,
    /// The order the finding is about.
    pub order_id: String,
    /// Human-readable description of the issue.
    pub issue_description: String,
    pub severity: Severity,
}

impl QualityFinding {
    /// Creates a finding with a fresh check id and the current timestamp.
    pub fn new(
        check_type: CheckType,
        order_id: impl Into<String>,
        issue_description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            check_id: Uuid::new_v4().to_string(),
            check_timestamp: Utc::now(),
            check_type,
            order_id: order_id.into(),
            issue_description: issue_description.into(),
            severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assigns_fresh_ids() {
        let a = QualityFinding::new(CheckType::AmountMismatch, "O1", "desc", Severity::Warning);
        let b = QualityFinding::new(CheckType::AmountMismatch, "O1", "desc", Severity::Warning);
        assert_ne!(a.check_id, b.check_id);
    }

    #[test]
    fn test_check_type_round_trip() {
        for check_type in [CheckType::Duplicate, CheckType::AmountMismatch] {
            assert_eq!(CheckType::parse(check_type.as_str()), Some(check_type));
        }
        assert_eq!(CheckType::parse("bogus"), None);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&CheckType::AmountMismatch).unwrap();
        assert_eq!(json, "\"amount_mismatch\"");
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
