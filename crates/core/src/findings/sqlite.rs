use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use super::{CheckType, FindingError, FindingFilter, FindingStore, QualityFinding, Severity};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS data_quality_checks (
        check_id TEXT PRIMARY KEY,
        check_timestamp TEXT NOT NULL,
        check_type TEXT NOT NULL,
        order_id TEXT NOT NULL,
        issue_description TEXT NOT NULL,
        severity TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_quality_checks_timestamp ON data_quality_checks(check_timestamp);
    CREATE INDEX IF NOT EXISTS idx_quality_checks_order_id ON data_quality_checks(order_id);
    CREATE INDEX IF NOT EXISTS idx_quality_checks_type ON data_quality_checks(check_type);
"#;

/// SQLite-backed finding store
pub struct SqliteFindingStore {
    conn: Mutex<Connection>,
}

impl SqliteFindingStore {
    /// Create a new SQLite finding store, creating the database file and tables if needed
    pub fn new(path: &Path) -> Result<Self, FindingError> {
        let conn = Connection::open(path).map_err(|e| FindingError::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| FindingError::Database(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite finding store (useful for testing)
    pub fn in_memory() -> Result<Self, FindingError> {
        let conn = Connection::open_in_memory().map_err(|e| FindingError::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| FindingError::Database(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn build_where_clause(filter: &FindingFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(check_type) = filter.check_type {
            conditions.push("check_type = ?");
            params.push(Box::new(check_type.as_str()));
        }

        if let Some(ref order_id) = filter.order_id {
            conditions.push("order_id = ?");
            params.push(Box::new(order_id.clone()));
        }

        if let Some(severity) = filter.severity {
            conditions.push("severity = ?");
            params.push(Box::new(severity.as_str()));
        }

        if let Some(ref from) = filter.from {
            conditions.push("check_timestamp >= ?");
            params.push(Box::new(from.to_rfc3339()));
        }

        if let Some(ref to) = filter.to {
            conditions.push("check_timestamp <= ?");
            params.push(Box::new(to.to_rfc3339()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }
}

impl FindingStore for SqliteFindingStore {
    fn append(&self, finding: &QualityFinding) -> Result<(), FindingError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO data_quality_checks
             (check_id, check_timestamp, check_type, order_id, issue_description, severity)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                finding.check_id,
                finding.check_timestamp.to_rfc3339(),
                finding.check_type.as_str(),
                finding.order_id,
                finding.issue_description,
                finding.severity.as_str(),
            ],
        )
        .map_err(|e| FindingError::Database(e.to_string()))?;

        Ok(())
    }

    fn query(&self, filter: &FindingFilter) -> Result<Vec<QualityFinding>, FindingError> {
        let conn = self.conn.lock().unwrap();

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!(
            "SELECT check_id, check_timestamp, check_type, order_id, issue_description, severity
             FROM data_quality_checks {} ORDER BY check_timestamp DESC LIMIT ? OFFSET ?",
            where_clause
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| FindingError::Database(e.to_string()))?;

        let mut all_params: Vec<Box<dyn rusqlite::ToSql>> = params;
        all_params.push(Box::new(filter.limit));
        all_params.push(Box::new(filter.offset));

        let param_refs: Vec<&dyn rusqlite::ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                let timestamp_str: String = row.get(1)?;
                let check_type_str: String = row.get(2)?;
                let severity_str: String = row.get(5)?;
                Ok((
                    row.get::<_, String>(0)?,
                    timestamp_str,
                    check_type_str,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    severity_str,
                ))
            })
            .map_err(|e| FindingError::Database(e.to_string()))?;

        let mut findings = Vec::new();
        for row in rows {
            let (check_id, timestamp_str, check_type_str, order_id, issue_description, severity_str) =
                row.map_err(|e| FindingError::Database(e.to_string()))?;

            let check_timestamp = chrono::DateTime::parse_from_rfc3339(&timestamp_str)
                .map_err(|e| FindingError::Database(format!("Invalid timestamp: {}", e)))?
                .into();
            let check_type = CheckType::parse(&check_type_str)
                .ok_or_else(|| FindingError::Database(format!("Invalid check type: {}", check_type_str)))?;
            let severity = Severity::parse(&severity_str)
                .ok_or_else(|| FindingError::Database(format!("Invalid severity: {}", severity_str)))?;

            findings.push(QualityFinding {
                check_id,
                check_timestamp,
                check_type,
                order_id,
                issue_description,
                severity,
            });
        }

        Ok(findings)
    }

    fn count(&self, filter: &FindingFilter) -> Result<i64, FindingError> {
        let conn = self.conn.lock().unwrap();

        let (where_clause, params) = Self::build_where_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM data_quality_checks {}", where_clause);

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))
            .map_err(|e| FindingError::Database(e.to_string()))
    }
}
