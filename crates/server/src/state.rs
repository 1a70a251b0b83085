use std::sync::Arc;

use orderflow_core::{
    AggregateStore, Config, FindingStore, SanitizedConfig, Scheduler, SqliteFindingStore,
    SqliteWarehouse,
};

/// Shared application state
pub struct AppState {
    config: Config,
    scheduler: Arc<Scheduler>,
    findings: Arc<SqliteFindingStore>,
    warehouse: Arc<SqliteWarehouse>,
}

impl AppState {
    pub fn new(
        config: Config,
        scheduler: Arc<Scheduler>,
        findings: Arc<SqliteFindingStore>,
        warehouse: Arc<SqliteWarehouse>,
    ) -> Self {
        Self {
            config,
            scheduler,
            findings,
            warehouse,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn scheduler(&self) -> &Scheduler {
        self.scheduler.as_ref()
    }

    pub fn findings(&self) -> &dyn FindingStore {
        self.findings.as_ref()
    }

    pub fn aggregates(&self) -> &dyn AggregateStore {
        self.warehouse.as_ref()
    }
}
