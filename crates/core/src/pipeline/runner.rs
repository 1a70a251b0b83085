//! Pipeline runner implementation.

use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use regex_lite::Regex;
use tracing::{error, info};
use uuid::Uuid;

use crate::aggregate::AggregateUpdater;
use crate::archive::Archiver;
use crate::config::{ConfigError, SourceConfig};
use crate::findings::FindingStore;
use crate::loader::BatchLoader;
use crate::merge::FactMerger;
use crate::metrics;
use crate::quality::QualityGate;
use crate::sensor::{AvailabilitySensor, SensorConfig};
use crate::source::ObjectStore;
use crate::warehouse::{AggregateStore, DimensionStore, FactStore, StagingStore};

use super::error::PipelineError;
use super::types::{RunReport, RunStatus};

/// The order pipeline: wires the stages over the shared stores.
///
/// One instance serves every run; `run` holds no state between invocations.
pub struct OrderPipeline {
    object_store: Arc<dyn ObjectStore>,
    staging: Arc<dyn StagingStore>,
    facts: Arc<dyn FactStore>,
    aggregates: Arc<dyn AggregateStore>,
    dimensions: Arc<dyn DimensionStore>,
    findings: Arc<dyn FindingStore>,
    sensor: AvailabilitySensor,
    archiver: Archiver,
    landing_prefix: String,
    pattern: Regex,
}

impl OrderPipeline {
    /// Creates a pipeline over the given stores and configuration.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        staging: Arc<dyn StagingStore>,
        facts: Arc<dyn FactStore>,
        aggregates: Arc<dyn AggregateStore>,
        dimensions: Arc<dyn DimensionStore>,
        findings: Arc<dyn FindingStore>,
        source_config: SourceConfig,
        sensor_config: SensorConfig,
    ) -> Result<Self, ConfigError> {
        let pattern = Regex::new(&source_config.pattern).map_err(|e| {
            ConfigError::ValidationError(format!(
                "invalid source pattern '{}': {}",
                source_config.pattern, e
            ))
        })?;

        Ok(Self {
            object_store,
            staging,
            facts,
            aggregates,
            dimensions,
            findings,
            sensor: AvailabilitySensor::new(sensor_config),
            archiver: Archiver::new(
                source_config.landing_prefix.clone(),
                source_config.archive_prefix.clone(),
            ),
            landing_prefix: source_config.landing_prefix,
            pattern,
        })
    }

    /// Runs the pipeline once for a window.
    ///
    /// Never returns an error: failures are folded into the report so the
    /// caller can always record the run and tell a failed run (external
    /// retry needed) from a degraded one (retries itself next run).
    pub async fn run(&self, window: NaiveDate) -> RunReport {
        let run_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        let mut report = RunReport::new(run_id.clone(), window, Utc::now());

        info!(run_id = %run_id, window = %window, "pipeline run started");

        match self.execute(window, &mut report).await {
            Ok(()) => {
                info!(
                    run_id = %run_id,
                    status = report.status.as_str(),
                    records = report.records_staged,
                    rows = report.rows_inserted,
                    "pipeline run finished"
                );
            }
            Err(e) => {
                report.status = RunStatus::Failed;
                report.failed_stage = Some(e.stage());
                report.error = Some(e.to_string());
                error!(
                    run_id = %run_id,
                    stage = e.stage().as_str(),
                    error = %e,
                    "pipeline run failed"
                );
            }
        }

        report.finished_at = Utc::now();
        metrics::RUNS_TOTAL
            .with_label_values(&[report.status.as_str()])
            .inc();
        metrics::RUN_DURATION
            .with_label_values(&[report.status.as_str()])
            .observe(started.elapsed().as_secs_f64());

        report
    }

    async fn execute(
        &self,
        window: NaiveDate,
        report: &mut RunReport,
    ) -> Result<(), PipelineError> {
        // Sense. The matches become the run's load set; objects arriving
        // after this snapshot belong to the next run.
        let load_set = self
            .sensor
            .wait_for_objects(
                self.object_store.as_ref(),
                &self.landing_prefix,
                &self.pattern,
            )
            .await?;
        report.objects_in_load_set = load_set.len();

        // Load.
        let load = BatchLoader::load(
            self.object_store.as_ref(),
            self.staging.as_ref(),
            &load_set,
        )
        .await?;
        report.records_staged = load.records_staged;
        metrics::RECORDS_STAGED.inc_by(load.records_staged as u64);

        // Quality gate. Both checks complete before this returns.
        let quality =
            QualityGate::run(self.staging.as_ref(), self.findings.as_ref(), window).await?;
        report.findings_recorded = quality.mismatch_findings;
        metrics::FINDINGS_TOTAL
            .with_label_values(&["amount_mismatch"])
            .inc_by(quality.mismatch_findings as u64);

        // Fact merge.
        let merge = FactMerger::run(
            self.staging.as_ref(),
            self.facts.as_ref(),
            self.dimensions.as_ref(),
            window,
        )
        .await
        .map_err(PipelineError::Merge)?;
        report.orders_merged = merge.orders_merged;
        report.rows_inserted = merge.rows_inserted;
        metrics::FACT_ROWS_INSERTED.inc_by(merge.rows_inserted as u64);

        // Aggregates.
        let aggregate = AggregateUpdater::run(self.facts.as_ref(), self.aggregates.as_ref(), window)
            .await
            .map_err(PipelineError::Aggregate)?;
        report.hours_updated = aggregate.hours_updated;

        // Archive. Failures degrade the run instead of failing it: moved
        // objects stay moved, unmoved ones are retried next run.
        let stamp = Archiver::run_stamp(Utc::now());
        let outcome = self
            .archiver
            .archive(self.object_store.as_ref(), &load_set, &stamp)
            .await;
        report.objects_archived = outcome.archived.len();
        report.objects_unarchived = outcome.failed.len();
        metrics::OBJECTS_ARCHIVED.inc_by(outcome.archived.len() as u64);
        metrics::ARCHIVE_FAILURES.inc_by(outcome.failed.len() as u64);

        report.status = if outcome.is_complete() {
            RunStatus::Succeeded
        } else {
            RunStatus::Degraded
        };
        Ok(())
    }
}
