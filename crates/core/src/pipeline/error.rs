//! Error type for pipeline runs.

use thiserror::Error;

use crate::loader::LoaderError;
use crate::quality::QualityError;
use crate::sensor::SensorError;
use crate::warehouse::WarehouseError;

use super::types::Stage;

/// A fatal pipeline error. Every variant aborts the run; no later stage
/// executes. Archival failures are deliberately absent: they degrade the
/// run instead of failing it.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No new data appeared before the sensor deadline.
    #[error("sensor: {0}")]
    Sensor(#[from] SensorError),

    /// Loading or validating the load set failed.
    #[error("loader: {0}")]
    Loader(#[from] LoaderError),

    /// The quality gate failed the run.
    #[error("quality gate: {0}")]
    Quality(#[from] QualityError),

    /// Fact merge could not complete (including the existence check).
    #[error("fact merge: {0}")]
    Merge(#[source] WarehouseError),

    /// Aggregate recompute or upsert failed.
    #[error("aggregate update: {0}")]
    Aggregate(#[source] WarehouseError),
}

impl PipelineError {
    /// The stage this error aborted the run at.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Sensor(_) => Stage::Sense,
            PipelineError::Loader(_) => Stage::Load,
            PipelineError::Quality(_) => Stage::QualityGate,
            PipelineError::Merge(_) => Stage::FactMerge,
            PipelineError::Aggregate(_) => Stage::Aggregate,
        }
    }
}
