pub mod aggregate;
pub mod archive;
pub mod config;
pub mod findings;
pub mod loader;
pub mod merge;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod quality;
pub mod scheduler;
pub mod sensor;
pub mod source;
pub mod testing;
pub mod warehouse;

pub use aggregate::{compute_hourly_metrics, AggregateReport, AggregateUpdater};
pub use archive::{ArchiveFailure, ArchiveOutcome, ArchivedObject, Archiver};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    SanitizedConfig, ServerConfig, SourceConfig,
};
pub use findings::{
    CheckType, FindingError, FindingFilter, FindingStore, QualityFinding, Severity,
    SqliteFindingStore,
};
pub use loader::{BatchLoader, LoadReport, LoaderError};
pub use merge::{FactMerger, MergeReport};
pub use model::{region_for_state, LineItem, Order, Region, ShippingAddress};
pub use pipeline::{OrderPipeline, PipelineError, RunReport, RunStatus, Stage};
pub use quality::{QualityError, QualityGate, QualityReport, AMOUNT_TOLERANCE};
pub use scheduler::{Scheduler, SchedulerConfig, SchedulerStatus};
pub use sensor::{AvailabilitySensor, SensorConfig, SensorError};
pub use source::{FsObjectStore, ObjectStore, SourceError, SourceObject};
pub use warehouse::{
    AggregateStore, CustomerRecord, DimensionStore, FactOrderLine, FactStore, HourlyMetric,
    ProductRecord, SqliteWarehouse, StagingStore, WarehouseError,
};
