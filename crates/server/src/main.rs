use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orderflow_core::{
    load_config, validate_config, FsObjectStore, ObjectStore, OrderPipeline, Scheduler,
    SqliteFindingStore, SqliteWarehouse,
};

use orderflow_server::api::create_router;
use orderflow_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("ORDERFLOW_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    info!("Source root: {:?}", config.source.root);

    // Compute config hash for startup logging
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config_hash = &config_hash[..16],
        "starting orderflow"
    );

    // Create the SQLite warehouse (staging, facts, aggregates, dimensions)
    let warehouse = Arc::new(
        SqliteWarehouse::new(&config.database.path).context("Failed to create warehouse")?,
    );
    info!("Warehouse initialized");

    // Create the findings log on the same database file
    let findings: Arc<SqliteFindingStore> = Arc::new(
        SqliteFindingStore::new(&config.database.path)
            .context("Failed to create finding store")?,
    );
    info!("Finding store initialized");

    // Create the source object store
    let object_store: Arc<dyn ObjectStore> =
        Arc::new(FsObjectStore::new(config.source.root.clone()));

    // Wire the pipeline
    let pipeline = OrderPipeline::new(
        object_store,
        warehouse.clone(),
        warehouse.clone(),
        warehouse.clone(),
        warehouse.clone(),
        findings.clone(),
        config.source.clone(),
        config.sensor.clone(),
    )
    .context("Failed to create pipeline")?;

    // Start the recurring scheduler
    let scheduler = Arc::new(Scheduler::new(config.scheduler.clone(), Arc::new(pipeline)));
    scheduler.start().await;

    // Build the HTTP API
    let state = Arc::new(AppState::new(
        config.clone(),
        scheduler.clone(),
        findings,
        warehouse,
    ));
    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid server address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Stop the scheduler; an in-flight run finishes first.
    scheduler.stop().await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
