//! Recurring run trigger.
//!
//! Drives the pipeline on a fixed interval (default every 15 minutes) with
//! "today" as the logical window. Runs are strictly sequential: a scheduled
//! tick and a manual trigger can never process the same window concurrently.

mod config;

pub use config::*;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::time::Duration;
use tracing::{info, warn};

use crate::pipeline::{OrderPipeline, RunReport};

/// Current status of the scheduler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerStatus {
    /// Whether the recurring loop is running.
    pub running: bool,
    /// Runs completed since startup (scheduled and manual).
    pub runs_completed: u64,
    /// The most recent run, if any.
    pub last_run: Option<RunReport>,
}

/// Schedules pipeline runs and keeps their history.
pub struct Scheduler {
    config: SchedulerConfig,
    pipeline: Arc<OrderPipeline>,

    running: Arc<AtomicBool>,
    runs_completed: Arc<AtomicU64>,
    history: Arc<RwLock<VecDeque<RunReport>>>,
    // Serializes runs so a manual trigger cannot overlap a scheduled tick.
    run_lock: Arc<Mutex<()>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Scheduler {
    /// Create a new scheduler.
    pub fn new(config: SchedulerConfig, pipeline: Arc<OrderPipeline>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            pipeline,
            running: Arc::new(AtomicBool::new(false)),
            runs_completed: Arc::new(AtomicU64::new(0)),
            history: Arc::new(RwLock::new(VecDeque::new())),
            run_lock: Arc::new(Mutex::new(())),
            shutdown_tx,
        }
    }

    /// Start the recurring loop (spawns a background task).
    pub async fn start(&self) {
        if !self.config.enabled {
            info!("scheduler disabled, runs must be triggered manually");
            return;
        }
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("scheduler already running");
            return;
        }

        info!(interval_ms = self.config.interval_ms, "starting scheduler");

        let pipeline = Arc::clone(&self.pipeline);
        let running = Arc::clone(&self.running);
        let runs_completed = Arc::clone(&self.runs_completed);
        let history = Arc::clone(&self.history);
        let run_lock = Arc::clone(&self.run_lock);
        let history_limit = self.config.history_limit;
        let interval = Duration::from_millis(self.config.interval_ms);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = shutdown_rx.recv() => {
                        info!("scheduler loop shutting down");
                        break;
                    }
                }

                if !running.load(Ordering::SeqCst) {
                    break;
                }

                let window = Utc::now().date_naive();
                let report = {
                    let _guard = run_lock.lock().await;
                    pipeline.run(window).await
                };
                runs_completed.fetch_add(1, Ordering::SeqCst);
                Self::record(&history, history_limit, report).await;
            }
        });
    }

    /// Stop the recurring loop. The current run, if any, finishes.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        info!("stopping scheduler");
        let _ = self.shutdown_tx.send(());
    }

    /// Run the pipeline immediately for today's window.
    ///
    /// Waits for any in-flight run first; the two never overlap.
    pub async fn trigger_now(&self) -> RunReport {
        let window = Utc::now().date_naive();
        let report = {
            let _guard = self.run_lock.lock().await;
            self.pipeline.run(window).await
        };
        self.runs_completed.fetch_add(1, Ordering::SeqCst);
        Self::record(&self.history, self.config.history_limit, report.clone()).await;
        report
    }

    /// Current scheduler status.
    pub async fn status(&self) -> SchedulerStatus {
        let history = self.history.read().await;
        SchedulerStatus {
            running: self.running.load(Ordering::SeqCst),
            runs_completed: self.runs_completed.load(Ordering::SeqCst),
            last_run: history.back().cloned(),
        }
    }

    /// Run history, oldest first.
    pub async fn history(&self) -> Vec<RunReport> {
        self.history.read().await.iter().cloned().collect()
    }

    async fn record(
        history: &RwLock<VecDeque<RunReport>>,
        limit: usize,
        report: RunReport,
    ) {
        let mut history = history.write().await;
        history.push_back(report);
        while history.len() > limit {
            history.pop_front();
        }
    }
}
