// src/ingest/scheduler.rs
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::Snapshot;
use crate::error::CycleError;
use crate::ingest::pipeline::Refresher;

#[derive(Clone, Copy, Debug)]
pub struct RefreshSchedulerCfg {
    /// Pause between the end of one cycle and the start of the next.
    pub interval: Duration,
}

/// Owner of the background refresh task.
pub struct RefreshHandle {
    shutdown: Arc<Notify>,
    join: JoinHandle<()>,
}

impl RefreshHandle {
    /// Ask the loop to stop after the current cycle and wait for it.
    pub async fn stop(self) {
        self.shutdown.notify_one();
        if let Err(e) = self.join.await {
            warn!(target: "ingest", error = %e, "refresh loop ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Spawn the refresh loop. The first cycle starts right away; each next one
/// starts `interval` after the previous one finished, so slow cycles push
/// the schedule back instead of piling up.
pub fn spawn_refresh_loop(refresher: Arc<Refresher>, cfg: RefreshSchedulerCfg) -> RefreshHandle {
    let shutdown = Arc::new(Notify::new());
    let stop = Arc::clone(&shutdown);

    let join = tokio::spawn(async move {
        loop {
            match run_cycle(Arc::clone(&refresher)).await {
                Ok(snapshot) => {
                    info!(
                        target: "ingest",
                        generated_at = %snapshot.generated_at,
                        "refresh tick done"
                    );
                }
                Err(e) => {
                    warn!(target: "ingest", error = %e, "refresh cycle abandoned");
                    counter!("refresh_cycle_failures_total").increment(1);
                }
            }

            tokio::select! {
                _ = stop.notified() => {
                    info!(target: "ingest", "refresh loop shutdown requested");
                    break;
                }
                _ = tokio::time::sleep(cfg.interval) => {}
            }
        }
    });

    RefreshHandle { shutdown, join }
}

/// Run one cycle on its own task so a panic anywhere in it only costs this
/// cycle.
pub async fn run_cycle(refresher: Arc<Refresher>) -> Result<Arc<Snapshot>, CycleError> {
    tokio::spawn(async move { refresher.refresh_once().await })
        .await
        .map_err(|e| CycleError::Aborted(e.to_string()))
}
