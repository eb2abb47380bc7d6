use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::UploadConfig;
use crate::services::{OrphanPhotoSweeper, SweepReport};

/// Runs background maintenance jobs on a cron schedule.
pub struct Scheduler {
    sweeper: Arc<OrphanPhotoSweeper>,
    config: UploadConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    pub fn new(sweeper: Arc<OrphanPhotoSweeper>, config: UploadConfig) -> Self {
        Self {
            sweeper,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.sweep_enabled {
            info!("Orphaned photo sweep is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting background scheduler");

        let mut sched = JobScheduler::new().await?;

        let sweeper = Arc::clone(&self.sweeper);
        let running = Arc::clone(&self.running);
        let job = Job::new_async(self.config.orphan_sweep_cron.as_str(), move |_uuid, _lock| {
            let sweeper = Arc::clone(&sweeper);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                let start = std::time::Instant::now();
                info!(event = "job_started", job_name = "sweep_photos", "Starting orphaned photo sweep");

                match sweeper.sweep().await {
                    Ok(report) => info!(
                        event = "job_finished",
                        job_name = "sweep_photos",
                        scanned = report.scanned,
                        removed = report.removed,
                        kept_recent = report.kept_recent,
                        duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                        "Orphaned photo sweep finished"
                    ),
                    Err(e) => {
                        error!(event = "job_failed", job_name = "sweep_photos", error = %e, "Orphaned photo sweep failed");
                    }
                }
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!(
            "Orphaned photo sweep scheduled: {}",
            self.config.orphan_sweep_cron
        );

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping scheduler...");
        *self.running.write().await = false;
    }

    pub async fn run_once(&self) -> Result<SweepReport> {
        info!("Running manual photo sweep...");
        self.sweeper.sweep().await
    }
}
