//! Cron scheduler for periodic maintenance tasks.

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::info;

use shelfwire_core::config::retention::RetentionConfig;
use shelfwire_core::error::AppError;
use shelfwire_core::result::AppResult;

use crate::jobs::retention::RetentionSweeper;

/// Cron-based scheduler for periodic background tasks.
pub struct CronScheduler {
    scheduler: JobScheduler,
    config: RetentionConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler.
    pub async fn new(config: RetentionConfig) -> AppResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler, config })
    }

    /// Register the retention sweep on the configured schedule.
    pub async fn register_retention_sweep(&self, sweeper: RetentionSweeper) -> AppResult<()> {
        let schedule = self.config.schedule.clone();
        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let sweeper = sweeper.clone();
            Box::pin(async move {
                tracing::debug!("Running retention sweep");
                sweeper.run().await;
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create retention_sweep schedule: {e}"))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add retention_sweep schedule: {e}")))?;

        info!(schedule = %schedule, "Registered: retention_sweep");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> AppResult<()> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> AppResult<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }
}
