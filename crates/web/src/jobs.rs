use std::time::Duration;

use anyhow::anyhow;
use storage::{Database, repository::pause_log::PauseLogRepository};
use tokio_cron_scheduler::{Job, JobScheduler};

/// Delete pauses left open past the staleness threshold
pub async fn sweep_stale_pauses(db: &Database) {
    match PauseLogRepository::new(db).sweep().await {
        Ok(deleted) => tracing::debug!(deleted, "pause sweep finished"),
        Err(e) => tracing::warn!("pause sweep failed: {:?}", e),
    }
}

/// Schedule the pause sweep. The returned scheduler must be kept alive.
pub async fn register_jobs(db: Database, sweep_every: Duration) -> anyhow::Result<JobScheduler> {
    let scheduler = JobScheduler::new()
        .await
        .map_err(|e| anyhow!("failed to create job scheduler: {e:?}"))?;

    let sweep = Job::new_repeated_async(sweep_every, move |_uuid, _scheduler| {
        let db = db.clone();
        Box::pin(async move {
            sweep_stale_pauses(&db).await;
        })
    })
    .map_err(|e| anyhow!("failed to create pause sweep job: {e:?}"))?;

    scheduler
        .add(sweep)
        .await
        .map_err(|e| anyhow!("failed to schedule pause sweep: {e:?}"))?;
    scheduler
        .start()
        .await
        .map_err(|e| anyhow!("failed to start job scheduler: {e:?}"))?;

    tracing::info!("Pause sweep scheduled every {}s", sweep_every.as_secs());
    Ok(scheduler)
}
