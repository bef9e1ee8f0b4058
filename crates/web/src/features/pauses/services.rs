use storage::{
    Database,
    dto::pause_log::{
        CheckpointRacerStatus, CustomPauseRequest, OpenPauseRequest, PausedTotal,
        RacerCheckpointRequest,
    },
    error::Result,
    models::PauseInterval,
    repository::pause_log::PauseLogRepository,
};

pub async fn open_pause(db: &Database, request: &OpenPauseRequest) -> Result<PauseInterval> {
    PauseLogRepository::new(db).open(request).await
}

pub async fn close_pause(db: &Database, id: i64) -> Result<PauseInterval> {
    PauseLogRepository::new(db).close(id).await
}

pub async fn close_active(db: &Database, target: RacerCheckpointRequest) -> Result<PauseInterval> {
    PauseLogRepository::new(db)
        .close_active(target.racer_id, target.checkpoint_id)
        .await
}

pub async fn invalidate(db: &Database, target: RacerCheckpointRequest) -> Result<u64> {
    PauseLogRepository::new(db)
        .invalidate(target.racer_id, target.checkpoint_id)
        .await
}

pub async fn record_custom(db: &Database, request: &CustomPauseRequest) -> Result<PauseInterval> {
    PauseLogRepository::new(db).record_custom(request).await
}

pub async fn list_for_checkpoint(db: &Database, checkpoint_id: i64) -> Result<Vec<PauseInterval>> {
    PauseLogRepository::new(db)
        .list_for_checkpoint(checkpoint_id)
        .await
}

pub async fn checkpoint_board(
    db: &Database,
    checkpoint_id: i64,
) -> Result<Vec<CheckpointRacerStatus>> {
    PauseLogRepository::new(db)
        .checkpoint_board(checkpoint_id)
        .await
}

pub async fn paused_total(db: &Database, target: RacerCheckpointRequest) -> Result<PausedTotal> {
    let paused_seconds = PauseLogRepository::new(db)
        .paused_seconds(target.racer_id, target.checkpoint_id)
        .await?;

    Ok(PausedTotal {
        racer_id: target.racer_id,
        checkpoint_id: target.checkpoint_id,
        paused_seconds,
    })
}

pub async fn sweep(db: &Database) -> Result<u64> {
    PauseLogRepository::new(db).sweep().await
}
