use storage::{
    Database, dto::checkpoint::CreateCheckpointRequest, error::Result, models::Checkpoint,
    repository::checkpoint::CheckpointRepository,
};

pub async fn list_checkpoints(db: &Database) -> Result<Vec<Checkpoint>> {
    CheckpointRepository::new(db).list().await
}

pub async fn get_checkpoint(db: &Database, id: i64) -> Result<Checkpoint> {
    CheckpointRepository::new(db).find_by_id(id).await
}

pub async fn create_checkpoint(
    db: &Database,
    request: &CreateCheckpointRequest,
) -> Result<Checkpoint> {
    CheckpointRepository::new(db).create(request).await
}

pub async fn delete_checkpoint(db: &Database, id: i64) -> Result<()> {
    CheckpointRepository::new(db).delete(id).await
}
