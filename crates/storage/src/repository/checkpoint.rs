use tracing::info;

use crate::Database;
use crate::dto::checkpoint::{CreateCheckpointRequest, DEFAULT_CHECKPOINT_SEQUENCE};
use crate::error::{Result, StorageError};
use crate::models::Checkpoint;

pub struct CheckpointRepository<'a> {
    db: &'a Database,
}

impl<'a> CheckpointRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List checkpoints in course order
    pub async fn list(&self) -> Result<Vec<Checkpoint>> {
        let checkpoints =
            sqlx::query_as::<_, Checkpoint>("SELECT * FROM checkpoints ORDER BY sequence, id")
                .fetch_all(self.db.pool())
                .await?;

        Ok(checkpoints)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Checkpoint> {
        let checkpoint = sqlx::query_as::<_, Checkpoint>("SELECT * FROM checkpoints WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(checkpoint)
    }

    pub async fn create(&self, req: &CreateCheckpointRequest) -> Result<Checkpoint> {
        let result = sqlx::query("INSERT INTO checkpoints (name, sequence) VALUES (?, ?)")
            .bind(req.name.trim())
            .bind(req.sequence.unwrap_or(DEFAULT_CHECKPOINT_SEQUENCE))
            .execute(self.db.pool())
            .await?;

        let checkpoint = self.find_by_id(result.last_insert_rowid()).await?;
        info!(checkpoint_id = checkpoint.id, name = %checkpoint.name, "checkpoint created");
        Ok(checkpoint)
    }

    /// Delete a checkpoint together with its pauses
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM checkpoints WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
