use chrono::Duration;
use sqlx::SqliteConnection;
use tracing::{info, warn};

use super::racer::fetch_racer;
use crate::Database;
use crate::dto::pause_log::{CheckpointRacerStatus, CustomPauseRequest, OpenPauseRequest};
use crate::error::{Result, StorageError};
use crate::models::pause_log::{MAX_CUSTOM_PAUSE_SECS, stale_cutoff};
use crate::models::PauseInterval;

pub struct PauseLogRepository<'a> {
    db: &'a Database,
}

impl<'a> PauseLogRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<PauseInterval> {
        let mut conn = self.db.pool().acquire().await?;
        fetch_interval(&mut conn, id).await
    }

    /// Start a pause now. A racer has at most one running pause per checkpoint.
    pub async fn open(&self, req: &OpenPauseRequest) -> Result<PauseInterval> {
        let mut tx = self.db.pool().begin().await?;
        fetch_racer(&mut tx, req.racer_id).await?;
        ensure_checkpoint(&mut tx, req.checkpoint_id).await?;

        if find_open(&mut tx, req.racer_id, req.checkpoint_id).await?.is_some() {
            warn!(racer_id = req.racer_id, checkpoint_id = req.checkpoint_id, "pause already running");
            return Err(StorageError::user("This racer already has an active pause here."));
        }

        let now = self.db.now();
        let result = sqlx::query(
            r#"
            INSERT INTO pause_logs (racer_id, checkpoint_id, start_time, started_by, session_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(req.racer_id)
        .bind(req.checkpoint_id)
        .bind(now)
        .bind(req.started_by.as_deref())
        .bind(req.session_id.as_deref())
        .execute(&mut *tx)
        .await?;

        let interval = fetch_interval(&mut tx, result.last_insert_rowid()).await?;
        tx.commit().await?;

        info!(
            pause_id = interval.id,
            racer_id = interval.racer_id,
            checkpoint_id = interval.checkpoint_id,
            "pause started"
        );
        Ok(interval)
    }

    /// End a running pause now.
    pub async fn close(&self, id: i64) -> Result<PauseInterval> {
        let mut tx = self.db.pool().begin().await?;
        let interval = fetch_interval(&mut tx, id).await?;

        if !interval.is_open() {
            return Err(StorageError::user("This pause has already ended."));
        }

        let interval = close_interval(&mut tx, id, self.db.now()).await?;
        tx.commit().await?;

        info!(
            pause_id = id,
            racer_id = interval.racer_id,
            duration = interval.duration_seconds(),
            "pause ended"
        );
        Ok(interval)
    }

    /// End whatever pause the racer has running at the checkpoint.
    pub async fn close_active(&self, racer_id: i64, checkpoint_id: i64) -> Result<PauseInterval> {
        let open = {
            let mut conn = self.db.pool().acquire().await?;
            find_open(&mut conn, racer_id, checkpoint_id).await?
        };

        match open {
            Some(interval) => self.close(interval.id).await,
            None => Err(StorageError::user("This racer has no active pause here.")),
        }
    }

    /// Mark every pause of the racer at the checkpoint invalid, ending a running one first.
    pub async fn invalidate(&self, racer_id: i64, checkpoint_id: i64) -> Result<u64> {
        let mut tx = self.db.pool().begin().await?;
        let affected = invalidate_all(&mut tx, racer_id, checkpoint_id, self.db.now()).await?;
        tx.commit().await?;

        info!(racer_id, checkpoint_id, affected, "pauses invalidated");
        Ok(affected)
    }

    /// Replace the racer's pauses at the checkpoint with one closed pause of
    /// `seconds`, ending now.
    pub async fn record_custom(&self, req: &CustomPauseRequest) -> Result<PauseInterval> {
        if req.seconds < 0 {
            return Err(StorageError::validation("Pause duration cannot be negative."));
        }
        if req.seconds > MAX_CUSTOM_PAUSE_SECS {
            return Err(StorageError::validation(format!(
                "Pause duration cannot be longer than {MAX_CUSTOM_PAUSE_SECS} seconds."
            )));
        }

        let mut tx = self.db.pool().begin().await?;
        fetch_racer(&mut tx, req.racer_id).await?;
        ensure_checkpoint(&mut tx, req.checkpoint_id).await?;

        let now = self.db.now();
        invalidate_all(&mut tx, req.racer_id, req.checkpoint_id, now).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO pause_logs
                (racer_id, checkpoint_id, start_time, end_time, started_by, is_custom)
            VALUES (?, ?, ?, ?, ?, 1)
            "#,
        )
        .bind(req.racer_id)
        .bind(req.checkpoint_id)
        .bind(now - Duration::seconds(req.seconds))
        .bind(now)
        .bind(req.started_by.as_deref())
        .execute(&mut *tx)
        .await?;

        let interval = fetch_interval(&mut tx, result.last_insert_rowid()).await?;
        tx.commit().await?;

        info!(
            pause_id = interval.id,
            racer_id = req.racer_id,
            checkpoint_id = req.checkpoint_id,
            seconds = req.seconds,
            "custom pause recorded"
        );
        Ok(interval)
    }

    /// All pauses recorded at a checkpoint, including invalidated ones
    pub async fn list_for_checkpoint(&self, checkpoint_id: i64) -> Result<Vec<PauseInterval>> {
        let intervals = sqlx::query_as::<_, PauseInterval>(
            "SELECT * FROM pause_logs WHERE checkpoint_id = ? ORDER BY start_time DESC, id DESC",
        )
        .bind(checkpoint_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(intervals)
    }

    /// Seconds of valid pauses the racer spent at the checkpoint
    pub async fn paused_seconds(&self, racer_id: i64, checkpoint_id: i64) -> Result<i64> {
        let intervals = sqlx::query_as::<_, PauseInterval>(
            "SELECT * FROM pause_logs WHERE racer_id = ? AND checkpoint_id = ? AND is_invalid = 0",
        )
        .bind(racer_id)
        .bind(checkpoint_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(intervals.iter().map(PauseInterval::duration_seconds).sum())
    }

    /// On-track racers with their pause state at one checkpoint
    pub async fn checkpoint_board(&self, checkpoint_id: i64) -> Result<Vec<CheckpointRacerStatus>> {
        let mut conn = self.db.pool().acquire().await?;
        ensure_checkpoint(&mut conn, checkpoint_id).await?;

        let racers = sqlx::query_as::<_, crate::models::Racer>(
            r#"
            SELECT * FROM racers
            WHERE start_time IS NOT NULL AND finish_time IS NULL
            ORDER BY start_time ASC, id ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let intervals = sqlx::query_as::<_, PauseInterval>(
            "SELECT * FROM pause_logs WHERE checkpoint_id = ? AND is_invalid = 0 ORDER BY id",
        )
        .bind(checkpoint_id)
        .fetch_all(&mut *conn)
        .await?;

        let board = racers
            .into_iter()
            .map(|racer| {
                let racer_id = racer.id;
                let own = intervals.iter().filter(|p| p.racer_id == racer_id);
                let paused_seconds = own.clone().map(PauseInterval::duration_seconds).sum();
                let active_pause = own.filter(|p| p.is_open()).last().cloned().map(Into::into);
                CheckpointRacerStatus {
                    racer_id,
                    racer_no: racer.racer_no,
                    first_name: racer.first_name,
                    last_name: racer.last_name,
                    paused_seconds,
                    active_pause,
                }
            })
            .collect();

        Ok(board)
    }

    /// Delete pauses still open a minute or more after they started.
    pub async fn sweep(&self) -> Result<u64> {
        let cutoff = stale_cutoff(self.db.now());
        let result =
            sqlx::query("DELETE FROM pause_logs WHERE end_time IS NULL AND start_time <= ?")
                .bind(cutoff)
                .execute(self.db.pool())
                .await?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            info!(deleted, %cutoff, "swept stale pauses");
        }
        Ok(deleted)
    }
}

async fn fetch_interval(conn: &mut SqliteConnection, id: i64) -> Result<PauseInterval> {
    let interval = sqlx::query_as::<_, PauseInterval>("SELECT * FROM pause_logs WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(StorageError::NotFound)?;

    Ok(interval)
}

async fn find_open(
    conn: &mut SqliteConnection,
    racer_id: i64,
    checkpoint_id: i64,
) -> Result<Option<PauseInterval>> {
    let interval = sqlx::query_as::<_, PauseInterval>(
        r#"
        SELECT * FROM pause_logs
        WHERE racer_id = ? AND checkpoint_id = ? AND end_time IS NULL AND is_invalid = 0
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(racer_id)
    .bind(checkpoint_id)
    .fetch_optional(conn)
    .await?;

    Ok(interval)
}

async fn ensure_checkpoint(conn: &mut SqliteConnection, checkpoint_id: i64) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM checkpoints WHERE id = ?")
        .bind(checkpoint_id)
        .fetch_one(conn)
        .await?;

    if count == 0 {
        return Err(StorageError::NotFound);
    }
    Ok(())
}

async fn close_interval(
    conn: &mut SqliteConnection,
    id: i64,
    now: chrono::NaiveDateTime,
) -> Result<PauseInterval> {
    sqlx::query("UPDATE pause_logs SET end_time = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    fetch_interval(conn, id).await
}

async fn invalidate_all(
    conn: &mut SqliteConnection,
    racer_id: i64,
    checkpoint_id: i64,
    now: chrono::NaiveDateTime,
) -> Result<u64> {
    sqlx::query(
        r#"
        UPDATE pause_logs SET end_time = ?
        WHERE racer_id = ? AND checkpoint_id = ? AND end_time IS NULL
        "#,
    )
    .bind(now)
    .bind(racer_id)
    .bind(checkpoint_id)
    .execute(&mut *conn)
    .await?;

    let result = sqlx::query(
        "UPDATE pause_logs SET is_invalid = 1 WHERE racer_id = ? AND checkpoint_id = ? AND is_invalid = 0",
    )
    .bind(racer_id)
    .bind(checkpoint_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
