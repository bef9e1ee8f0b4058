use sqlx::SqliteConnection;
use tracing::{debug, info, warn};

use super::racer::fetch_racer;
use crate::Database;
use crate::dto::common::PaginationParams;
use crate::dto::finish_log::FinishLogResponse;
use crate::error::{Result, StorageError};
use crate::models::finish_log::{number_from_reference, number_to_resolve};
use crate::models::{FinishLogEntry, Racer};

const FINISH_LOG_VIEW: &str = r#"
    SELECT f.id, f.time, f.racer_no_input, f.racer_id, f.assigned, f.assigned_time,
           r.first_name, r.last_name, r.age, r.gender
    FROM finish_log f
    LEFT JOIN racers r ON r.id = f.racer_id
"#;

pub struct FinishLogRepository<'a> {
    db: &'a Database,
}

impl<'a> FinishLogRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Capture a finish-line crossing at the current time. No racer is resolved yet.
    pub async fn log_now(&self) -> Result<i64> {
        let now = self.db.now();
        let result = sqlx::query("INSERT INTO finish_log (time, assigned) VALUES (?, 0)")
            .bind(now)
            .execute(self.db.pool())
            .await?;

        let id = result.last_insert_rowid();
        info!(entry_id = id, time = %now, "finish time logged");
        Ok(id)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<FinishLogEntry> {
        let mut conn = self.db.pool().acquire().await?;
        fetch_entry(&mut conn, id).await
    }

    pub async fn view(&self, id: i64) -> Result<FinishLogResponse> {
        let sql = format!("{FINISH_LOG_VIEW} WHERE f.id = ?");
        let entry = sqlx::query_as::<_, FinishLogResponse>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(entry)
    }

    /// Entries newest first, with the resolved racer's details
    pub async fn list(&self, page: PaginationParams) -> Result<(Vec<FinishLogResponse>, i64)> {
        page.validate()?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM finish_log")
            .fetch_one(self.db.pool())
            .await?;

        let sql = format!("{FINISH_LOG_VIEW} ORDER BY f.time DESC, f.id DESC LIMIT ? OFFSET ?");
        let entries = sqlx::query_as::<_, FinishLogResponse>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.db.pool())
            .await?;

        Ok((entries, total))
    }

    /// Store the typed number and re-resolve the racer from it.
    /// An unknown number clears the racer instead of failing.
    pub async fn set_candidate_number(
        &self,
        id: i64,
        racer_no: Option<i64>,
    ) -> Result<FinishLogEntry> {
        let mut tx = self.db.pool().begin().await?;
        fetch_entry(&mut tx, id).await?;

        let racer_id = match number_to_resolve(racer_no) {
            Some(number) => find_racer_by_number(&mut tx, number).await?.map(|r| r.id),
            None => None,
        };

        sqlx::query("UPDATE finish_log SET racer_no_input = ?, racer_id = ? WHERE id = ?")
            .bind(racer_no)
            .bind(racer_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let entry = fetch_entry(&mut tx, id).await?;
        tx.commit().await?;

        debug!(entry_id = id, ?racer_no, ?racer_id, "finish log number resolved");
        Ok(entry)
    }

    /// Point the entry at a racer directly; the typed number follows the racer.
    pub async fn set_racer(&self, id: i64, racer_id: Option<i64>) -> Result<FinishLogEntry> {
        let mut tx = self.db.pool().begin().await?;
        fetch_entry(&mut tx, id).await?;

        let racer = match racer_id {
            Some(racer_id) => Some(fetch_racer(&mut tx, racer_id).await?),
            None => None,
        };
        let racer_no = number_from_reference(racer.as_ref());

        sqlx::query("UPDATE finish_log SET racer_id = ?, racer_no_input = ? WHERE id = ?")
            .bind(racer_id)
            .bind(racer_no)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let entry = fetch_entry(&mut tx, id).await?;
        tx.commit().await?;

        debug!(entry_id = id, ?racer_id, ?racer_no, "finish log racer set");
        Ok(entry)
    }

    /// Commit the entry's timestamp as the resolved racer's finish time.
    /// Entry and racer are updated together or not at all.
    pub async fn assign(&self, id: i64) -> Result<FinishLogEntry> {
        let mut tx = self.db.pool().begin().await?;
        let entry = fetch_entry(&mut tx, id).await?;

        if entry.assigned {
            warn!(entry_id = id, "assign rejected: entry already assigned");
            return Err(StorageError::user("This log row is already assigned."));
        }

        let racer = match entry.racer_id {
            Some(racer_id) => Some(fetch_racer(&mut tx, racer_id).await?),
            None => match number_to_resolve(entry.racer_no_input) {
                Some(number) => find_racer_by_number(&mut tx, number).await?,
                None => None,
            },
        };

        let Some(racer) = racer else {
            warn!(entry_id = id, "assign rejected: no racer resolved");
            return Err(StorageError::user("No racer resolved for this log row."));
        };

        if racer.finish_time.is_some() {
            warn!(entry_id = id, racer_id = racer.id, "assign rejected: racer already finished");
            return Err(StorageError::user("This racer already has a finish time."));
        }

        sqlx::query("UPDATE racers SET finish_time = ? WHERE id = ?")
            .bind(entry.time)
            .bind(racer.id)
            .execute(&mut *tx)
            .await?;

        let now = self.db.now();
        sqlx::query(
            r#"
            UPDATE finish_log
            SET assigned = 1, assigned_time = ?, racer_id = ?, racer_no_input = ?
            WHERE id = ?
            "#,
        )
        .bind(now)
        .bind(racer.id)
        .bind(racer.racer_no)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let entry = fetch_entry(&mut tx, id).await?;
        tx.commit().await?;

        info!(
            entry_id = id,
            racer_id = racer.id,
            racer_no = racer.racer_no,
            finish = %entry.time,
            "finish time assigned"
        );
        Ok(entry)
    }
}

async fn fetch_entry(conn: &mut SqliteConnection, id: i64) -> Result<FinishLogEntry> {
    let entry = sqlx::query_as::<_, FinishLogEntry>("SELECT * FROM finish_log WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(StorageError::NotFound)?;

    Ok(entry)
}

async fn find_racer_by_number(conn: &mut SqliteConnection, racer_no: i64) -> Result<Option<Racer>> {
    let racer = sqlx::query_as::<_, Racer>("SELECT * FROM racers WHERE racer_no = ? LIMIT 1")
        .bind(racer_no)
        .fetch_optional(conn)
        .await?;

    Ok(racer)
}
