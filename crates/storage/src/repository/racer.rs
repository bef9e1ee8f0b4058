use std::collections::BTreeSet;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::{info, warn};

use crate::Database;
use crate::dto::racer::{CreateRacerRequest, TimeOverrideRequest, UpdateRacerRequest};
use crate::error::{Result, StorageError};
use crate::models::Racer;

pub struct RacerRepository<'a> {
    db: &'a Database,
}

impl<'a> RacerRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List all racers, newest first
    pub async fn list(&self) -> Result<Vec<Racer>> {
        let racers = sqlx::query_as::<_, Racer>("SELECT * FROM racers ORDER BY id DESC")
            .fetch_all(self.db.pool())
            .await?;

        Ok(racers)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Racer> {
        let mut conn = self.db.pool().acquire().await?;
        fetch_racer(&mut conn, id).await
    }

    /// Find the racer holding an assigned number
    pub async fn find_by_number(&self, racer_no: i64) -> Result<Racer> {
        if racer_no <= 0 {
            return Err(StorageError::NotFound);
        }

        let racer = sqlx::query_as::<_, Racer>("SELECT * FROM racers WHERE racer_no = ?")
            .bind(racer_no)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(racer)
    }

    /// Case-insensitive name search; an all-digit query also matches the racer number
    pub async fn search(&self, query: &str) -> Result<Vec<Racer>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list().await;
        }

        let pattern = format!("%{}%", query.to_lowercase());
        let number = if query.chars().all(|c| c.is_ascii_digit()) {
            query.parse::<i64>().ok()
        } else {
            None
        };

        let racers = sqlx::query_as::<_, Racer>(
            r#"
            SELECT * FROM racers
            WHERE lower(first_name) LIKE ?1
               OR lower(last_name) LIKE ?1
               OR (?2 IS NOT NULL AND racer_no = ?2)
            ORDER BY id DESC
            "#,
        )
        .bind(pattern)
        .bind(number)
        .fetch_all(self.db.pool())
        .await?;

        Ok(racers)
    }

    /// Racers without a start time, by number then id
    pub async fn waiting(&self) -> Result<Vec<Racer>> {
        let racers = sqlx::query_as::<_, Racer>(
            "SELECT * FROM racers WHERE start_time IS NULL ORDER BY racer_no, id",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(racers)
    }

    /// Started but not finished, earliest start first
    pub async fn on_track(&self) -> Result<Vec<Racer>> {
        let racers = sqlx::query_as::<_, Racer>(
            r#"
            SELECT * FROM racers
            WHERE start_time IS NOT NULL AND finish_time IS NULL
            ORDER BY start_time ASC, id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(racers)
    }

    /// Finished racers, latest finish first
    pub async fn finishers(&self) -> Result<Vec<Racer>> {
        let racers = sqlx::query_as::<_, Racer>(
            r#"
            SELECT * FROM racers
            WHERE start_time IS NOT NULL AND finish_time IS NOT NULL
            ORDER BY finish_time DESC, id DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(racers)
    }

    pub async fn create(&self, req: &CreateRacerRequest) -> Result<Racer> {
        let mut created = self.create_many(std::slice::from_ref(req)).await?;
        created.pop().ok_or(StorageError::NotFound)
    }

    /// Register a batch of racers atomically. The number check runs over the
    /// whole batch after the inserts; any duplicate rolls back every row.
    pub async fn create_many(&self, requests: &[CreateRacerRequest]) -> Result<Vec<Racer>> {
        let numbers = requests
            .iter()
            .map(CreateRacerRequest::racer_no)
            .collect::<Result<Vec<i64>>>()?;

        let now = self.db.now();
        let mut tx = self.db.pool().begin().await?;
        let mut ids = Vec::with_capacity(requests.len());

        for (req, racer_no) in requests.iter().zip(numbers) {
            let result = sqlx::query(
                r#"
                INSERT INTO racers (first_name, last_name, age, gender, racer_no, email, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(req.first_name.trim())
            .bind(req.last_name.trim())
            .bind(req.age)
            .bind(req.gender)
            .bind(racer_no)
            .bind(normalize_email(req.email.as_deref()))
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::from(e).or_duplicate_racer_no(racer_no))?;

            ids.push(result.last_insert_rowid());
        }

        ensure_unique_numbers(&mut tx, &ids).await?;
        let racers = fetch_racers(&mut tx, &ids).await?;
        tx.commit().await?;

        for racer in &racers {
            info!(racer_id = racer.id, racer_no = racer.racer_no, "registered racer");
        }

        Ok(racers)
    }

    pub async fn update(&self, id: i64, req: &UpdateRacerRequest) -> Result<Racer> {
        let racer_no = req.racer_no()?;

        let mut tx = self.db.pool().begin().await?;
        let existing = fetch_racer(&mut tx, id).await?;

        let first_name = req
            .first_name
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.first_name);
        let last_name = req
            .last_name
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.last_name);
        let age = req.age.unwrap_or(existing.age);
        let gender = req.gender.unwrap_or(existing.gender);
        let racer_no = racer_no.unwrap_or(existing.racer_no);
        let email = match req.email.as_deref() {
            Some(email) => normalize_email(Some(email)),
            None => existing.email.clone(),
        };

        sqlx::query(
            r#"
            UPDATE racers
            SET first_name = ?, last_name = ?, age = ?, gender = ?, racer_no = ?, email = ?
            WHERE id = ?
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(age)
        .bind(gender)
        .bind(racer_no)
        .bind(email)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::from(e).or_duplicate_racer_no(racer_no))?;

        ensure_unique_numbers(&mut tx, &[id]).await?;
        let racer = fetch_racer(&mut tx, id).await?;
        tx.commit().await?;

        if racer.racer_no != existing.racer_no {
            info!(
                racer_id = id,
                from = existing.racer_no,
                to = racer.racer_no,
                "racer number changed by edit"
            );
        }

        Ok(racer)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM racers WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        info!(racer_id = id, "deleted racer");
        Ok(())
    }

    /// Record the start at the current time. Requires a number and no prior start.
    pub async fn start(&self, id: i64) -> Result<Racer> {
        let mut tx = self.db.pool().begin().await?;
        let racer = fetch_racer(&mut tx, id).await?;

        if !racer.has_number() {
            warn!(racer_id = id, "start rejected: no racer number");
            return Err(StorageError::user(
                "Cannot start a racer with number 0. Please assign a number first.",
            ));
        }
        if racer.start_time.is_some() {
            warn!(racer_id = id, "start rejected: already started");
            return Err(StorageError::user("This racer has already started."));
        }

        let now = self.db.now();
        sqlx::query("UPDATE racers SET start_time = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let racer = fetch_racer(&mut tx, id).await?;
        tx.commit().await?;

        info!(racer_id = id, racer_no = racer.racer_no, start = %now, "racer started");
        Ok(racer)
    }

    /// Record the finish at the current time. Requires a start and no prior finish.
    pub async fn finish_now(&self, id: i64) -> Result<Racer> {
        let mut tx = self.db.pool().begin().await?;
        let racer = fetch_racer(&mut tx, id).await?;

        if racer.start_time.is_none() {
            warn!(racer_id = id, "finish rejected: not started");
            return Err(StorageError::user("This racer has not started yet."));
        }
        if racer.finish_time.is_some() {
            warn!(racer_id = id, "finish rejected: already finished");
            return Err(StorageError::user("This racer already has a finish time."));
        }

        let now = self.db.now();
        sqlx::query("UPDATE racers SET finish_time = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let racer = fetch_racer(&mut tx, id).await?;
        tx.commit().await?;

        info!(racer_id = id, racer_no = racer.racer_no, finish = %now, "racer finished");
        Ok(racer)
    }

    /// Overwrite start and finish unconditionally; the set-once checks of
    /// `start` and `finish_now` do not apply here.
    pub async fn apply_times(&self, id: i64, req: &TimeOverrideRequest) -> Result<Racer> {
        let mut tx = self.db.pool().begin().await?;
        fetch_racer(&mut tx, id).await?;

        sqlx::query("UPDATE racers SET start_time = ?, finish_time = ? WHERE id = ?")
            .bind(req.start_time)
            .bind(req.finish_time)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let racer = fetch_racer(&mut tx, id).await?;
        tx.commit().await?;

        info!(
            racer_id = id,
            start = ?racer.start_time,
            finish = ?racer.finish_time,
            "racer times overridden"
        );
        Ok(racer)
    }
}

fn normalize_email(email: Option<&str>) -> Option<String> {
    email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(String::from)
}

pub(crate) async fn fetch_racer(conn: &mut SqliteConnection, id: i64) -> Result<Racer> {
    let racer = sqlx::query_as::<_, Racer>("SELECT * FROM racers WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(StorageError::NotFound)?;

    Ok(racer)
}

/// Load racers by id, in id order. Fails if any id is unknown.
pub(crate) async fn fetch_racers(conn: &mut SqliteConnection, ids: &[i64]) -> Result<Vec<Racer>> {
    let wanted: BTreeSet<i64> = ids.iter().copied().collect();
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM racers WHERE id IN (");
    let mut separated = query.separated(", ");
    for id in &wanted {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY id");

    let racers = query.build_query_as::<Racer>().fetch_all(conn).await?;

    if racers.len() != wanted.len() {
        return Err(StorageError::NotFound);
    }

    Ok(racers)
}

/// Fails if any of `ids` holds a positive number that another racer also holds.
pub(crate) async fn ensure_unique_numbers(conn: &mut SqliteConnection, ids: &[i64]) -> Result<()> {
    for &id in ids {
        let racer_no: i64 = sqlx::query_scalar("SELECT racer_no FROM racers WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(StorageError::NotFound)?;

        if racer_no <= 0 {
            continue;
        }

        let duplicates: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM racers WHERE racer_no = ? AND id != ?")
                .bind(racer_no)
                .bind(id)
                .fetch_one(&mut *conn)
                .await?;

        if duplicates > 0 {
            warn!(racer_id = id, racer_no, "duplicate racer number");
            return Err(StorageError::duplicate_racer_no(racer_no));
        }
    }

    Ok(())
}
