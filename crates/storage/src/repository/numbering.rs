use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use super::racer::{ensure_unique_numbers, fetch_racers};
use crate::Database;
use crate::dto::racer::{MAX_RACER_NO, NumberAssignment};
use crate::error::{Result, StorageError};
use crate::models::Racer;

/// Hands out racer numbers to unassigned racers.
///
/// Both strategies run inside the database's allocation lock for the whole
/// read-then-write sequence, so concurrent callers never compute the same
/// number. Racers that already hold a number are left alone.
pub struct NumberingAllocator<'a> {
    db: &'a Database,
}

impl<'a> NumberingAllocator<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Append after the current maximum: `max + 1, max + 2, ...` in creation order.
    pub async fn assign_next(&self, racer_ids: &[i64]) -> Result<Vec<NumberAssignment>> {
        let _guard = self.db.lock_allocation().await;
        let mut tx = self.db.pool().begin().await?;

        let mut candidates: Vec<Racer> = fetch_racers(&mut tx, racer_ids)
            .await?
            .into_iter()
            .filter(|r| r.racer_no == 0)
            .collect();
        if candidates.is_empty() {
            debug!("assign_next: nothing to number");
            return Ok(Vec::new());
        }
        candidates.sort_by_key(|r| (r.created_at, r.id));

        let max: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(racer_no), 0) FROM racers")
            .fetch_one(&mut *tx)
            .await?;

        let mut assignments = Vec::with_capacity(candidates.len());
        let mut racer_no = max;
        for racer in &candidates {
            racer_no = next_number(racer_no)?;
            write_number(&mut tx, racer.id, racer_no).await?;
            assignments.push(NumberAssignment {
                racer_id: racer.id,
                racer_no,
            });
        }

        tx.commit().await?;

        info!(
            count = assignments.len(),
            first = max + 1,
            last = racer_no,
            "assigned sequential racer numbers"
        );
        Ok(assignments)
    }

    /// Fill the smallest unused positive numbers, candidates in id order.
    pub async fn assign_smallest_unused(&self, racer_ids: &[i64]) -> Result<Vec<NumberAssignment>> {
        let _guard = self.db.lock_allocation().await;
        let mut tx = self.db.pool().begin().await?;

        // fetch_racers returns rows in id order
        let candidates: Vec<Racer> = fetch_racers(&mut tx, racer_ids)
            .await?
            .into_iter()
            .filter(|r| r.racer_no <= 0)
            .collect();
        if candidates.is_empty() {
            debug!("assign_smallest_unused: nothing to number");
            return Ok(Vec::new());
        }

        let used: Vec<i64> = sqlx::query_scalar("SELECT racer_no FROM racers WHERE racer_no > 0")
            .fetch_all(&mut *tx)
            .await?;
        let mut used: BTreeSet<i64> = used.into_iter().collect();

        let mut assignments = Vec::with_capacity(candidates.len());
        let mut next = 1;
        for racer in &candidates {
            while used.contains(&next) {
                next = next_number(next)?;
            }
            write_number(&mut tx, racer.id, next).await?;
            used.insert(next);
            assignments.push(NumberAssignment {
                racer_id: racer.id,
                racer_no: next,
            });
        }

        tx.commit().await?;

        info!(
            count = assignments.len(),
            numbers = ?assignments.iter().map(|a| a.racer_no).collect::<Vec<_>>(),
            "filled racer number gaps"
        );
        Ok(assignments)
    }
}

/// The number after `current`, or a validation error once the range is used up.
fn next_number(current: i64) -> Result<i64> {
    current
        .checked_add(1)
        .filter(|n| *n <= MAX_RACER_NO)
        .ok_or_else(|| {
            warn!(current, "racer numbers exhausted");
            StorageError::validation(format!(
                "No racer number left: numbers cannot be greater than {MAX_RACER_NO}."
            ))
        })
}

async fn write_number(conn: &mut sqlx::SqliteConnection, racer_id: i64, racer_no: i64) -> Result<()> {
    let result = sqlx::query("UPDATE racers SET racer_no = ? WHERE id = ? AND racer_no <= 0")
        .bind(racer_no)
        .bind(racer_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| StorageError::from(e).or_duplicate_racer_no(racer_no))?;

    if result.rows_affected() == 0 {
        return Err(StorageError::NotFound);
    }

    ensure_unique_numbers(conn, &[racer_id]).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::NaiveDate;

    use super::*;
    use crate::clock::ManualClock;
    use crate::dto::racer::CreateRacerRequest;
    use crate::models::Gender;
    use crate::repository::racer::RacerRepository;

    async fn setup() -> Database {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Database::in_memory(Arc::new(ManualClock::new(start)))
            .await
            .unwrap()
    }

    async fn unnumbered(db: &Database) -> i64 {
        let req = CreateRacerRequest {
            first_name: "Una".to_string(),
            last_name: "Signed".to_string(),
            age: 30,
            gender: Gender::Female,
            racer_no: None,
            email: None,
        };
        RacerRepository::new(db).create(&req).await.unwrap().id
    }

    #[test]
    fn test_next_number_respects_cap() {
        assert_eq!(next_number(0).unwrap(), 1);
        assert_eq!(next_number(MAX_RACER_NO - 1).unwrap(), MAX_RACER_NO);
        assert!(matches!(
            next_number(MAX_RACER_NO),
            Err(StorageError::Validation(_))
        ));
        assert!(matches!(next_number(i64::MAX), Err(StorageError::Validation(_))));
    }

    #[tokio::test]
    async fn test_allocation_waits_for_lock_holder() {
        let db = setup().await;
        let id = unnumbered(&db).await;

        let guard = db.lock_allocation().await;
        let task = {
            let db = db.clone();
            tokio::spawn(async move { NumberingAllocator::new(&db).assign_next(&[id]).await })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!task.is_finished());
        let racer = RacerRepository::new(&db).find_by_id(id).await.unwrap();
        assert_eq!(racer.racer_no, 0);

        drop(guard);
        let assigned = task.await.unwrap().unwrap();
        assert_eq!(assigned, vec![NumberAssignment { racer_id: id, racer_no: 1 }]);
    }

    #[tokio::test]
    async fn test_fill_waits_for_lock_holder() {
        let db = setup().await;
        let id = unnumbered(&db).await;

        let guard = db.lock_allocation().await;
        let task = {
            let db = db.clone();
            tokio::spawn(async move {
                NumberingAllocator::new(&db)
                    .assign_smallest_unused(&[id])
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!task.is_finished());

        drop(guard);
        assert_eq!(task.await.unwrap().unwrap()[0].racer_no, 1);
    }
}
