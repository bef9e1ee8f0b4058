#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use storage::Database;
use tempfile::TempDir;
use storage::clock::ManualClock;
use storage::dto::racer::{CreateRacerRequest, RacerNumberInput};
use storage::models::{Gender, Racer};
use storage::repository::racer::RacerRepository;

pub fn race_day(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

pub async fn setup() -> (Database, ManualClock) {
    let clock = ManualClock::new(race_day(9, 0, 0));
    let db = Database::in_memory(Arc::new(clock.clone()))
        .await
        .expect("in-memory database");
    (db, clock)
}

/// File-backed database with several pooled connections, so concurrent
/// transactions really overlap. Keep the directory alive for the test.
pub async fn setup_file(max_connections: u32) -> (Database, ManualClock, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}", dir.path().join("race.db").display());
    let clock = ManualClock::new(race_day(9, 0, 0));
    let db = Database::connect(&url, max_connections, Arc::new(clock.clone()))
        .await
        .expect("file database");
    db.run_migrations().await.expect("migrations");
    (db, clock, dir)
}

pub fn registration(first_name: &str, racer_no: Option<i64>) -> CreateRacerRequest {
    CreateRacerRequest {
        first_name: first_name.to_string(),
        last_name: "Runner".to_string(),
        age: 25,
        gender: Gender::Male,
        racer_no: racer_no.map(RacerNumberInput::from),
        email: None,
    }
}

pub async fn register(db: &Database, first_name: &str, racer_no: Option<i64>) -> Racer {
    RacerRepository::new(db)
        .create(&registration(first_name, racer_no))
        .await
        .expect("register racer")
}

pub async fn numbers(db: &Database) -> Vec<i64> {
    let mut numbers: Vec<i64> = RacerRepository::new(db)
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.racer_no)
        .filter(|n| *n > 0)
        .collect();
    numbers.sort_unstable();
    numbers
}
