pub mod clock;
pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::sync::{Mutex, MutexGuard};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;

/// Shared handle to the race database.
///
/// Besides the pool it carries the clock every timestamp is read from and the
/// allocation lock that serializes racer-number assignment. Clones share all
/// three.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    allocation: Arc<Mutex<()>>,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        Self::connect(database_url, max_connections, Arc::new(SystemClock)).await
    }

    /// Like [`Database::new`] but reading timestamps from `clock`.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        Ok(Self::from_pool(pool, clock))
    }

    /// Private in-memory database with the schema applied. The single
    /// connection is pinned so the data lives as long as the handle.
    pub async fn in_memory(clock: Arc<dyn Clock>) -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self::from_pool(pool, clock);
        db.run_migrations().await?;
        Ok(db)
    }

    pub fn from_pool(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            clock,
            allocation: Arc::new(Mutex::new(())),
        }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Enters the racer-number allocation critical section. Hold the guard
    /// for the whole read-modify-write, including the commit.
    pub(crate) async fn lock_allocation(&self) -> MutexGuard<'_, ()> {
        self.allocation.lock().await
    }
}
