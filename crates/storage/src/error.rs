use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    /// Data-integrity failure: malformed or duplicate racer number.
    #[error("{0}")]
    Validation(String),

    /// Operation-sequencing failure the operator can correct.
    #[error("{0}")]
    User(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn user(msg: impl Into<String>) -> Self {
        Self::User(msg.into())
    }

    pub fn duplicate_racer_no(racer_no: i64) -> Self {
        Self::Validation(format!("Racer number {} is already used.", racer_no))
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e)) if e.is_unique_violation()
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e)) if e.is_foreign_key_violation()
        )
    }

    /// Rewrites a unique-index hit on `racer_no` into the duplicate-number validation error.
    pub(crate) fn or_duplicate_racer_no(self, racer_no: i64) -> Self {
        if self.is_unique_violation() {
            Self::duplicate_racer_no(racer_no)
        } else {
            self
        }
    }
}
