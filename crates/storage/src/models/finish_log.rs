use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::Racer;

/// One finish-line crossing. The timestamp is captured first; the racer is
/// identified later by typing a number.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FinishLogEntry {
    pub id: i64,
    pub time: NaiveDateTime,
    pub racer_no_input: Option<i64>,
    pub racer_id: Option<i64>,
    pub assigned: bool,
    pub assigned_time: Option<NaiveDateTime>,
}

/// Racer number to look up for a typed candidate. Empty and zero resolve to nothing.
pub fn number_to_resolve(candidate: Option<i64>) -> Option<i64> {
    candidate.filter(|n| *n > 0)
}

/// Candidate number mirrored from an explicitly chosen racer.
pub fn number_from_reference(racer: Option<&Racer>) -> Option<i64> {
    racer.map(|r| r.racer_no)
}
