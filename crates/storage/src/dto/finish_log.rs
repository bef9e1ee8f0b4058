use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::Gender;

/// Finish-log row with helper fields of the resolved racer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FinishLogResponse {
    pub id: i64,
    pub time: NaiveDateTime,
    pub racer_no_input: Option<i64>,
    pub racer_id: Option<i64>,
    pub assigned: bool,
    pub assigned_time: Option<NaiveDateTime>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
}

/// Number typed by the operator; `null` clears it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetCandidateNumberRequest {
    pub racer_no: Option<i64>,
}

/// Racer picked directly; `null` clears the reference
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetRacerRequest {
    pub racer_id: Option<i64>,
}
