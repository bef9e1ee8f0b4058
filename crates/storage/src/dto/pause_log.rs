use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::PauseInterval;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OpenPauseRequest {
    pub racer_id: i64,
    pub checkpoint_id: i64,
    #[validate(length(max = 255))]
    pub started_by: Option<String>,
    #[validate(length(max = 255))]
    pub session_id: Option<String>,
}

/// Identifies the pauses of one racer at one checkpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, IntoParams, ToSchema)]
pub struct RacerCheckpointRequest {
    pub racer_id: i64,
    pub checkpoint_id: i64,
}

/// Replaces the recorded pauses at a checkpoint with a fixed duration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CustomPauseRequest {
    pub racer_id: i64,
    pub checkpoint_id: i64,
    #[validate(range(min = 0, max = 86400, message = "Pause must be between 0 and 86400 seconds"))]
    pub seconds: i64,
    #[validate(length(max = 255))]
    pub started_by: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct CheckpointParams {
    pub checkpoint_id: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PauseIntervalResponse {
    pub id: i64,
    pub racer_id: i64,
    pub checkpoint_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub started_by: Option<String>,
    pub session_id: Option<String>,
    pub is_invalid: bool,
    pub is_custom: bool,
    pub duration_seconds: i64,
}

impl From<PauseInterval> for PauseIntervalResponse {
    fn from(interval: PauseInterval) -> Self {
        Self {
            duration_seconds: interval.duration_seconds(),
            id: interval.id,
            racer_id: interval.racer_id,
            checkpoint_id: interval.checkpoint_id,
            start_time: interval.start_time,
            end_time: interval.end_time,
            started_by: interval.started_by,
            session_id: interval.session_id,
            is_invalid: interval.is_invalid,
            is_custom: interval.is_custom,
        }
    }
}

/// On-track racer as seen from one checkpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckpointRacerStatus {
    pub racer_id: i64,
    pub racer_no: i64,
    pub first_name: String,
    pub last_name: String,
    /// Sum of valid, closed pauses at this checkpoint
    pub paused_seconds: i64,
    /// Pause currently running at this checkpoint, if any
    pub active_pause: Option<PauseIntervalResponse>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PausedTotal {
    pub racer_id: i64,
    pub checkpoint_id: i64,
    pub paused_seconds: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvalidateResult {
    pub invalidated: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SweepResult {
    pub deleted: u64,
}
