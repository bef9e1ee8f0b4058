use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Open intervals started this many seconds ago (or earlier) are removed by the sweep.
pub const STALE_PAUSE_SECS: i64 = 60;

/// Longest pause that can be entered by hand, one day.
pub const MAX_CUSTOM_PAUSE_SECS: i64 = 86_400;

pub fn stale_cutoff(now: NaiveDateTime) -> NaiveDateTime {
    now - Duration::seconds(STALE_PAUSE_SECS)
}

/// A stop of one racer at one checkpoint. Open while `end_time` is empty.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PauseInterval {
    pub id: i64,
    pub racer_id: i64,
    pub checkpoint_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub started_by: Option<String>,
    pub session_id: Option<String>,
    pub is_invalid: bool,
    pub is_custom: bool,
}

impl PauseInterval {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Seconds between start and end; 0 while open. An end before the start
    /// counts as 0.
    pub fn duration_seconds(&self) -> i64 {
        match self.end_time {
            Some(end) => (end - self.start_time).num_seconds().max(0),
            None => 0,
        }
    }

    pub fn is_stale(&self, now: NaiveDateTime) -> bool {
        self.is_open() && self.start_time <= stale_cutoff(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn interval(start: NaiveDateTime, end: Option<NaiveDateTime>) -> PauseInterval {
        PauseInterval {
            id: 1,
            racer_id: 1,
            checkpoint_id: 1,
            start_time: start,
            end_time: end,
            started_by: None,
            session_id: None,
            is_invalid: false,
            is_custom: false,
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_duration_of_closed_interval() {
        let p = interval(noon(), Some(noon() + Duration::seconds(42)));
        assert_eq!(p.duration_seconds(), 42);
        assert!(!p.is_open());
    }

    #[test]
    fn test_open_interval_has_zero_duration() {
        assert_eq!(interval(noon(), None).duration_seconds(), 0);
    }

    #[test]
    fn test_end_before_start_is_clamped() {
        let p = interval(noon(), Some(noon() - Duration::seconds(5)));
        assert_eq!(p.duration_seconds(), 0);
    }

    #[test]
    fn test_staleness() {
        let now = noon();
        assert!(interval(now - Duration::seconds(90), None).is_stale(now));
        assert!(interval(now - Duration::seconds(60), None).is_stale(now));
        assert!(!interval(now - Duration::seconds(30), None).is_stale(now));
        assert!(!interval(now - Duration::seconds(90), Some(now)).is_stale(now));
    }
}
