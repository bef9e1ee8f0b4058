use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{Result, StorageError};
use crate::models::{Gender, Racer};
use crate::services::timing;

/// Racer number as typed by an operator: a number, a numeric string, or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RacerNumberInput {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl From<i64> for RacerNumberInput {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Largest racer number that can be entered or handed out
pub const MAX_RACER_NO: i64 = 999_999;

/// Parses an optional racer number. Absent or empty means 0 (unassigned);
/// anything that is not an integer in `0..=MAX_RACER_NO` is rejected.
pub fn parse_racer_no(input: Option<&RacerNumberInput>) -> Result<i64> {
    let value = match input {
        None => 0,
        Some(RacerNumberInput::Integer(n)) => *n,
        Some(RacerNumberInput::Decimal(d)) => {
            // outside the i64 range the cast would saturate
            let out_of_range = *d < i64::MIN as f64 || *d >= i64::MAX as f64;
            if !d.is_finite() || d.fract() != 0.0 || out_of_range {
                return Err(StorageError::validation("Racer number must be an integer."));
            }
            *d as i64
        }
        Some(RacerNumberInput::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                0
            } else {
                text.parse::<i64>()
                    .map_err(|_| StorageError::validation("Racer number must be an integer."))?
            }
        }
    };

    if value < 0 {
        return Err(StorageError::validation("Racer number cannot be negative."));
    }
    if value > MAX_RACER_NO {
        return Err(StorageError::validation(format!(
            "Racer number cannot be greater than {MAX_RACER_NO}."
        )));
    }

    Ok(value)
}

/// Request payload for registering a racer
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRacerRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "First name must be between 1 and 255 characters"
    ))]
    pub first_name: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Last name must be between 1 and 255 characters"
    ))]
    pub last_name: String,

    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: i32,

    pub gender: Gender,

    #[serde(default)]
    pub racer_no: Option<RacerNumberInput>,

    #[validate(email)]
    #[validate(length(max = 255))]
    pub email: Option<String>,
}

impl CreateRacerRequest {
    pub fn racer_no(&self) -> Result<i64> {
        parse_racer_no(self.racer_no.as_ref())
    }
}

/// Request payload for editing a racer; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRacerRequest {
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,

    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,

    pub gender: Option<Gender>,

    /// An empty string sets the racer back to unassigned.
    pub racer_no: Option<RacerNumberInput>,

    #[validate(email)]
    #[validate(length(max = 255))]
    pub email: Option<String>,
}

impl UpdateRacerRequest {
    pub fn racer_no(&self) -> Result<Option<i64>> {
        self.racer_no
            .as_ref()
            .map(|input| parse_racer_no(Some(input)))
            .transpose()
    }
}

/// Privileged overwrite of start and finish times. `None` clears the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TimeOverrideRequest {
    pub start_time: Option<NaiveDateTime>,
    pub finish_time: Option<NaiveDateTime>,
}

impl TimeOverrideRequest {
    /// Final time the racer will show once these times are applied.
    pub fn preview_final_time(&self) -> Option<String> {
        timing::elapsed(self.start_time, self.finish_time)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimeOverridePreview {
    pub final_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignNumbersRequest {
    pub racer_ids: Vec<i64>,
}

/// Number handed out by one of the allocation strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NumberAssignment {
    pub racer_id: i64,
    pub racer_no: i64,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct RacerSearchParams {
    /// Matches first or last name, or an exact racer number when all digits
    pub q: Option<String>,
}

/// Racer with its derived display fields
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RacerResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub gender: Gender,
    pub racer_no: i64,
    pub start_time: Option<NaiveDateTime>,
    pub finish_time: Option<NaiveDateTime>,
    pub email: Option<String>,
    pub created_at: NaiveDateTime,
    #[schema(value_type = Option<String>, example = "M18")]
    pub category: Option<crate::models::Category>,
    pub final_time: Option<String>,
    pub display_name: String,
    pub search_key: String,
}

impl From<Racer> for RacerResponse {
    fn from(racer: Racer) -> Self {
        Self {
            category: racer.category(),
            final_time: racer.final_time(),
            display_name: racer.display_name(),
            search_key: racer.search_key(),
            id: racer.id,
            first_name: racer.first_name,
            last_name: racer.last_name,
            age: racer.age,
            gender: racer.gender,
            racer_no: racer.racer_no,
            start_time: racer.start_time,
            finish_time: racer.finish_time,
            email: racer.email,
            created_at: racer.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_json(json: &str) -> Result<i64> {
        let input: Option<RacerNumberInput> = serde_json::from_str(json).unwrap();
        parse_racer_no(input.as_ref())
    }

    #[test]
    fn test_absent_or_empty_number_is_unassigned() {
        assert_eq!(parse_racer_no(None).unwrap(), 0);
        assert_eq!(parse_json("null").unwrap(), 0);
        assert_eq!(parse_json("\"\"").unwrap(), 0);
        assert_eq!(parse_json("\"  \"").unwrap(), 0);
    }

    #[test]
    fn test_integer_forms_are_accepted() {
        assert_eq!(parse_json("12").unwrap(), 12);
        assert_eq!(parse_json("\" 7 \"").unwrap(), 7);
        assert_eq!(parse_json("3.0").unwrap(), 3);
        assert_eq!(parse_json("0").unwrap(), 0);
    }

    #[test]
    fn test_non_integer_is_rejected() {
        assert!(matches!(parse_json("\"abc\""), Err(StorageError::Validation(_))));
        assert!(matches!(parse_json("2.5"), Err(StorageError::Validation(_))));

        let err = parse_json("10000000000000000000").unwrap_err();
        assert_eq!(err.to_string(), "Racer number must be an integer.");
        let err = parse_racer_no(Some(&RacerNumberInput::Decimal(1e19))).unwrap_err();
        assert_eq!(err.to_string(), "Racer number must be an integer.");
    }

    #[test]
    fn test_number_above_cap_is_rejected() {
        assert_eq!(parse_json("999999").unwrap(), MAX_RACER_NO);

        let err = parse_json("1000000").unwrap_err();
        assert_eq!(err.to_string(), "Racer number cannot be greater than 999999.");
        assert!(matches!(
            parse_racer_no(Some(&RacerNumberInput::Integer(i64::MAX))),
            Err(StorageError::Validation(_))
        ));
        assert!(matches!(
            parse_json("\"9223372036854775807\""),
            Err(StorageError::Validation(_))
        ));
    }

    #[test]
    fn test_negative_is_rejected() {
        let err = parse_json("-4").unwrap_err();
        assert_eq!(err.to_string(), "Racer number cannot be negative.");
        assert!(matches!(parse_json("\"-1\""), Err(StorageError::Validation(_))));
    }

    #[test]
    fn test_update_number_is_optional() {
        let req = UpdateRacerRequest::default();
        assert_eq!(req.racer_no().unwrap(), None);

        let req = UpdateRacerRequest {
            racer_no: Some(RacerNumberInput::Text(String::new())),
            ..Default::default()
        };
        assert_eq!(req.racer_no().unwrap(), Some(0));
    }

    #[test]
    fn test_create_request_validation() {
        let req: CreateRacerRequest = serde_json::from_str(
            r#"{"first_name":"","last_name":"Doe","age":200,"gender":"male","email":"nope"}"#,
        )
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("age"));
        assert!(fields.contains_key("email"));
        assert_eq!(req.racer_no().unwrap(), 0);
    }
}
