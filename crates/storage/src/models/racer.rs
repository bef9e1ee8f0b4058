use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::Category;
use crate::services::timing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    pub fn prefix(&self) -> char {
        match self {
            Gender::Male => 'M',
            Gender::Female => 'F',
        }
    }
}

/// A registered participant. `racer_no == 0` means no number assigned yet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Racer {
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
}

impl Racer {
    pub fn has_number(&self) -> bool {
        self.racer_no > 0
    }

    pub fn is_on_track(&self) -> bool {
        self.start_time.is_some() && self.finish_time.is_none()
    }

    /// Age 0 counts as not entered, so such racers have no category.
    pub fn category(&self) -> Option<Category> {
        (self.age > 0).then(|| Category::new(self.age, self.gender))
    }

    pub fn elapsed_seconds(&self) -> Option<i64> {
        timing::elapsed_seconds(self.start_time, self.finish_time)
    }

    pub fn final_time(&self) -> Option<String> {
        timing::elapsed(self.start_time, self.finish_time)
    }

    /// `"First Last (#N)"`; an unassigned racer renders as `#0`.
    pub fn display_name(&self) -> String {
        format!(
            "{} {} (#{})",
            self.first_name.trim(),
            self.last_name.trim(),
            self.racer_no
        )
        .trim()
        .to_string()
    }

    /// Flat lookup string: names, age, gender and number.
    pub fn search_key(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(5);
        for name in [&self.first_name, &self.last_name] {
            let name = name.trim();
            if !name.is_empty() {
                parts.push(name.to_string());
            }
        }
        if self.age > 0 {
            parts.push(self.age.to_string());
        }
        parts.push(self.gender.label().to_string());
        if self.has_number() {
            parts.push(format!("#{}", self.racer_no));
        } else {
            parts.push("no racer number".to_string());
        }
        parts.join(", ")
    }
}
