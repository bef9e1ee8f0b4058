use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Checkpoint {
    pub id: i64,
    pub name: String,
    pub sequence: i32,
}
