use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request payload for creating a checkpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCheckpointRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    /// Ordering key; defaults to 10
    pub sequence: Option<i32>,
}

pub const DEFAULT_CHECKPOINT_SEQUENCE: i32 = 10;
