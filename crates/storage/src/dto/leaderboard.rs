use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub racer_id: i64,
    pub racer_no: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    /// Absent when the racer's age was not entered
    pub category: Option<String>,
    pub final_time: String,
    pub elapsed_seconds: i64,
    /// 1..=3 for the overall podium
    pub overall_rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryPodium {
    pub category: String,
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub overall: Vec<LeaderboardEntry>,
    pub categories: Vec<CategoryPodium>,
}
