use storage::{
    Database,
    dto::{common::PaginationParams, finish_log::FinishLogResponse},
    error::Result,
    repository::finish_log::FinishLogRepository,
};

/// Capture a crossing now and return it with its (empty) racer details
pub async fn log_now(db: &Database) -> Result<FinishLogResponse> {
    let repo = FinishLogRepository::new(db);
    let id = repo.log_now().await?;
    repo.view(id).await
}

pub async fn list_entries(
    db: &Database,
    page: PaginationParams,
) -> Result<(Vec<FinishLogResponse>, i64)> {
    FinishLogRepository::new(db).list(page).await
}

pub async fn set_candidate_number(
    db: &Database,
    id: i64,
    racer_no: Option<i64>,
) -> Result<FinishLogResponse> {
    let repo = FinishLogRepository::new(db);
    repo.set_candidate_number(id, racer_no).await?;
    repo.view(id).await
}

pub async fn set_racer(db: &Database, id: i64, racer_id: Option<i64>) -> Result<FinishLogResponse> {
    let repo = FinishLogRepository::new(db);
    repo.set_racer(id, racer_id).await?;
    repo.view(id).await
}

pub async fn assign(db: &Database, id: i64) -> Result<FinishLogResponse> {
    let repo = FinishLogRepository::new(db);
    repo.assign(id).await?;
    repo.view(id).await
}
