use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        finish_log::{FinishLogResponse, SetCandidateNumberRequest, SetRacerRequest},
    },
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/finish-log",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Crossing captured at the server time", body = FinishLogResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "finish-log"
)]
pub async fn log_now(State(db): State<Database>) -> Result<Response, WebError> {
    let entry = services::log_now(&db).await?;

    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/finish-log",
    params(PaginationParams),
    responses(
        (status = 200, description = "Entries newest first", body = PaginatedResponse<FinishLogResponse>),
        (status = 422, description = "Invalid pagination parameters")
    ),
    tag = "finish-log"
)]
pub async fn list_entries(
    State(db): State<Database>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, WebError> {
    let (entries, total) = services::list_entries(&db, params).await?;

    Ok(Json(PaginatedResponse::new(entries, params, total)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/finish-log/{id}/number",
    params(
        ("id" = i64, Path, description = "Finish-log entry id")
    ),
    request_body = SetCandidateNumberRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Number stored, racer re-resolved", body = FinishLogResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Entry not found")
    ),
    tag = "finish-log"
)]
pub async fn set_candidate_number(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(req): Json<SetCandidateNumberRequest>,
) -> Result<Response, WebError> {
    let entry = services::set_candidate_number(&db, id, req.racer_no).await?;

    Ok(Json(entry).into_response())
}

#[utoipa::path(
    put,
    path = "/api/finish-log/{id}/racer",
    params(
        ("id" = i64, Path, description = "Finish-log entry id")
    ),
    request_body = SetRacerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Racer set, number follows it", body = FinishLogResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Entry or racer not found")
    ),
    tag = "finish-log"
)]
pub async fn set_racer(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(req): Json<SetRacerRequest>,
) -> Result<Response, WebError> {
    let entry = services::set_racer(&db, id, req.racer_id).await?;

    Ok(Json(entry).into_response())
}

#[utoipa::path(
    post,
    path = "/api/finish-log/{id}/assign",
    params(
        ("id" = i64, Path, description = "Finish-log entry id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Entry time written as the racer's finish time", body = FinishLogResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Entry not found"),
        (status = 409, description = "No racer resolved, racer already finished, or entry already assigned")
    ),
    tag = "finish-log"
)]
pub async fn assign(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let entry = services::assign(&db, id).await?;

    Ok(Json(entry).into_response())
}
