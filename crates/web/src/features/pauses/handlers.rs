use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::pause_log::{
        CheckpointParams, CheckpointRacerStatus, CustomPauseRequest, InvalidateResult,
        OpenPauseRequest, PauseIntervalResponse, PausedTotal, RacerCheckpointRequest,
        SweepResult,
    },
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/pauses",
    request_body = OpenPauseRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Pause started", body = PauseIntervalResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Racer or checkpoint not found"),
        (status = 409, description = "Racer already has a running pause here")
    ),
    tag = "pauses"
)]
pub async fn open_pause(
    State(db): State<Database>,
    Json(req): Json<OpenPauseRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let pause = services::open_pause(&db, &req).await?;

    Ok((StatusCode::CREATED, Json(PauseIntervalResponse::from(pause))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/pauses",
    params(CheckpointParams),
    responses(
        (status = 200, description = "All pauses recorded at the checkpoint", body = Vec<PauseIntervalResponse>)
    ),
    tag = "pauses"
)]
pub async fn list_pauses(
    State(db): State<Database>,
    Query(params): Query<CheckpointParams>,
) -> Result<Response, WebError> {
    let pauses = services::list_for_checkpoint(&db, params.checkpoint_id).await?;

    let response: Vec<PauseIntervalResponse> =
        pauses.into_iter().map(PauseIntervalResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/pauses/board",
    params(CheckpointParams),
    responses(
        (status = 200, description = "Racers on track with their pause state at the checkpoint", body = Vec<CheckpointRacerStatus>),
        (status = 404, description = "Checkpoint not found")
    ),
    tag = "pauses"
)]
pub async fn checkpoint_board(
    State(db): State<Database>,
    Query(params): Query<CheckpointParams>,
) -> Result<Response, WebError> {
    let board = services::checkpoint_board(&db, params.checkpoint_id).await?;

    Ok(Json(board).into_response())
}

#[utoipa::path(
    get,
    path = "/api/pauses/total",
    params(RacerCheckpointRequest),
    responses(
        (status = 200, description = "Seconds of valid pauses", body = PausedTotal)
    ),
    tag = "pauses"
)]
pub async fn paused_total(
    State(db): State<Database>,
    Query(target): Query<RacerCheckpointRequest>,
) -> Result<Response, WebError> {
    let total = services::paused_total(&db, target).await?;

    Ok(Json(total).into_response())
}

#[utoipa::path(
    post,
    path = "/api/pauses/{id}/close",
    params(
        ("id" = i64, Path, description = "Pause id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Pause ended", body = PauseIntervalResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Pause not found"),
        (status = 409, description = "Pause already ended")
    ),
    tag = "pauses"
)]
pub async fn close_pause(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let pause = services::close_pause(&db, id).await?;

    Ok(Json(PauseIntervalResponse::from(pause)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/pauses/close-active",
    request_body = RacerCheckpointRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Running pause ended", body = PauseIntervalResponse),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "No running pause")
    ),
    tag = "pauses"
)]
pub async fn close_active(
    State(db): State<Database>,
    Json(target): Json<RacerCheckpointRequest>,
) -> Result<Response, WebError> {
    let pause = services::close_active(&db, target).await?;

    Ok(Json(PauseIntervalResponse::from(pause)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/pauses/invalidate",
    request_body = RacerCheckpointRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Pauses marked invalid", body = InvalidateResult),
        (status = 401, description = "Unauthorized")
    ),
    tag = "pauses"
)]
pub async fn invalidate(
    State(db): State<Database>,
    Json(target): Json<RacerCheckpointRequest>,
) -> Result<Response, WebError> {
    let invalidated = services::invalidate(&db, target).await?;

    Ok(Json(InvalidateResult { invalidated }).into_response())
}

#[utoipa::path(
    post,
    path = "/api/pauses/custom",
    request_body = CustomPauseRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Custom pause recorded, earlier pauses invalidated", body = PauseIntervalResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Racer or checkpoint not found")
    ),
    tag = "pauses"
)]
pub async fn record_custom(
    State(db): State<Database>,
    Json(req): Json<CustomPauseRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let pause = services::record_custom(&db, &req).await?;

    Ok((StatusCode::CREATED, Json(PauseIntervalResponse::from(pause))).into_response())
}

#[utoipa::path(
    post,
    path = "/api/pauses/sweep",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Stale open pauses deleted", body = SweepResult),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role not allowed")
    ),
    tag = "pauses"
)]
pub async fn sweep(State(db): State<Database>) -> Result<Response, WebError> {
    let deleted = services::sweep(&db).await?;

    Ok(Json(SweepResult { deleted }).into_response())
}
