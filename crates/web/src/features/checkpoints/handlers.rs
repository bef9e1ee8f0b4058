use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::checkpoint::CreateCheckpointRequest, models::Checkpoint};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/checkpoints",
    responses(
        (status = 200, description = "Checkpoints in course order", body = Vec<Checkpoint>)
    ),
    tag = "checkpoints"
)]
pub async fn list_checkpoints(State(db): State<Database>) -> Result<Response, WebError> {
    let checkpoints = services::list_checkpoints(&db).await?;

    Ok(Json(checkpoints).into_response())
}

#[utoipa::path(
    get,
    path = "/api/checkpoints/{id}",
    params(
        ("id" = i64, Path, description = "Checkpoint id")
    ),
    responses(
        (status = 200, description = "Checkpoint found", body = Checkpoint),
        (status = 404, description = "Checkpoint not found")
    ),
    tag = "checkpoints"
)]
pub async fn get_checkpoint(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let checkpoint = services::get_checkpoint(&db, id).await?;

    Ok(Json(checkpoint).into_response())
}

#[utoipa::path(
    post,
    path = "/api/checkpoints",
    request_body = CreateCheckpointRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Checkpoint created", body = Checkpoint),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role not allowed")
    ),
    tag = "checkpoints"
)]
pub async fn create_checkpoint(
    State(db): State<Database>,
    Json(req): Json<CreateCheckpointRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let checkpoint = services::create_checkpoint(&db, &req).await?;

    Ok((StatusCode::CREATED, Json(checkpoint)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/checkpoints/{id}",
    params(
        ("id" = i64, Path, description = "Checkpoint id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Checkpoint and its pauses deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Checkpoint not found")
    ),
    tag = "checkpoints"
)]
pub async fn delete_checkpoint(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    services::delete_checkpoint(&db, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
