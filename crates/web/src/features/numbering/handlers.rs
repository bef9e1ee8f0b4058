use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::racer::{AssignNumbersRequest, NumberAssignment},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/racers/numbers/next",
    request_body = AssignNumbersRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Numbers appended after the current maximum, in registration order", body = Vec<NumberAssignment>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown racer id")
    ),
    tag = "numbering"
)]
pub async fn assign_next(
    State(db): State<Database>,
    Json(req): Json<AssignNumbersRequest>,
) -> Result<Response, WebError> {
    let assignments = services::assign_next(&db, &req.racer_ids).await?;

    Ok(Json(assignments).into_response())
}

#[utoipa::path(
    post,
    path = "/api/racers/numbers/fill",
    request_body = AssignNumbersRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Smallest unused numbers, in racer id order", body = Vec<NumberAssignment>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown racer id")
    ),
    tag = "numbering"
)]
pub async fn fill_gaps(
    State(db): State<Database>,
    Json(req): Json<AssignNumbersRequest>,
) -> Result<Response, WebError> {
    let assignments = services::fill_gaps(&db, &req.racer_ids).await?;

    Ok(Json(assignments).into_response())
}
