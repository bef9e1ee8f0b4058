use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::racer::{
        CreateRacerRequest, RacerResponse, RacerSearchParams, TimeOverridePreview,
        TimeOverrideRequest, UpdateRacerRequest,
    },
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/racers",
    params(RacerSearchParams),
    responses(
        (status = 200, description = "Racers, newest first", body = Vec<RacerResponse>)
    ),
    tag = "racers"
)]
pub async fn list_racers(
    State(db): State<Database>,
    Query(params): Query<RacerSearchParams>,
) -> Result<Response, WebError> {
    let racers = services::list_racers(&db, params.q.as_deref()).await?;

    let response: Vec<RacerResponse> = racers.into_iter().map(RacerResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/racers/{id}",
    params(
        ("id" = i64, Path, description = "Racer id")
    ),
    responses(
        (status = 200, description = "Racer found", body = RacerResponse),
        (status = 404, description = "Racer not found")
    ),
    tag = "racers"
)]
pub async fn get_racer(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let racer = services::get_racer(&db, id).await?;

    Ok(Json(RacerResponse::from(racer)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/racers/by-number/{racer_no}",
    params(
        ("racer_no" = i64, Path, description = "Assigned racer number")
    ),
    responses(
        (status = 200, description = "Racer holding the number", body = RacerResponse),
        (status = 404, description = "No racer holds this number")
    ),
    tag = "racers"
)]
pub async fn get_racer_by_number(
    State(db): State<Database>,
    Path(racer_no): Path<i64>,
) -> Result<Response, WebError> {
    let racer = services::get_racer_by_number(&db, racer_no).await?;

    Ok(Json(RacerResponse::from(racer)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/racers",
    request_body = CreateRacerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Racer registered", body = RacerResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid or duplicate racer number")
    ),
    tag = "racers"
)]
pub async fn register_racer(
    State(db): State<Database>,
    Json(req): Json<CreateRacerRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let racer = services::register_racer(&db, &req).await?;

    Ok((StatusCode::CREATED, Json(RacerResponse::from(racer))).into_response())
}

#[utoipa::path(
    post,
    path = "/api/racers/batch",
    request_body = Vec<CreateRacerRequest>,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "All racers registered", body = Vec<RacerResponse>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid or duplicate racer number, nothing stored")
    ),
    tag = "racers"
)]
pub async fn register_racers(
    State(db): State<Database>,
    Json(requests): Json<Vec<CreateRacerRequest>>,
) -> Result<Response, WebError> {
    for req in &requests {
        req.validate()?;
    }

    let racers = services::register_racers(&db, &requests).await?;

    let response: Vec<RacerResponse> = racers.into_iter().map(RacerResponse::from).collect();

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/racers/{id}",
    params(
        ("id" = i64, Path, description = "Racer id")
    ),
    request_body = UpdateRacerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Racer updated", body = RacerResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Racer not found"),
        (status = 422, description = "Invalid or duplicate racer number")
    ),
    tag = "racers"
)]
pub async fn update_racer(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(update_req): Json<UpdateRacerRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_racer(&db, id, &update_req).await?;

    Ok(Json(RacerResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/racers/{id}",
    params(
        ("id" = i64, Path, description = "Racer id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Racer deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Racer not found")
    ),
    tag = "racers"
)]
pub async fn delete_racer(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    services::delete_racer(&db, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/racers/{id}/start",
    params(
        ("id" = i64, Path, description = "Racer id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Start time recorded", body = RacerResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Racer not found"),
        (status = 409, description = "Racer has no number or already started")
    ),
    tag = "timing"
)]
pub async fn start_racer(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let racer = services::start_racer(&db, id).await?;

    Ok(Json(RacerResponse::from(racer)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/racers/{id}/finish",
    params(
        ("id" = i64, Path, description = "Racer id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Finish time recorded", body = RacerResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Racer not found"),
        (status = 409, description = "Racer not started or already finished")
    ),
    tag = "timing"
)]
pub async fn finish_racer(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let racer = services::finish_racer(&db, id).await?;

    Ok(Json(RacerResponse::from(racer)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/racers/{id}/times",
    params(
        ("id" = i64, Path, description = "Racer id")
    ),
    request_body = TimeOverrideRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Times overwritten", body = RacerResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Racer not found")
    ),
    tag = "timing"
)]
pub async fn override_times(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(req): Json<TimeOverrideRequest>,
) -> Result<Response, WebError> {
    let racer = services::override_times(&db, id, &req).await?;

    Ok(Json(RacerResponse::from(racer)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/racers/times/preview",
    request_body = TimeOverrideRequest,
    responses(
        (status = 200, description = "Final time the override would produce", body = TimeOverridePreview)
    ),
    tag = "timing"
)]
pub async fn preview_times(Json(req): Json<TimeOverrideRequest>) -> Response {
    Json(TimeOverridePreview {
        final_time: req.preview_final_time(),
    })
    .into_response()
}
