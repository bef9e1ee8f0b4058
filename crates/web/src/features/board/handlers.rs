use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{leaderboard::LeaderboardResponse, racer::RacerResponse},
    models::Racer,
};

use crate::error::WebError;

use super::services;

fn to_response(racers: Vec<Racer>) -> Response {
    let response: Vec<RacerResponse> = racers.into_iter().map(RacerResponse::from).collect();
    Json(response).into_response()
}

#[utoipa::path(
    get,
    path = "/api/board/waiting",
    responses(
        (status = 200, description = "Racers not started yet, by racer number", body = Vec<RacerResponse>)
    ),
    tag = "board"
)]
pub async fn waiting(State(db): State<Database>) -> Result<Response, WebError> {
    Ok(to_response(services::waiting(&db).await?))
}

#[utoipa::path(
    get,
    path = "/api/board/on-track",
    responses(
        (status = 200, description = "Racers started and not finished, earliest start first", body = Vec<RacerResponse>)
    ),
    tag = "board"
)]
pub async fn on_track(State(db): State<Database>) -> Result<Response, WebError> {
    Ok(to_response(services::on_track(&db).await?))
}

#[utoipa::path(
    get,
    path = "/api/board/finishers",
    responses(
        (status = 200, description = "Finished racers, latest finish first", body = Vec<RacerResponse>)
    ),
    tag = "board"
)]
pub async fn finishers(State(db): State<Database>) -> Result<Response, WebError> {
    Ok(to_response(services::finishers(&db).await?))
}

#[utoipa::path(
    get,
    path = "/api/board/leaderboard",
    responses(
        (status = 200, description = "Overall and per-category podiums", body = LeaderboardResponse)
    ),
    tag = "board"
)]
pub async fn leaderboard(State(db): State<Database>) -> Result<Response, WebError> {
    let board = services::leaderboard(&db).await?;

    Ok(Json(board).into_response())
}
