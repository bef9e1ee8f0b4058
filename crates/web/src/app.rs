use axum::{Json, Router, routing::get};
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

use crate::features::{board, checkpoints, finish_log, numbering, pauses, racers};
use crate::middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        racers::handlers::list_racers,
        racers::handlers::get_racer,
        racers::handlers::get_racer_by_number,
        racers::handlers::register_racer,
        racers::handlers::register_racers,
        racers::handlers::update_racer,
        racers::handlers::delete_racer,
        racers::handlers::start_racer,
        racers::handlers::finish_racer,
        racers::handlers::override_times,
        racers::handlers::preview_times,
        numbering::handlers::assign_next,
        numbering::handlers::fill_gaps,
        board::handlers::waiting,
        board::handlers::on_track,
        board::handlers::finishers,
        board::handlers::leaderboard,
        finish_log::handlers::log_now,
        finish_log::handlers::list_entries,
        finish_log::handlers::set_candidate_number,
        finish_log::handlers::set_racer,
        finish_log::handlers::assign,
        pauses::handlers::open_pause,
        pauses::handlers::list_pauses,
        pauses::handlers::checkpoint_board,
        pauses::handlers::paused_total,
        pauses::handlers::close_pause,
        pauses::handlers::close_active,
        pauses::handlers::invalidate,
        pauses::handlers::record_custom,
        pauses::handlers::sweep,
        checkpoints::handlers::list_checkpoints,
        checkpoints::handlers::get_checkpoint,
        checkpoints::handlers::create_checkpoint,
        checkpoints::handlers::delete_checkpoint,
    ),
    components(
        schemas(
            storage::dto::racer::CreateRacerRequest,
            storage::dto::racer::UpdateRacerRequest,
            storage::dto::racer::RacerNumberInput,
            storage::dto::racer::RacerResponse,
            storage::dto::racer::TimeOverrideRequest,
            storage::dto::racer::TimeOverridePreview,
            storage::dto::racer::AssignNumbersRequest,
            storage::dto::racer::NumberAssignment,
            storage::dto::leaderboard::LeaderboardResponse,
            storage::dto::leaderboard::LeaderboardEntry,
            storage::dto::leaderboard::CategoryPodium,
            storage::dto::finish_log::FinishLogResponse,
            storage::dto::finish_log::SetCandidateNumberRequest,
            storage::dto::finish_log::SetRacerRequest,
            storage::dto::pause_log::OpenPauseRequest,
            storage::dto::pause_log::RacerCheckpointRequest,
            storage::dto::pause_log::CustomPauseRequest,
            storage::dto::pause_log::PauseIntervalResponse,
            storage::dto::pause_log::CheckpointRacerStatus,
            storage::dto::pause_log::PausedTotal,
            storage::dto::pause_log::InvalidateResult,
            storage::dto::pause_log::SweepResult,
            storage::dto::checkpoint::CreateCheckpointRequest,
            storage::dto::common::PaginationMeta,
            storage::models::Gender,
            storage::models::Checkpoint,
        )
    ),
    tags(
        (name = "racers", description = "Racer registration and lookup"),
        (name = "numbering", description = "Racer number allocation"),
        (name = "timing", description = "Start, finish and time overrides"),
        (name = "board", description = "Race board and leaderboard"),
        (name = "finish-log", description = "Finish-line crossings and their assignment"),
        (name = "pauses", description = "Neutralized time at checkpoints"),
        (name = "checkpoints", description = "Course checkpoints"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

pub fn router(db: Database, api_keys: ApiKeys) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let openapi = ApiDoc::openapi();

    Router::new()
        .route("/api-docs/openapi.json", get(move || async move { Json(openapi) }))
        .nest("/api/racers/numbers", numbering::routes::routes(api_keys.clone()))
        .nest("/api/racers", racers::routes::routes(api_keys.clone()))
        .nest("/api/board", board::routes::routes())
        .nest("/api/finish-log", finish_log::routes::routes(api_keys.clone()))
        .nest("/api/pauses", pauses::routes::routes(api_keys.clone()))
        .nest("/api/checkpoints", checkpoints::routes::routes(api_keys))
        .layer(cors)
        .with_state(db)
}
