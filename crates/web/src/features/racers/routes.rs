use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use storage::Database;

use super::handlers::{
    delete_racer, finish_racer, get_racer, get_racer_by_number, list_racers, override_times,
    preview_times, register_racer, register_racers, start_racer, update_racer,
};
use crate::middleware::auth::{ApiKeys, AuthState, require_auth};
use crate::middleware::roles::Permission;

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let registration = Router::new()
        .route("/", post(register_racer))
        .route("/batch", post(register_racers))
        .route("/:id", put(update_racer))
        .route_layer(middleware::from_fn_with_state(
            AuthState::new(api_keys.clone(), Permission::Register),
            require_auth,
        ));

    let timing = Router::new()
        .route("/:id/start", post(start_racer))
        .route("/:id/finish", post(finish_racer))
        .route_layer(middleware::from_fn_with_state(
            AuthState::new(api_keys.clone(), Permission::Timing),
            require_auth,
        ));

    let management = Router::new()
        .route("/:id", delete(delete_racer))
        .route("/:id/times", put(override_times))
        .route_layer(middleware::from_fn_with_state(
            AuthState::new(api_keys, Permission::Manage),
            require_auth,
        ));

    Router::new()
        .route("/", get(list_racers))
        .route("/:id", get(get_racer))
        .route("/by-number/:racer_no", get(get_racer_by_number))
        .route("/times/preview", post(preview_times))
        .merge(registration)
        .merge(timing)
        .merge(management)
}
