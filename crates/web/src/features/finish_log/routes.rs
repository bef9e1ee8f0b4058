use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use storage::Database;

use super::handlers::{assign, list_entries, log_now, set_candidate_number, set_racer};
use crate::middleware::auth::{ApiKeys, AuthState, require_auth};
use crate::middleware::roles::Permission;

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(log_now))
        .route("/:id/number", put(set_candidate_number))
        .route("/:id/racer", put(set_racer))
        .route("/:id/assign", post(assign))
        .route_layer(middleware::from_fn_with_state(
            AuthState::new(api_keys, Permission::Timing),
            require_auth,
        ));

    Router::new().route("/", get(list_entries)).merge(protected)
}
