use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{
    checkpoint_board, close_active, close_pause, invalidate, list_pauses, open_pause,
    paused_total, record_custom, sweep,
};
use crate::middleware::auth::{ApiKeys, AuthState, require_auth};
use crate::middleware::roles::Permission;

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let timing = Router::new()
        .route("/", post(open_pause))
        .route("/:id/close", post(close_pause))
        .route("/close-active", post(close_active))
        .route("/invalidate", post(invalidate))
        .route("/custom", post(record_custom))
        .route_layer(middleware::from_fn_with_state(
            AuthState::new(api_keys.clone(), Permission::Timing),
            require_auth,
        ));

    let management = Router::new()
        .route("/sweep", post(sweep))
        .route_layer(middleware::from_fn_with_state(
            AuthState::new(api_keys, Permission::Manage),
            require_auth,
        ));

    Router::new()
        .route("/", get(list_pauses))
        .route("/board", get(checkpoint_board))
        .route("/total", get(paused_total))
        .merge(timing)
        .merge(management)
}
