use axum::{Router, middleware, routing::post};
use storage::Database;

use super::handlers::{assign_next, fill_gaps};
use crate::middleware::auth::{ApiKeys, AuthState, require_auth};
use crate::middleware::roles::Permission;

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/next", post(assign_next))
        .route("/fill", post(fill_gaps))
        .route_layer(middleware::from_fn_with_state(
            AuthState::new(api_keys, Permission::Register),
            require_auth,
        ))
}
