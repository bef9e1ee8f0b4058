use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use storage::Database;

use super::handlers::{create_checkpoint, delete_checkpoint, get_checkpoint, list_checkpoints};
use crate::middleware::auth::{ApiKeys, AuthState, require_auth};
use crate::middleware::roles::Permission;

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_checkpoint))
        .route("/:id", delete(delete_checkpoint))
        .route_layer(middleware::from_fn_with_state(
            AuthState::new(api_keys, Permission::Manage),
            require_auth,
        ));

    Router::new()
        .route("/", get(list_checkpoints))
        .route("/:id", get(get_checkpoint))
        .merge(protected)
}
