use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{finishers, leaderboard, on_track, waiting};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/waiting", get(waiting))
        .route("/on-track", get(on_track))
        .route("/finishers", get(finishers))
        .route("/leaderboard", get(leaderboard))
}
