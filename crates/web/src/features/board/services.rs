use storage::{
    Database, dto::leaderboard::LeaderboardResponse, error::Result, models::Racer,
    repository::racer::RacerRepository, services::leaderboard,
};

pub async fn waiting(db: &Database) -> Result<Vec<Racer>> {
    RacerRepository::new(db).waiting().await
}

pub async fn on_track(db: &Database) -> Result<Vec<Racer>> {
    RacerRepository::new(db).on_track().await
}

pub async fn finishers(db: &Database) -> Result<Vec<Racer>> {
    RacerRepository::new(db).finishers().await
}

pub async fn leaderboard(db: &Database) -> Result<LeaderboardResponse> {
    leaderboard::leaderboard(db).await
}
