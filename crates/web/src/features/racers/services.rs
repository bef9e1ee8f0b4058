use storage::{
    Database,
    dto::racer::{CreateRacerRequest, TimeOverrideRequest, UpdateRacerRequest},
    error::Result,
    models::Racer,
    repository::racer::RacerRepository,
};

/// List racers, filtered by a free-text query when one is given
pub async fn list_racers(db: &Database, query: Option<&str>) -> Result<Vec<Racer>> {
    let repo = RacerRepository::new(db);
    match query {
        Some(query) => repo.search(query).await,
        None => repo.list().await,
    }
}

pub async fn get_racer(db: &Database, id: i64) -> Result<Racer> {
    RacerRepository::new(db).find_by_id(id).await
}

pub async fn get_racer_by_number(db: &Database, racer_no: i64) -> Result<Racer> {
    RacerRepository::new(db).find_by_number(racer_no).await
}

pub async fn register_racer(db: &Database, request: &CreateRacerRequest) -> Result<Racer> {
    RacerRepository::new(db).create(request).await
}

/// Register several racers at once; nothing is stored if any of them is rejected
pub async fn register_racers(db: &Database, requests: &[CreateRacerRequest]) -> Result<Vec<Racer>> {
    RacerRepository::new(db).create_many(requests).await
}

pub async fn update_racer(db: &Database, id: i64, request: &UpdateRacerRequest) -> Result<Racer> {
    RacerRepository::new(db).update(id, request).await
}

pub async fn delete_racer(db: &Database, id: i64) -> Result<()> {
    RacerRepository::new(db).delete(id).await
}

pub async fn start_racer(db: &Database, id: i64) -> Result<Racer> {
    RacerRepository::new(db).start(id).await
}

pub async fn finish_racer(db: &Database, id: i64) -> Result<Racer> {
    RacerRepository::new(db).finish_now(id).await
}

pub async fn override_times(
    db: &Database,
    id: i64,
    request: &TimeOverrideRequest,
) -> Result<Racer> {
    RacerRepository::new(db).apply_times(id, request).await
}
