mod common;

use common::{race_day, register, setup};
use storage::dto::common::PaginationParams;
use storage::error::StorageError;
use storage::repository::finish_log::FinishLogRepository;
use storage::repository::racer::RacerRepository;

#[tokio::test]
async fn test_log_now_captures_time_without_racer() {
    let (db, clock) = setup().await;
    clock.set(race_day(10, 15, 0));

    let repo = FinishLogRepository::new(&db);
    let id = repo.log_now().await.unwrap();
    let entry = repo.find_by_id(id).await.unwrap();

    assert_eq!(entry.time, race_day(10, 15, 0));
    assert_eq!(entry.racer_no_input, None);
    assert_eq!(entry.racer_id, None);
    assert!(!entry.assigned);
    assert_eq!(entry.assigned_time, None);
}

#[tokio::test]
async fn test_candidate_number_resolves_and_clears() {
    let (db, _) = setup().await;
    let ann = register(&db, "Ann", Some(21)).await;
    let repo = FinishLogRepository::new(&db);
    let id = repo.log_now().await.unwrap();

    let entry = repo.set_candidate_number(id, Some(21)).await.unwrap();
    assert_eq!(entry.racer_id, Some(ann.id));

    // mistyped number clears the racer but keeps the input
    let entry = repo.set_candidate_number(id, Some(99)).await.unwrap();
    assert_eq!(entry.racer_no_input, Some(99));
    assert_eq!(entry.racer_id, None);

    let entry = repo.set_candidate_number(id, None).await.unwrap();
    assert_eq!(entry.racer_no_input, None);
    assert_eq!(entry.racer_id, None);
}

#[tokio::test]
async fn test_zero_candidate_does_not_resolve_unassigned_racers() {
    let (db, _) = setup().await;
    register(&db, "Unassigned", None).await;
    let repo = FinishLogRepository::new(&db);
    let id = repo.log_now().await.unwrap();

    let entry = repo.set_candidate_number(id, Some(0)).await.unwrap();
    assert_eq!(entry.racer_id, None);
}

#[tokio::test]
async fn test_setting_racer_mirrors_number() {
    let (db, _) = setup().await;
    let ann = register(&db, "Ann", Some(4)).await;
    let repo = FinishLogRepository::new(&db);
    let id = repo.log_now().await.unwrap();

    let entry = repo.set_racer(id, Some(ann.id)).await.unwrap();
    assert_eq!(entry.racer_no_input, Some(4));

    let entry = repo.set_racer(id, None).await.unwrap();
    assert_eq!(entry.racer_no_input, None);
    assert_eq!(entry.racer_id, None);

    assert!(matches!(
        repo.set_racer(id, Some(12345)).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn test_assign_writes_log_time_as_finish() {
    let (db, clock) = setup().await;
    let racers = RacerRepository::new(&db);
    let ann = register(&db, "Ann", Some(9)).await;
    clock.set(race_day(10, 0, 0));
    racers.start(ann.id).await.unwrap();

    let repo = FinishLogRepository::new(&db);
    clock.set(race_day(10, 2, 5));
    let id = repo.log_now().await.unwrap();

    clock.set(race_day(10, 4, 0));
    repo.set_candidate_number(id, Some(9)).await.unwrap();
    let entry = repo.assign(id).await.unwrap();

    assert!(entry.assigned);
    assert_eq!(entry.assigned_time, Some(race_day(10, 4, 0)));
    let ann = racers.find_by_id(ann.id).await.unwrap();
    assert_eq!(ann.finish_time, Some(race_day(10, 2, 5)));
    assert_eq!(ann.final_time(), Some("02:05".to_string()));
}

#[tokio::test]
async fn test_assign_without_racer_fails() {
    let (db, _) = setup().await;
    let repo = FinishLogRepository::new(&db);
    let id = repo.log_now().await.unwrap();

    let err = repo.assign(id).await.unwrap_err();
    assert!(matches!(err, StorageError::User(_)));
    assert_eq!(err.to_string(), "No racer resolved for this log row.");

    repo.set_candidate_number(id, Some(77)).await.unwrap();
    assert!(matches!(repo.assign(id).await, Err(StorageError::User(_))));
}

#[tokio::test]
async fn test_assign_falls_back_to_typed_number() {
    let (db, _) = setup().await;
    let repo = FinishLogRepository::new(&db);
    let id = repo.log_now().await.unwrap();

    // typed before the racer got this number, so nothing resolved yet
    repo.set_candidate_number(id, Some(5)).await.unwrap();
    let ann = register(&db, "Ann", Some(5)).await;

    let entry = repo.assign(id).await.unwrap();
    assert_eq!(entry.racer_id, Some(ann.id));
    assert!(
        RacerRepository::new(&db)
            .find_by_id(ann.id)
            .await
            .unwrap()
            .finish_time
            .is_some()
    );
}

#[tokio::test]
async fn test_assign_to_finished_racer_changes_nothing() {
    let (db, clock) = setup().await;
    let racers = RacerRepository::new(&db);
    let ann = register(&db, "Ann", Some(3)).await;
    clock.set(race_day(10, 0, 0));
    racers.start(ann.id).await.unwrap();
    clock.set(race_day(10, 1, 0));
    racers.finish_now(ann.id).await.unwrap();

    let repo = FinishLogRepository::new(&db);
    clock.set(race_day(10, 1, 30));
    let id = repo.log_now().await.unwrap();
    repo.set_candidate_number(id, Some(3)).await.unwrap();

    let err = repo.assign(id).await.unwrap_err();
    assert_eq!(err.to_string(), "This racer already has a finish time.");

    let entry = repo.find_by_id(id).await.unwrap();
    assert!(!entry.assigned);
    assert_eq!(entry.assigned_time, None);
    assert_eq!(
        racers.find_by_id(ann.id).await.unwrap().finish_time,
        Some(race_day(10, 1, 0))
    );
}

#[tokio::test]
async fn test_assigned_entry_cannot_be_reused() {
    let (db, _) = setup().await;
    let ann = register(&db, "Ann", Some(1)).await;
    let ben = register(&db, "Ben", Some(2)).await;
    let repo = FinishLogRepository::new(&db);
    let id = repo.log_now().await.unwrap();

    repo.set_racer(id, Some(ann.id)).await.unwrap();
    repo.assign(id).await.unwrap();

    repo.set_racer(id, Some(ben.id)).await.unwrap();
    let err = repo.assign(id).await.unwrap_err();
    assert!(matches!(err, StorageError::User(_)));
    assert!(
        RacerRepository::new(&db)
            .find_by_id(ben.id)
            .await
            .unwrap()
            .finish_time
            .is_none()
    );
}

#[tokio::test]
async fn test_list_is_newest_first_with_racer_details() {
    let (db, clock) = setup().await;
    let ann = register(&db, "Ann", Some(1)).await;
    let repo = FinishLogRepository::new(&db);

    clock.set(race_day(10, 0, 0));
    let older = repo.log_now().await.unwrap();
    clock.set(race_day(10, 0, 1));
    let newer = repo.log_now().await.unwrap();
    repo.set_racer(older, Some(ann.id)).await.unwrap();

    let (entries, total) = repo.list(PaginationParams::default()).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(entries[0].id, newer);
    assert_eq!(entries[0].first_name, None);
    assert_eq!(entries[1].id, older);
    assert_eq!(entries[1].first_name.as_deref(), Some("Ann"));
    assert_eq!(entries[1].age, Some(25));

    let page = PaginationParams {
        page: 2,
        page_size: 1,
    };
    let (entries, _) = repo.list(page).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, older);
}

#[tokio::test]
async fn test_deleting_racer_keeps_log_row() {
    let (db, _) = setup().await;
    let ann = register(&db, "Ann", Some(1)).await;
    let repo = FinishLogRepository::new(&db);
    let id = repo.log_now().await.unwrap();
    repo.set_racer(id, Some(ann.id)).await.unwrap();

    RacerRepository::new(&db).delete(ann.id).await.unwrap();

    let entry = repo.find_by_id(id).await.unwrap();
    assert_eq!(entry.racer_id, None);
    assert_eq!(entry.racer_no_input, Some(1));
}
