mod common;

use chrono::Duration;
use common::{race_day, register, registration, setup};
use storage::dto::racer::{RacerNumberInput, TimeOverrideRequest, UpdateRacerRequest};
use storage::error::StorageError;
use storage::repository::racer::RacerRepository;

#[tokio::test]
async fn test_register_defaults_to_unassigned() {
    let (db, _) = setup().await;
    let racer = register(&db, "Ann", None).await;

    assert_eq!(racer.racer_no, 0);
    assert_eq!(racer.created_at, race_day(9, 0, 0));
    assert_eq!(racer.display_name(), "Ann Runner (#0)");
}

#[tokio::test]
async fn test_many_racers_may_share_zero() {
    let (db, _) = setup().await;
    register(&db, "Ann", None).await;
    register(&db, "Ben", Some(0)).await;
    register(&db, "Cid", None).await;

    let racers = RacerRepository::new(&db).list().await.unwrap();
    assert_eq!(racers.len(), 3);
    assert!(racers.iter().all(|r| r.racer_no == 0));
}

#[tokio::test]
async fn test_register_rejects_duplicate_positive_number() {
    let (db, _) = setup().await;
    register(&db, "Ann", Some(7)).await;

    let err = RacerRepository::new(&db)
        .create(&registration("Ben", Some(7)))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Validation(_)));
    assert_eq!(err.to_string(), "Racer number 7 is already used.");
    assert_eq!(RacerRepository::new(&db).list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_rejects_negative_and_non_integer_numbers() {
    let (db, _) = setup().await;
    let repo = RacerRepository::new(&db);

    let mut req = registration("Ann", None);
    req.racer_no = Some(RacerNumberInput::Integer(-1));
    assert!(matches!(repo.create(&req).await, Err(StorageError::Validation(_))));

    req.racer_no = Some(RacerNumberInput::Text("twelve".to_string()));
    assert!(matches!(repo.create(&req).await, Err(StorageError::Validation(_))));

    req.racer_no = Some(RacerNumberInput::Text(String::new()));
    assert_eq!(repo.create(&req).await.unwrap().racer_no, 0);
}

#[tokio::test]
async fn test_batch_registration_is_all_or_nothing() {
    let (db, _) = setup().await;
    register(&db, "Ann", Some(3)).await;

    let batch = vec![registration("Ben", Some(4)), registration("Cid", Some(3))];
    let err = RacerRepository::new(&db).create_many(&batch).await.unwrap_err();

    assert!(matches!(err, StorageError::Validation(_)));
    let racers = RacerRepository::new(&db).list().await.unwrap();
    assert_eq!(racers.len(), 1);
    assert_eq!(racers[0].first_name, "Ann");
}

#[tokio::test]
async fn test_update_rechecks_uniqueness_and_rolls_back() {
    let (db, _) = setup().await;
    register(&db, "Ann", Some(1)).await;
    let ben = register(&db, "Ben", Some(2)).await;
    let repo = RacerRepository::new(&db);

    let req = UpdateRacerRequest {
        first_name: Some("Benjamin".to_string()),
        racer_no: Some(RacerNumberInput::Integer(1)),
        ..Default::default()
    };
    let err = repo.update(ben.id, &req).await.unwrap_err();
    assert!(matches!(err, StorageError::Validation(_)));

    let unchanged = repo.find_by_id(ben.id).await.unwrap();
    assert_eq!(unchanged.racer_no, 2);
    assert_eq!(unchanged.first_name, "Ben");
}

#[tokio::test]
async fn test_update_can_unassign_and_edit_fields() {
    let (db, _) = setup().await;
    let ann = register(&db, "Ann", Some(5)).await;

    let req = UpdateRacerRequest {
        age: Some(12),
        racer_no: Some(RacerNumberInput::Text(String::new())),
        email: Some("ann@example.com".to_string()),
        ..Default::default()
    };
    let updated = RacerRepository::new(&db).update(ann.id, &req).await.unwrap();

    assert_eq!(updated.racer_no, 0);
    assert_eq!(updated.age, 12);
    assert_eq!(updated.category().map(|c| c.to_string()).as_deref(), Some("M10"));
    assert_eq!(updated.email.as_deref(), Some("ann@example.com"));
}

#[tokio::test]
async fn test_start_requires_number_and_happens_once() {
    let (db, clock) = setup().await;
    let repo = RacerRepository::new(&db);
    let ann = register(&db, "Ann", None).await;

    let err = repo.start(ann.id).await.unwrap_err();
    assert!(matches!(err, StorageError::User(_)));
    assert!(err.to_string().contains("assign a number first"));

    let ben = register(&db, "Ben", Some(8)).await;
    clock.set(race_day(10, 0, 0));
    let started = repo.start(ben.id).await.unwrap();
    assert_eq!(started.start_time, Some(race_day(10, 0, 0)));

    clock.advance(Duration::seconds(30));
    let err = repo.start(ben.id).await.unwrap_err();
    assert_eq!(err.to_string(), "This racer has already started.");
    assert_eq!(
        repo.find_by_id(ben.id).await.unwrap().start_time,
        Some(race_day(10, 0, 0))
    );
}

#[tokio::test]
async fn test_finish_now_requires_start_and_happens_once() {
    let (db, clock) = setup().await;
    let repo = RacerRepository::new(&db);
    let ann = register(&db, "Ann", Some(1)).await;

    let err = repo.finish_now(ann.id).await.unwrap_err();
    assert_eq!(err.to_string(), "This racer has not started yet.");

    clock.set(race_day(10, 0, 0));
    repo.start(ann.id).await.unwrap();
    clock.set(race_day(10, 2, 5));
    let finished = repo.finish_now(ann.id).await.unwrap();
    assert_eq!(finished.final_time(), Some("02:05".to_string()));

    let err = repo.finish_now(ann.id).await.unwrap_err();
    assert_eq!(err.to_string(), "This racer already has a finish time.");
}

#[tokio::test]
async fn test_time_override_bypasses_set_once_rule() {
    let (db, clock) = setup().await;
    let repo = RacerRepository::new(&db);
    let ann = register(&db, "Ann", Some(1)).await;

    clock.set(race_day(10, 0, 0));
    repo.start(ann.id).await.unwrap();
    clock.set(race_day(10, 5, 0));
    repo.finish_now(ann.id).await.unwrap();

    let req = TimeOverrideRequest {
        start_time: Some(race_day(10, 1, 0)),
        finish_time: Some(race_day(10, 4, 30)),
    };
    assert_eq!(req.preview_final_time(), Some("03:30".to_string()));
    let racer = repo.apply_times(ann.id, &req).await.unwrap();
    assert_eq!(racer.final_time(), Some("03:30".to_string()));

    let cleared = repo
        .apply_times(ann.id, &TimeOverrideRequest::default())
        .await
        .unwrap();
    assert_eq!(cleared.start_time, None);
    assert_eq!(cleared.finish_time, None);
    assert_eq!(cleared.final_time(), None);
}

#[tokio::test]
async fn test_search_by_name_and_number() {
    let (db, _) = setup().await;
    register(&db, "Annika", Some(12)).await;
    register(&db, "Bert", Some(3)).await;
    let repo = RacerRepository::new(&db);

    let by_name = repo.search("ANN").await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].first_name, "Annika");

    let by_number = repo.search("3").await.unwrap();
    assert_eq!(by_number.len(), 1);
    assert_eq!(by_number[0].first_name, "Bert");

    assert_eq!(repo.search("runner").await.unwrap().len(), 2);
    assert_eq!(repo.find_by_number(12).await.unwrap().first_name, "Annika");
    assert!(matches!(repo.find_by_number(0).await, Err(StorageError::NotFound)));
}

#[tokio::test]
async fn test_board_lists() {
    let (db, clock) = setup().await;
    let repo = RacerRepository::new(&db);
    let ann = register(&db, "Ann", Some(1)).await;
    let ben = register(&db, "Ben", Some(2)).await;
    let cid = register(&db, "Cid", Some(3)).await;

    clock.set(race_day(10, 0, 0));
    repo.start(ann.id).await.unwrap();
    clock.set(race_day(10, 0, 10));
    repo.start(ben.id).await.unwrap();
    clock.set(race_day(10, 3, 0));
    repo.finish_now(ann.id).await.unwrap();

    let waiting: Vec<i64> = repo.waiting().await.unwrap().iter().map(|r| r.id).collect();
    let on_track: Vec<i64> = repo.on_track().await.unwrap().iter().map(|r| r.id).collect();
    let finishers: Vec<i64> = repo.finishers().await.unwrap().iter().map(|r| r.id).collect();

    assert_eq!(waiting, vec![cid.id]);
    assert_eq!(on_track, vec![ben.id]);
    assert_eq!(finishers, vec![ann.id]);
}

#[tokio::test]
async fn test_delete_racer() {
    let (db, _) = setup().await;
    let ann = register(&db, "Ann", Some(1)).await;
    let repo = RacerRepository::new(&db);

    repo.delete(ann.id).await.unwrap();
    assert!(matches!(repo.find_by_id(ann.id).await, Err(StorageError::NotFound)));
    assert!(matches!(repo.delete(ann.id).await, Err(StorageError::NotFound)));

    // the freed number can be reused
    register(&db, "Ben", Some(1)).await;
}
