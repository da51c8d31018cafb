mod common;

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use sqlx::PgPool;
use uuid::Uuid;

use trainings::config::run_migrations;
use trainings::models::{NewTrainedExercise, NewTraining, TimerPatch, TrainedExercisePatch};
use trainings::repository::{PgTrainingRepository, TrainingRepository};

/// Connects to `TEST_DATABASE_URL`; returns `None` so the test can skip when no database is around.
async fn test_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = match PgPool::connect(&database_url).await {
        Ok(pool) => pool,
        Err(_) => {
            println!("Test database not available, skipping integration test");
            return None;
        }
    };
    run_migrations(&pool).await.expect("Failed to run migrations");
    Some(pool)
}

fn new_training(user_id: Uuid) -> NewTraining {
    NewTraining {
        user_id,
        title: "Legs".to_string(),
        planned_date: common::planned_at(),
        actual_date: None,
        total_duration: Some(Duration::minutes(45)),
        total_rest_time: None,
        total_exercise_time: None,
    }
}

#[tokio::test]
async fn test_training_round_trip_with_nested_exercises() {
    let Some(pool) = test_pool().await else { return };
    let repo = PgTrainingRepository::new(pool);

    let created = repo.create_training(new_training(Uuid::new_v4())).await.unwrap();
    repo.add_exercise(NewTrainedExercise {
        weight: Some(62.5),
        reps: Some(8),
        rest: Some(Duration::seconds(90)),
        ..NewTrainedExercise::stub(created.id, 7)
    })
    .await
    .unwrap();
    repo.add_exercise(NewTrainedExercise::stub(created.id, 7))
        .await
        .unwrap();

    let loaded = repo.get_training(created.id).await.unwrap().unwrap();
    assert_eq!(loaded.total_duration, Some(Duration::minutes(45)));
    assert_eq!(loaded.exercises.len(), 2);
    assert_eq!(loaded.exercises[0].weight, Some(62.5));
    assert_eq!(loaded.exercises[0].rest, Some(Duration::seconds(90)));
    assert_eq!(loaded.exercises[1].reps, None);

    let mut started = loaded.clone();
    started.started_at = Some(Utc::now());
    started.is_paused = true;
    started.paused_at = started.started_at;
    let saved = repo.update_training(&started).await.unwrap().unwrap();
    assert!(saved.is_paused);

    assert!(repo.delete_training(created.id).await.unwrap());
    assert!(repo.get_training(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_with_exercises_is_atomic() {
    let Some(pool) = test_pool().await else { return };
    let repo = PgTrainingRepository::new(pool);
    let owner = Uuid::new_v4();

    let training = repo
        .create_training_with_exercises(new_training(owner), vec![4, 5, 4])
        .await
        .unwrap();

    let ids: Vec<_> = training.exercises.iter().map(|e| e.exercise_id).collect();
    assert_eq!(ids, vec![4, 5, 4]);
    assert_eq!(repo.list_trainings_by_owner(owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_write_read_before_completion_does_not_reopen() {
    let Some(pool) = test_pool().await else { return };
    let repo = PgTrainingRepository::new(pool);

    let created = repo.create_training(new_training(Uuid::new_v4())).await.unwrap();
    let mut stale = repo.get_training(created.id).await.unwrap().unwrap();

    let mut done = stale.clone();
    done.complete(Utc::now(), Some(5));
    repo.update_training(&done).await.unwrap();

    stale.start(Utc::now());
    let stored = repo.update_training(&stale).await.unwrap().unwrap();
    assert!(stored.is_done);
    assert_eq!(stored.rating, Some(5));

    let timed = repo
        .update_training_timers(
            created.id,
            &TimerPatch {
                total_rest_time: Some(Duration::minutes(3)),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(timed.is_done);
    assert_eq!(timed.rating, Some(5));
    assert_eq!(timed.total_duration, Some(Duration::minutes(45)));
    assert_eq!(timed.total_rest_time, Some(Duration::minutes(3)));
}

#[tokio::test]
async fn test_entry_patch_keeps_unsupplied_columns() {
    let Some(pool) = test_pool().await else { return };
    let repo = PgTrainingRepository::new(pool);

    let created = repo.create_training(new_training(Uuid::new_v4())).await.unwrap();
    let entry = repo
        .add_exercise(NewTrainedExercise {
            reps: Some(8),
            ..NewTrainedExercise::stub(created.id, 7)
        })
        .await
        .unwrap();

    repo.update_exercise(entry.id, &TrainedExercisePatch::rest(Duration::seconds(45)))
        .await
        .unwrap();
    let stored = repo
        .update_exercise(entry.id, &TrainedExercisePatch::doing(Duration::seconds(30)))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stored.rest, Some(Duration::seconds(45)));
    assert_eq!(stored.doing, Some(Duration::seconds(30)));
    assert_eq!(stored.reps, Some(8));
    assert!(repo
        .update_exercise(i64::MAX, &TrainedExercisePatch::default())
        .await
        .unwrap()
        .is_none());
}
