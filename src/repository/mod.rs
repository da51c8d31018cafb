//! Persistence port for trainings and their performed exercises.
//!
//! Services only ever see fully typed [`Training`] values; row decoding of
//! nested exercises stays inside the adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    GlobalTraining, NewTrainedExercise, NewTraining, TimerPatch, TrainedExercise,
    TrainedExercisePatch, Training,
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryTrainingRepository;
pub use postgres::PgTrainingRepository;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Malformed row: {0}")]
    Decode(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Durable storage for trainings.
///
/// Every method is a single atomic store operation, except
/// [`TrainingRepository::create_training_with_exercises`] and
/// [`TrainingRepository::delete_training`] which run in one transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrainingRepository: Send + Sync {
    async fn create_training(&self, training: NewTraining) -> RepositoryResult<Training>;

    /// Loads a training together with its exercises in insertion order.
    async fn get_training(&self, training_id: i64) -> RepositoryResult<Option<Training>>;

    /// Trainings of one owner, newest planned date first, without exercises.
    async fn list_trainings_by_owner(&self, user_id: Uuid) -> RepositoryResult<Vec<Training>>;

    /// Writes every scalar field of the training. Returns `None` when the row is gone.
    ///
    /// A write of a not-done training never lands on a row that is already done:
    /// the stored training is returned unchanged instead.
    async fn update_training(&self, training: &Training) -> RepositoryResult<Option<Training>>;

    /// Overwrites only the supplied timer columns.
    async fn update_training_timers(
        &self,
        training_id: i64,
        timers: &TimerPatch,
    ) -> RepositoryResult<Option<Training>>;

    /// Removes the training and all of its exercises. Returns `false` when nothing matched.
    async fn delete_training(&self, training_id: i64) -> RepositoryResult<bool>;

    async fn add_exercise(&self, exercise: NewTrainedExercise) -> RepositoryResult<TrainedExercise>;

    /// Merges the supplied fields into the stored entry in one statement.
    async fn update_exercise(
        &self,
        entry_id: i64,
        patch: &TrainedExercisePatch,
    ) -> RepositoryResult<Option<TrainedExercise>>;

    /// Deletes the entry only if it belongs to `training_id`.
    async fn delete_exercise(&self, training_id: i64, entry_id: i64) -> RepositoryResult<bool>;

    async fn list_global_trainings(
        &self,
        level: Option<String>,
    ) -> RepositoryResult<Vec<GlobalTraining>>;

    async fn get_global_training(&self, id: i64) -> RepositoryResult<Option<GlobalTraining>>;

    /// Inserts the training and one stub entry per exercise id atomically.
    async fn create_training_with_exercises(
        &self,
        training: NewTraining,
        exercise_ids: Vec<i64>,
    ) -> RepositoryResult<Training>;
}
