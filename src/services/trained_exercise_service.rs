use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, instrument};

use super::{load_training, storage_failure};
use crate::error::{ServiceError, ServiceResult};
use crate::models::validation::{
    validate_count, validate_entry_id, validate_exercise_id, validate_non_negative,
    validate_training_id, validate_weight,
};
use crate::models::{NewTrainedExercise, TrainedExercise, TrainedExercisePatch};
use crate::repository::TrainingRepository;

/// Performed-exercise entries owned by a training.
#[derive(Clone)]
pub struct TrainedExerciseService {
    repo: Arc<dyn TrainingRepository>,
}

fn validate_measurements(
    weight: Option<f64>,
    approaches: Option<i32>,
    reps: Option<i32>,
    time: Option<Duration>,
    doing: Option<Duration>,
    rest: Option<Duration>,
) -> ServiceResult<()> {
    validate_weight(weight)?;
    validate_count(approaches, "approaches")?;
    validate_count(reps, "reps")?;
    validate_non_negative(time, "time")?;
    validate_non_negative(doing, "doing")?;
    validate_non_negative(rest, "rest")
}

impl TrainedExerciseService {
    pub fn new(repo: Arc<dyn TrainingRepository>) -> Self {
        Self { repo }
    }

    /// Appends a new entry. The same catalog exercise may appear any number of times.
    #[instrument(
        skip(self, entry),
        fields(operation = "add_exercise", training_id = entry.training_id, exercise_id = entry.exercise_id)
    )]
    pub async fn add(&self, entry: NewTrainedExercise) -> ServiceResult<TrainedExercise> {
        validate_training_id(entry.training_id)?;
        validate_exercise_id(entry.exercise_id)?;
        validate_measurements(
            entry.weight,
            entry.approaches,
            entry.reps,
            entry.time,
            entry.doing,
            entry.rest,
        )?;

        load_training(self.repo.as_ref(), entry.training_id, "add_exercise").await?;

        let created = self
            .repo
            .add_exercise(entry)
            .await
            .map_err(storage_failure("add_exercise"))?;

        debug!(entry_id = created.id, "exercise entry added");
        Ok(created)
    }

    #[instrument(skip(self, patch), fields(operation = "update_exercise"))]
    pub async fn update_exercise(
        &self,
        entry_id: i64,
        patch: TrainedExercisePatch,
    ) -> ServiceResult<TrainedExercise> {
        validate_entry_id(entry_id)?;
        validate_measurements(
            patch.weight,
            patch.approaches,
            patch.reps,
            patch.time,
            patch.doing,
            patch.rest,
        )?;

        self.patch_entry(entry_id, &patch, "update_exercise").await
    }

    /// Mid-execution update of measurements and timers. Notes are left untouched.
    #[instrument(skip(self, patch), fields(operation = "update_exercise_time"))]
    pub async fn update_exercise_time(
        &self,
        entry_id: i64,
        patch: TrainedExercisePatch,
    ) -> ServiceResult<TrainedExercise> {
        let patch = TrainedExercisePatch {
            notes: None,
            ..patch
        };
        validate_entry_id(entry_id)?;
        validate_measurements(
            patch.weight,
            patch.approaches,
            patch.reps,
            patch.time,
            patch.doing,
            patch.rest,
        )?;

        self.patch_entry(entry_id, &patch, "update_exercise_time").await
    }

    #[instrument(skip(self), fields(operation = "update_rest_time"))]
    pub async fn update_rest_time(&self, entry_id: i64, rest: Duration) -> ServiceResult<TrainedExercise> {
        validate_entry_id(entry_id)?;
        validate_non_negative(Some(rest), "rest")?;

        self.patch_entry(entry_id, &TrainedExercisePatch::rest(rest), "update_rest_time")
            .await
    }

    #[instrument(skip(self), fields(operation = "update_doing_time"))]
    pub async fn update_doing_time(
        &self,
        entry_id: i64,
        doing: Duration,
    ) -> ServiceResult<TrainedExercise> {
        validate_entry_id(entry_id)?;
        validate_non_negative(Some(doing), "doing")?;

        self.patch_entry(entry_id, &TrainedExercisePatch::doing(doing), "update_doing_time")
            .await
    }

    /// Deletes the entry only when it belongs to `training_id`.
    #[instrument(skip(self), fields(operation = "remove_exercise"))]
    pub async fn remove(&self, training_id: i64, entry_id: i64) -> ServiceResult<()> {
        validate_training_id(training_id)?;
        validate_entry_id(entry_id)?;

        let removed = self
            .repo
            .delete_exercise(training_id, entry_id)
            .await
            .map_err(storage_failure("remove_exercise"))?;
        if !removed {
            return Err(ServiceError::not_found("trained exercise not found"));
        }

        debug!("exercise entry removed");
        Ok(())
    }

    async fn patch_entry(
        &self,
        entry_id: i64,
        patch: &TrainedExercisePatch,
        operation: &'static str,
    ) -> ServiceResult<TrainedExercise> {
        self.repo
            .update_exercise(entry_id, patch)
            .await
            .map_err(storage_failure(operation))?
            .ok_or_else(|| ServiceError::not_found("trained exercise not found"))
    }
}
