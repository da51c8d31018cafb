use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{load_training, save_training, storage_failure};
use crate::error::{ServiceError, ServiceResult};
use crate::models::validation::{
    validate_non_negative, validate_rating, validate_training_id, validate_user_id,
};
use crate::models::{CreateTraining, NewTraining, TimerPatch, Training, UpdateTraining};
use crate::repository::TrainingRepository;

/// Lifecycle of a training: planned, started, paused, done.
#[derive(Clone)]
pub struct TrainingService {
    repo: Arc<dyn TrainingRepository>,
}

fn validate_timers(
    total_duration: Option<chrono::Duration>,
    total_rest_time: Option<chrono::Duration>,
    total_exercise_time: Option<chrono::Duration>,
) -> ServiceResult<()> {
    validate_non_negative(total_duration, "total_duration")?;
    validate_non_negative(total_rest_time, "total_rest_time")?;
    validate_non_negative(total_exercise_time, "total_exercise_time")
}

fn ensure_owner(training: &Training, caller_id: Uuid) -> ServiceResult<()> {
    if training.user_id != caller_id {
        return Err(ServiceError::Forbidden(
            "training belongs to another user".to_string(),
        ));
    }
    Ok(())
}

impl TrainingService {
    pub fn new(repo: Arc<dyn TrainingRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, cmd), fields(operation = "create_training"))]
    pub async fn create(&self, user_id: Uuid, cmd: CreateTraining) -> ServiceResult<Training> {
        validate_user_id(user_id)?;
        let planned_date = cmd
            .planned_date
            .ok_or_else(|| ServiceError::invalid("planned date is required"))?;
        validate_timers(cmd.total_duration, cmd.total_rest_time, cmd.total_exercise_time)?;

        let training = self
            .repo
            .create_training(NewTraining {
                user_id,
                title: cmd.title,
                planned_date,
                actual_date: None,
                total_duration: cmd.total_duration,
                total_rest_time: cmd.total_rest_time,
                total_exercise_time: cmd.total_exercise_time,
            })
            .await
            .map_err(storage_failure("create_training"))?;

        info!(training_id = training.id, "training created");
        Ok(training)
    }

    #[instrument(skip(self), fields(operation = "get_training"))]
    pub async fn get(&self, training_id: i64) -> ServiceResult<Training> {
        validate_training_id(training_id)?;
        load_training(self.repo.as_ref(), training_id, "get_training").await
    }

    #[instrument(skip(self), fields(operation = "list_trainings"))]
    pub async fn list(&self, user_id: Uuid) -> ServiceResult<Vec<Training>> {
        validate_user_id(user_id)?;
        self.repo
            .list_trainings_by_owner(user_id)
            .await
            .map_err(storage_failure("list_trainings"))
    }

    /// The most recently started training that is not done yet.
    #[instrument(skip(self), fields(operation = "get_current_training"))]
    pub async fn current(&self, user_id: Uuid) -> ServiceResult<Option<Training>> {
        let trainings = self.list(user_id).await?;

        let Some(current) = trainings
            .into_iter()
            .filter(|t| t.is_started() && !t.is_done)
            .max_by_key(|t| (t.started_at, t.id))
        else {
            return Ok(None);
        };

        let training = self
            .repo
            .get_training(current.id)
            .await
            .map_err(storage_failure("get_current_training"))?;
        Ok(training)
    }

    /// Trainings planned for the current UTC calendar day.
    #[instrument(skip(self), fields(operation = "get_todays_trainings"))]
    pub async fn today(&self, user_id: Uuid) -> ServiceResult<Vec<Training>> {
        let today = Utc::now().date_naive();
        let trainings = self.list(user_id).await?;

        Ok(trainings
            .into_iter()
            .filter(|t| t.planned_date.date_naive() == today)
            .collect())
    }

    #[instrument(skip(self, patch), fields(operation = "update_training"))]
    pub async fn update(&self, training_id: i64, patch: UpdateTraining) -> ServiceResult<Training> {
        validate_training_id(training_id)?;
        validate_rating(patch.rating)?;
        validate_timers(
            patch.total_duration,
            patch.total_rest_time,
            patch.total_exercise_time,
        )?;

        let mut training = load_training(self.repo.as_ref(), training_id, "update_training").await?;
        training.apply_patch(&patch, Utc::now())?;

        save_training(self.repo.as_ref(), &training, "update_training").await
    }

    /// Idempotent: a training that already started is returned unchanged.
    ///
    /// Two concurrent calls may both see the training unstarted; the later
    /// write of `started_at` wins.
    #[instrument(skip(self), fields(operation = "start_training"))]
    pub async fn start(&self, training_id: i64, caller_id: Uuid) -> ServiceResult<Training> {
        validate_training_id(training_id)?;
        validate_user_id(caller_id)?;

        let mut training = load_training(self.repo.as_ref(), training_id, "start_training").await?;
        ensure_owner(&training, caller_id)?;

        if !training.start(Utc::now()) {
            return Ok(training);
        }

        let training = save_training(self.repo.as_ref(), &training, "start_training").await?;
        info!(training_id, "training started");
        Ok(training)
    }

    #[instrument(skip(self), fields(operation = "pause_training"))]
    pub async fn pause(&self, training_id: i64) -> ServiceResult<Training> {
        validate_training_id(training_id)?;

        let mut training = load_training(self.repo.as_ref(), training_id, "pause_training").await?;
        if !training.pause(Utc::now())? {
            return Ok(training);
        }

        let training = save_training(self.repo.as_ref(), &training, "pause_training").await?;
        info!(training_id, "training paused");
        Ok(training)
    }

    #[instrument(skip(self), fields(operation = "resume_training"))]
    pub async fn resume(&self, training_id: i64) -> ServiceResult<Training> {
        validate_training_id(training_id)?;

        let mut training = load_training(self.repo.as_ref(), training_id, "resume_training").await?;
        if !training.resume(Utc::now())? {
            return Ok(training);
        }

        let training = save_training(self.repo.as_ref(), &training, "resume_training").await?;
        info!(training_id, paused_seconds = training.paused_duration.num_seconds(), "training resumed");
        Ok(training)
    }

    #[instrument(skip(self, timers), fields(operation = "update_training_timers"))]
    pub async fn update_timers(&self, training_id: i64, timers: TimerPatch) -> ServiceResult<Training> {
        validate_training_id(training_id)?;
        validate_timers(
            timers.total_duration,
            timers.total_rest_time,
            timers.total_exercise_time,
        )?;

        self.repo
            .update_training_timers(training_id, &timers)
            .await
            .map_err(storage_failure("update_training_timers"))?
            .ok_or_else(|| ServiceError::not_found("training not found"))
    }

    #[instrument(skip(self), fields(operation = "complete_training"))]
    pub async fn complete(&self, training_id: i64, rating: Option<i32>) -> ServiceResult<Training> {
        validate_training_id(training_id)?;
        validate_rating(rating)?;

        let mut training =
            load_training(self.repo.as_ref(), training_id, "complete_training").await?;
        training.complete(Utc::now(), rating);

        let training = save_training(self.repo.as_ref(), &training, "complete_training").await?;
        info!(training_id, rating = ?training.rating, "training completed");
        Ok(training)
    }

    /// Ownership-checked completion that keeps any stored rating.
    #[instrument(skip(self), fields(operation = "mark_training_done"))]
    pub async fn mark_done(&self, training_id: i64, caller_id: Uuid) -> ServiceResult<Training> {
        validate_training_id(training_id)?;
        validate_user_id(caller_id)?;

        let mut training =
            load_training(self.repo.as_ref(), training_id, "mark_training_done").await?;
        ensure_owner(&training, caller_id)?;

        if training.is_done {
            return Ok(training);
        }
        training.finish(Utc::now());

        let training = save_training(self.repo.as_ref(), &training, "mark_training_done").await?;
        info!(training_id, "training marked as done");
        Ok(training)
    }

    #[instrument(skip(self), fields(operation = "delete_training"))]
    pub async fn delete(&self, training_id: i64) -> ServiceResult<()> {
        validate_training_id(training_id)?;

        let deleted = self
            .repo
            .delete_training(training_id)
            .await
            .map_err(storage_failure("delete_training"))?;
        if !deleted {
            return Err(ServiceError::not_found("training not found"));
        }

        info!(training_id, "training deleted");
        Ok(())
    }
}
