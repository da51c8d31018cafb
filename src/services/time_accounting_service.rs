use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use super::{load_training, storage_failure};
use crate::error::ServiceResult;
use crate::models::validation::{validate_training_id, validate_user_id};
use crate::models::{TrainingStats, TrainingTime};
use crate::repository::TrainingRepository;

/// Derived duration and rating aggregates. Nothing here is persisted.
#[derive(Clone)]
pub struct TimeAccountingService {
    repo: Arc<dyn TrainingRepository>,
}

impl TimeAccountingService {
    pub fn new(repo: Arc<dyn TrainingRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self), fields(operation = "calculate_training_total_time"))]
    pub async fn calculate_training_total_time(&self, training_id: i64) -> ServiceResult<TrainingTime> {
        validate_training_id(training_id)?;

        let training =
            load_training(self.repo.as_ref(), training_id, "calculate_training_total_time").await?;
        let time = TrainingTime::from_exercises(&training.exercises);

        debug!(
            entries = training.exercises.len(),
            total_seconds = time.total_seconds,
            "training time calculated"
        );
        Ok(time)
    }

    #[instrument(skip(self), fields(operation = "get_training_stats"))]
    pub async fn get_training_stats(&self, training_id: i64) -> ServiceResult<TrainingStats> {
        validate_training_id(training_id)?;

        let training = load_training(self.repo.as_ref(), training_id, "get_training_stats").await?;
        Ok(TrainingStats::for_training(&training))
    }

    #[instrument(skip(self), fields(operation = "get_user_training_stats"))]
    pub async fn get_user_training_stats(&self, user_id: Uuid) -> ServiceResult<TrainingStats> {
        validate_user_id(user_id)?;

        let trainings = self
            .repo
            .list_trainings_by_owner(user_id)
            .await
            .map_err(storage_failure("get_user_training_stats"))?;
        let stats = TrainingStats::for_user(&trainings);

        debug!(
            total_trainings = stats.total_trainings,
            completed_trainings = stats.completed_trainings,
            "user training stats calculated"
        );
        Ok(stats)
    }
}
