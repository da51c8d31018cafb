use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use super::storage_failure;
use crate::error::{ServiceError, ServiceResult};
use crate::models::validation::{validate_global_training_id, validate_user_id};
use crate::models::{GlobalTraining, NewTraining, Training};
use crate::repository::TrainingRepository;

/// Read access to shared templates and their instantiation as user trainings.
#[derive(Clone)]
pub struct GlobalTrainingService {
    repo: Arc<dyn TrainingRepository>,
}

impl GlobalTrainingService {
    pub fn new(repo: Arc<dyn TrainingRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self), fields(operation = "list_global_trainings"))]
    pub async fn list(&self, level: Option<String>) -> ServiceResult<Vec<GlobalTraining>> {
        if level.as_deref().is_some_and(|level| level.trim().is_empty()) {
            return Err(ServiceError::invalid("level cannot be empty"));
        }

        self.repo
            .list_global_trainings(level)
            .await
            .map_err(storage_failure("list_global_trainings"))
    }

    #[instrument(skip(self), fields(operation = "get_global_training"))]
    pub async fn get(&self, id: i64) -> ServiceResult<GlobalTraining> {
        validate_global_training_id(id)?;

        self.repo
            .get_global_training(id)
            .await
            .map_err(storage_failure("get_global_training"))?
            .ok_or_else(|| ServiceError::not_found("global training not found"))
    }

    /// Copies a template into a new training owned by `user_id`.
    ///
    /// The training and all of its entry stubs are created in one transaction.
    /// `actual_date` is set only when `planned_date` falls on today's UTC date.
    #[instrument(skip(self), fields(operation = "assign_global_training"))]
    pub async fn assign(
        &self,
        user_id: Uuid,
        template_id: i64,
        planned_date: DateTime<Utc>,
    ) -> ServiceResult<Training> {
        validate_user_id(user_id)?;
        validate_global_training_id(template_id)?;

        let template = self.get(template_id).await?;

        let now = Utc::now();
        let actual_date = (planned_date.date_naive() == now.date_naive()).then_some(now);

        let training = self
            .repo
            .create_training_with_exercises(
                NewTraining {
                    user_id,
                    title: template.title.clone(),
                    planned_date,
                    actual_date,
                    total_duration: None,
                    total_rest_time: None,
                    total_exercise_time: None,
                },
                template.exercise_ids(),
            )
            .await
            .map_err(storage_failure("assign_global_training"))?;

        info!(
            training_id = training.id,
            exercises = training.exercises.len(),
            "global training assigned"
        );
        Ok(training)
    }
}
