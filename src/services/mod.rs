// Business logic services

pub mod global_training_service;
pub mod time_accounting_service;
pub mod trained_exercise_service;
pub mod training_service;

pub use global_training_service::GlobalTrainingService;
pub use time_accounting_service::TimeAccountingService;
pub use trained_exercise_service::TrainedExerciseService;
pub use training_service::TrainingService;

use tracing::error;

use crate::error::{ServiceError, ServiceResult};
use crate::models::Training;
use crate::repository::{RepositoryError, TrainingRepository};

/// Logs a failed store call with its operation name and surfaces it as an internal error.
pub(crate) fn storage_failure(operation: &'static str) -> impl FnOnce(RepositoryError) -> ServiceError {
    move |err| {
        error!(operation, error = %err, "storage call failed");
        ServiceError::Internal(err)
    }
}

pub(crate) async fn load_training(
    repo: &dyn TrainingRepository,
    training_id: i64,
    operation: &'static str,
) -> ServiceResult<Training> {
    repo.get_training(training_id)
        .await
        .map_err(storage_failure(operation))?
        .ok_or_else(|| ServiceError::not_found("training not found"))
}

pub(crate) async fn save_training(
    repo: &dyn TrainingRepository,
    training: &Training,
    operation: &'static str,
) -> ServiceResult<Training> {
    repo.update_training(training)
        .await
        .map_err(storage_failure(operation))?
        .ok_or_else(|| ServiceError::not_found("training not found"))
}
