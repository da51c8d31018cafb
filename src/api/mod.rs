// API routes and handlers

pub mod dto;
pub mod global_trainings;
pub mod health;
pub mod routes;
pub mod training_exercises;
pub mod trainings;

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Json, Path, Query};

use crate::auth::AuthClient;
use crate::error::{ServiceError, ServiceResult};
use crate::repository::TrainingRepository;
use crate::services::{
    GlobalTrainingService, TimeAccountingService, TrainedExerciseService, TrainingService,
};

pub use routes::create_routes;

#[derive(Clone)]
pub struct AppState {
    pub training_service: TrainingService,
    pub trained_exercise_service: TrainedExerciseService,
    pub time_accounting_service: TimeAccountingService,
    pub global_training_service: GlobalTrainingService,
    pub auth_client: AuthClient,
}

impl AppState {
    pub fn new(repo: Arc<dyn TrainingRepository>, auth_client: AuthClient) -> Self {
        Self {
            training_service: TrainingService::new(repo.clone()),
            trained_exercise_service: TrainedExerciseService::new(repo.clone()),
            time_accounting_service: TimeAccountingService::new(repo.clone()),
            global_training_service: GlobalTrainingService::new(repo),
            auth_client,
        }
    }
}

// Extractor rejections are reported in the same JSON shape as service errors.

pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ServiceResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ServiceError::invalid(rejection.body_text()))
}

pub(crate) fn path_id(id: Result<Path<i64>, PathRejection>) -> ServiceResult<i64> {
    id.map(|Path(id)| id)
        .map_err(|_| ServiceError::invalid("id must be an integer"))
}

pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> ServiceResult<T> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| ServiceError::invalid(rejection.body_text()))
}
