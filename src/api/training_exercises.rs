use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::{patch, post, put},
    Router,
};

use super::dto::{
    AddExerciseRequest, RemoveExerciseQuery, TrainedExerciseResponse, UpdateDoingTimeRequest,
    UpdateRestTimeRequest, UpdateTrainedExerciseRequest,
};
use super::{json_body, path_id, query_params, AppState};
use crate::error::ServiceError;

pub fn training_exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(add_exercise).delete(remove_exercise))
        .route("/:id", put(update_trained_exercise))
        .route("/:id/time", patch(update_exercise_time))
        .route("/:id/rest", patch(update_rest_time))
        .route("/:id/doing", patch(update_doing_time))
}

pub async fn add_exercise(
    State(state): State<AppState>,
    payload: Result<Json<AddExerciseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TrainedExerciseResponse>), ServiceError> {
    let entry = json_body(payload)?.into_entry()?;
    let created = state.trained_exercise_service.add(entry).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_trained_exercise(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTrainedExerciseRequest>, JsonRejection>,
) -> Result<Json<TrainedExerciseResponse>, ServiceError> {
    let id = path_id(id)?;
    let patch = json_body(payload)?.into_patch()?;
    let updated = state
        .trained_exercise_service
        .update_exercise(id, patch)
        .await?;
    Ok(Json(updated.into()))
}

pub async fn update_exercise_time(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTrainedExerciseRequest>, JsonRejection>,
) -> Result<Json<TrainedExerciseResponse>, ServiceError> {
    let id = path_id(id)?;
    let patch = json_body(payload)?.into_patch()?;
    let updated = state
        .trained_exercise_service
        .update_exercise_time(id, patch)
        .await?;
    Ok(Json(updated.into()))
}

pub async fn update_rest_time(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateRestTimeRequest>, JsonRejection>,
) -> Result<Json<TrainedExerciseResponse>, ServiceError> {
    let id = path_id(id)?;
    let rest = json_body(payload)?.duration()?;
    let updated = state
        .trained_exercise_service
        .update_rest_time(id, rest)
        .await?;
    Ok(Json(updated.into()))
}

pub async fn update_doing_time(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateDoingTimeRequest>, JsonRejection>,
) -> Result<Json<TrainedExerciseResponse>, ServiceError> {
    let id = path_id(id)?;
    let doing = json_body(payload)?.duration()?;
    let updated = state
        .trained_exercise_service
        .update_doing_time(id, doing)
        .await?;
    Ok(Json(updated.into()))
}

pub async fn remove_exercise(
    State(state): State<AppState>,
    query: Result<Query<RemoveExerciseQuery>, QueryRejection>,
) -> Result<StatusCode, ServiceError> {
    let query = query_params(query)?;
    state
        .trained_exercise_service
        .remove(query.training_id, query.exercise_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
