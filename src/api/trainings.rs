use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, patch, post},
    Router,
};

use super::dto::{
    CompleteTrainingRequest, CreateTrainingRequest, TrainingResponse, TrainingStatsResponse,
    UpdateTrainingRequest, UpdateTrainingTimersRequest,
};
use super::{json_body, path_id, AppState};
use crate::auth::AuthenticatedUser;
use crate::error::ServiceError;
use crate::models::TrainingTime;

pub fn training_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trainings).post(create_training))
        .route("/stats", get(get_user_training_stats))
        .route("/current", get(get_current_training))
        .route("/today", get(get_todays_trainings))
        .route(
            "/:id",
            get(get_training).put(update_training).delete(delete_training),
        )
        .route("/:id/start", post(start_training))
        .route("/:id/pause", post(pause_training))
        .route("/:id/resume", post(resume_training))
        .route("/:id/done", post(mark_training_done))
        .route("/:id/complete", patch(complete_training))
        .route("/:id/timers", patch(update_training_timers))
        .route("/:id/stats", get(get_training_stats))
        .route("/:id/total-time", get(get_training_total_time))
}

fn respond_many(trainings: Vec<crate::models::Training>) -> Json<Vec<TrainingResponse>> {
    Json(trainings.into_iter().map(TrainingResponse::from).collect())
}

/// List the caller's trainings, newest planned first
pub async fn list_trainings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<TrainingResponse>>, ServiceError> {
    let trainings = state.training_service.list(user.user_id).await?;
    Ok(respond_many(trainings))
}

pub async fn create_training(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateTrainingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TrainingResponse>), ServiceError> {
    let cmd = json_body(payload)?.into_command()?;
    let training = state.training_service.create(user.user_id, cmd).await?;
    Ok((StatusCode::CREATED, Json(training.into())))
}

pub async fn get_user_training_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<TrainingStatsResponse>, ServiceError> {
    let stats = state
        .time_accounting_service
        .get_user_training_stats(user.user_id)
        .await?;
    Ok(Json(stats.into()))
}

/// The training in progress, or 204 when nothing is running
pub async fn get_current_training(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Response, ServiceError> {
    let response = match state.training_service.current(user.user_id).await? {
        Some(training) => Json(TrainingResponse::from(training)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}

pub async fn get_todays_trainings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<TrainingResponse>>, ServiceError> {
    let trainings = state.training_service.today(user.user_id).await?;
    Ok(respond_many(trainings))
}

pub async fn get_training(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TrainingResponse>, ServiceError> {
    let training = state.training_service.get(path_id(id)?).await?;
    Ok(Json(training.into()))
}

pub async fn update_training(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTrainingRequest>, JsonRejection>,
) -> Result<Json<TrainingResponse>, ServiceError> {
    let id = path_id(id)?;
    let patch = json_body(payload)?.into_patch()?;
    let training = state.training_service.update(id, patch).await?;
    Ok(Json(training.into()))
}

pub async fn delete_training(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ServiceError> {
    state.training_service.delete(path_id(id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn start_training(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TrainingResponse>, ServiceError> {
    let training = state
        .training_service
        .start(path_id(id)?, user.user_id)
        .await?;
    Ok(Json(training.into()))
}

pub async fn pause_training(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TrainingResponse>, ServiceError> {
    let training = state.training_service.pause(path_id(id)?).await?;
    Ok(Json(training.into()))
}

pub async fn resume_training(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TrainingResponse>, ServiceError> {
    let training = state.training_service.resume(path_id(id)?).await?;
    Ok(Json(training.into()))
}

pub async fn mark_training_done(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TrainingResponse>, ServiceError> {
    let training = state
        .training_service
        .mark_done(path_id(id)?, user.user_id)
        .await?;
    Ok(Json(training.into()))
}

pub async fn complete_training(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CompleteTrainingRequest>, JsonRejection>,
) -> Result<Json<TrainingResponse>, ServiceError> {
    let id = path_id(id)?;
    let request = json_body(payload)?;
    let training = state.training_service.complete(id, request.rating).await?;
    Ok(Json(training.into()))
}

pub async fn update_training_timers(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTrainingTimersRequest>, JsonRejection>,
) -> Result<Json<TrainingResponse>, ServiceError> {
    let id = path_id(id)?;
    let timers = json_body(payload)?.into_patch()?;
    let training = state.training_service.update_timers(id, timers).await?;
    Ok(Json(training.into()))
}

pub async fn get_training_stats(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TrainingStatsResponse>, ServiceError> {
    let stats = state
        .time_accounting_service
        .get_training_stats(path_id(id)?)
        .await?;
    Ok(Json(stats.into()))
}

pub async fn get_training_total_time(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TrainingTime>, ServiceError> {
    let time = state
        .time_accounting_service
        .calculate_training_total_time(path_id(id)?)
        .await?;
    Ok(Json(time))
}
