use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use super::dto::{
    parse_timestamp, AssignGlobalTrainingRequest, GlobalTrainingsQuery, TrainingResponse,
};
use super::{json_body, path_id, query_params, AppState};
use crate::auth::AuthenticatedUser;
use crate::error::ServiceError;
use crate::models::GlobalTraining;

pub fn global_training_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_global_trainings))
        .route("/:id", get(get_global_training))
        .route("/:id/assign", post(assign_global_training))
}

/// List templates, optionally filtered with `?level=`
pub async fn list_global_trainings(
    State(state): State<AppState>,
    query: Result<Query<GlobalTrainingsQuery>, QueryRejection>,
) -> Result<Json<Vec<GlobalTraining>>, ServiceError> {
    let query = query_params(query)?;
    let templates = state.global_training_service.list(query.level).await?;
    Ok(Json(templates))
}

pub async fn get_global_training(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<GlobalTraining>, ServiceError> {
    let template = state.global_training_service.get(path_id(id)?).await?;
    Ok(Json(template))
}

/// Copy a template into a new training of the caller
pub async fn assign_global_training(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AssignGlobalTrainingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TrainingResponse>), ServiceError> {
    let template_id = path_id(id)?;
    let request = json_body(payload)?;
    let planned_date = parse_timestamp(&request.planned_date, "planned_date")?;

    let training = state
        .global_training_service
        .assign(user.user_id, template_id, planned_date)
        .await?;
    Ok((StatusCode::CREATED, Json(training.into())))
}
