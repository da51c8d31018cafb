use axum::{
    http::{header::X_CONTENT_TYPE_OPTIONS, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use super::global_trainings::global_training_routes;
use super::health::health_check;
use super::training_exercises::training_exercise_routes;
use super::trainings::training_routes;
use super::AppState;
use crate::auth::require_auth;

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the service router. Everything under `/api/v1` requires a bearer token.
///
/// Known exposure: only start and mark-done check that the caller owns the
/// training. Any authenticated caller can update, pause, resume, complete,
/// delete or edit the exercises of another user's training by id.
pub fn create_routes(state: AppState) -> Router {
    let api = Router::new()
        .nest("/trainings", training_routes())
        .nest("/training-exercises", training_exercise_routes())
        .nest("/global-trainings", global_training_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
