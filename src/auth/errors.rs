use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Every variant rejects the request with 401; the code tells callers why.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingBearer,
    #[error("Auth service unavailable")]
    Unavailable(#[source] reqwest::Error),
    #[error("Invalid token")]
    InvalidToken,
    #[error("Malformed auth service response")]
    BadResponse,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingBearer => "no_bearer",
            AuthError::Unavailable(_) => "auth_unavailable",
            AuthError::InvalidToken => "invalid_token",
            AuthError::BadResponse => "bad_auth_response",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.code(),
            "message": self.to_string(),
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
