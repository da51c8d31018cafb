use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use super::client::is_bearer;
use crate::api::AppState;
use crate::auth::AuthError;

/// Resolves the caller through the auth service and stores an
/// [`crate::auth::AuthenticatedUser`] in the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .filter(|header| is_bearer(header))
        .ok_or(AuthError::MissingBearer)?
        .to_string();

    let user = state.auth_client.validate(&authorization).await?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
