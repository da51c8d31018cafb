use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use super::AuthError;

const VALIDATE_PATH: &str = "/auth/v1/validate";
const VALIDATE_TIMEOUT: Duration = Duration::from_secs(2);

/// Identity of the caller, resolved once per request by [`super::require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    user_id: String,
}

/// Thin client for the token validation endpoint of the auth service.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(VALIDATE_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Forwards the caller's `Authorization` header and returns the user it belongs to.
    pub async fn validate(&self, authorization: &str) -> Result<AuthenticatedUser, AuthError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, VALIDATE_PATH))
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "auth service request failed");
                AuthError::Unavailable(err)
            })?;

        if response.status() != reqwest::StatusCode::OK {
            debug!(status = %response.status(), "token rejected by auth service");
            return Err(AuthError::InvalidToken);
        }

        let body: ValidateResponse = response.json().await.map_err(|_| AuthError::BadResponse)?;
        let user_id = Uuid::parse_str(&body.user_id).map_err(|_| AuthError::BadResponse)?;

        Ok(AuthenticatedUser { user_id })
    }
}

/// Case-insensitive `Bearer ` prefix check on a raw header value.
pub(crate) fn is_bearer(header: &str) -> bool {
    header.len() > 7 && header.is_char_boundary(7) && header[..7].eq_ignore_ascii_case("bearer ")
}
