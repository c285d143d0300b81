//! Sign-in and token verification.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::jwt::JwtError;
use crate::middleware::verify_bearer;
use crate::models::UserSummary;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// `expires_at` is the token's absolute expiry in unix milliseconds, the
/// same instant as the token's `exp` claim. Clients mirror it instead of
/// guessing a lifetime of their own.
#[derive(Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: UserSummary,
}

/// Sign-in endpoint. Unknown email and wrong password produce the same
/// 401 so the two cases cannot be told apart.
pub async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !crate::repositories::verify_password(&user.password_hash, &payload.password) {
        warn!(email = %payload.email, "failed sign-in attempt");
        return Err(ApiError::InvalidCredentials);
    }

    let (token, exp_secs) = state
        .jwt_service
        .issue(&user, payload.remember_me)
        .map_err(|e| match e {
            JwtError::Misconfigured => {
                error!("JWT secret is not configured");
                ApiError::Configuration
            }
            _ => {
                error!("failed to issue token: {}", e);
                ApiError::Internal
            }
        })?;

    info!(username = %user.username, remember_me = payload.remember_me, "user signed in");

    let response = SignInResponse {
        token,
        expires_at: exp_secs as i64 * 1000,
        user: user.summary(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Token verification endpoint. Returns the current identity so clients
/// can restore a session from a stored token.
pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let user = verify_bearer(&state, &headers).await?;

    Ok(Json(json!({
        "valid": true,
        "user": user,
    })))
}
