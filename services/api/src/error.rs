//! Error taxonomy for the API service.
//!
//! Flat and HTTP-status-driven: validation 400, missing/invalid credentials
//! 401, wrong role 403, missing rows 404, unique-key collisions 409, and
//! everything else 500. Internal detail is logged server-side and never
//! returned to the caller.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error type shared by every route handler.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed, missing, or out-of-range input.
    #[error("{0}")]
    Validation(String),

    /// Missing, malformed, expired, or otherwise unusable credentials.
    #[error("Unauthorized")]
    Unauthorized,

    /// Sign-in failure. One message whether the email is unknown or the
    /// password is wrong, so accounts cannot be enumerated.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Authenticated, but the role (or ownership) does not permit this.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Unique-key collision on a human-chosen identifier.
    #[error("{0}")]
    Conflict(String),

    /// The deployment is broken (e.g. signing secret unset). Distinct from
    /// Unauthorized so operators see "fix your deployment", not "bad login".
    #[error("Server configuration error")]
    Configuration,

    #[error("Internal server error")]
    Internal,

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Map a database error to a 409 with the given message when it is a
    /// unique violation, and to a generic 500 otherwise.
    pub fn conflict_or_db(err: sqlx::Error, conflict_message: &str) -> Self {
        if is_unique_violation(&err) {
            ApiError::Conflict(conflict_message.to_string())
        } else {
            ApiError::Database(err)
        }
    }
}

/// True when the error is PostgreSQL's unique-constraint violation (23505).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

impl From<common::error::DatabaseError> for ApiError {
    fn from(err: common::error::DatabaseError) -> Self {
        error!("infrastructure error: {}", err);
        ApiError::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Configuration => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error".to_string(),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Database(err) => {
                error!("database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Io(err) => {
                error!("filesystem error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        let cases = [
            (ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ApiError::Configuration, StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn row_not_found_is_not_a_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
