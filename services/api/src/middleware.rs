//! Bearer-token verification and role gating.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::error::ApiError;
use crate::jwt::JwtError;
use crate::models::{AuthUser, Role};
use crate::state::AppState;

/// Verify the `Authorization: Bearer` header and return the normalized
/// identity.
///
/// The user row is re-fetched on every request: a deleted account fails
/// immediately and a role change takes effect without reissuing the token.
/// Failure modes stay distinct: bad or absent credentials are 401, while a
/// misconfigured signing secret is a 500 so operators are pointed at the
/// deployment rather than the caller's credentials.
pub async fn verify_bearer(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    if token.trim().is_empty() {
        return Err(ApiError::Unauthorized);
    }

    let claims = state.jwt_service.verify(token).map_err(|e| match e {
        JwtError::Misconfigured => {
            error!("JWT secret is not configured");
            ApiError::Configuration
        }
        _ => ApiError::Unauthorized,
    })?;

    // Claims are only a hint; the row is the source of truth.
    let user = state
        .user_repository
        .find_by_id(claims.sub)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(AuthUser {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
    })
}

/// Middleware layered on protected routers: verifies the token and inserts
/// the [`AuthUser`] into request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = verify_bearer(&state, req.headers()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Flat per-route role check. No hierarchy: admin is not accountant.
pub fn require_role(user: &AuthUser, role: Role) -> Result<(), ApiError> {
    if user.role == role {
        return Ok(());
    }

    let message = match role {
        Role::Accountant => "Unauthorized. Accountant role required.",
        Role::Admin => "Unauthorized. Admin role required.",
        Role::User => "Unauthorized.",
    };
    Err(ApiError::Forbidden(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn auth_user(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            username: "maya".to_string(),
            email: "maya@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn role_gate_matches_exactly() {
        assert!(require_role(&auth_user(Role::Accountant), Role::Accountant).is_ok());
        assert!(require_role(&auth_user(Role::Admin), Role::Admin).is_ok());

        // No hierarchy in either direction.
        assert!(require_role(&auth_user(Role::Admin), Role::Accountant).is_err());
        assert!(require_role(&auth_user(Role::User), Role::Admin).is_err());
    }

    #[test]
    fn accountant_gate_message_is_stable() {
        let err = require_role(&auth_user(Role::User), Role::Accountant).unwrap_err();
        match err {
            ApiError::Forbidden(msg) => {
                assert_eq!(msg, "Unauthorized. Accountant role required.")
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }
}
