//! HTTP client for the site API.
//!
//! Wraps `reqwest` and the [`SessionStore`]: every call attaches the stored
//! bearer token, and the login flow verifies the token actually committed to
//! storage before it reports success. Prior builds occasionally navigated
//! away before the storage write landed, leaving a half-authenticated
//! session, so the read-back loop is part of the contract.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::store::{KeyValueStore, SessionStore};

/// Errors surfaced to client callers.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("session storage is unavailable")]
    StorageUnavailable,

    #[error("authentication token was not persisted")]
    StorageVerification,
}

/// The user summary the server returns alongside a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
}

#[derive(Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    remember_me: bool,
}

#[derive(Deserialize)]
struct SignInResponse {
    token: String,
    /// Unix millis, mirrors the signed token's own expiry.
    expires_at: i64,
    user: UserProfile,
}

#[derive(Deserialize)]
struct VerifyResponse {
    valid: bool,
    user: Option<UserProfile>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// API client bound to a base URL and a session store.
pub struct ApiClient<S: KeyValueStore> {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore<S>,
}

impl<S: KeyValueStore> ApiClient<S> {
    pub fn new(base_url: impl Into<String>, session: SessionStore<S>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn error_from(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|b| b.error)
            .unwrap_or_else(|_| "unexpected server response".to_string());
        ClientError::Api { status, message }
    }

    /// Sign in and persist the session.
    ///
    /// The token is stored with the server-mirrored expiry, read back,
    /// compared, re-checked after a short delay, and only then is the login
    /// considered complete.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<UserProfile, ClientError> {
        if !self.session.is_available() {
            return Err(ClientError::StorageUnavailable);
        }

        let response = self
            .http
            .post(self.url("/api/auth/signin"))
            .json(&SignInRequest {
                email,
                password,
                remember_me,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: SignInResponse = response.json().await?;

        if !self
            .session
            .set_token(&body.token, body.expires_at, remember_me)
        {
            return Err(ClientError::StorageVerification);
        }

        // Storage commits can lag behind the write on some backends. Re-read
        // after a short delay and refuse to proceed half-authenticated.
        tokio::time::sleep(Duration::from_millis(100)).await;
        if self.session.auth_token().as_deref() != Some(body.token.as_str()) {
            self.session.clear();
            return Err(ClientError::StorageVerification);
        }

        let profile = serde_json::to_value(&body.user).unwrap_or_default();
        self.session.set_user(&profile);
        self.session.set_authenticated(true);

        info!(username = %body.user.username, "login complete");
        Ok(body.user)
    }

    /// Ask the server whether the stored token is still good.
    pub async fn verify(&self) -> Result<Option<UserProfile>, ClientError> {
        let Some(token) = self.session.auth_token() else {
            return Ok(None);
        };

        let response = self
            .http
            .get(self.url("/api/auth/verify"))
            .bearer_auth(&token)
            .send()
            .await?;

        if response.status().as_u16() == 401 {
            self.session.clear();
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: VerifyResponse = response.json().await?;
        Ok(if body.valid { body.user } else { None })
    }

    /// GET a JSON resource, attaching the bearer token when one is stored.
    pub async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let mut request = self.http.get(self.url(path));
        if let Some(token) = self.session.auth_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    /// POST a JSON body, attaching the bearer token when one is stored.
    pub async fn post_json<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(token) = self.session.auth_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    /// Drop the local session. The token itself is stateless, the server
    /// keeps no revocation list.
    pub fn logout(&self) {
        self.session.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn login_fails_fast_when_storage_is_unavailable() {
        let client = ApiClient::new(
            "http://localhost:0",
            SessionStore::new(MemoryStore::read_only()),
        );
        let err = client
            .login("a@b.com", "secret", false)
            .await
            .expect_err("login must not proceed without storage");
        assert!(matches!(err, ClientError::StorageUnavailable));
    }

    #[tokio::test]
    async fn verify_without_a_stored_token_skips_the_network() {
        // Base URL points nowhere; the call must short-circuit on the
        // missing token before any request is made.
        let client = ApiClient::new("http://localhost:0", SessionStore::new(MemoryStore::new()));
        let result = client.verify().await.expect("no token means None");
        assert!(result.is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://api.local/", SessionStore::new(MemoryStore::new()));
        assert_eq!(client.url("/api/blogs"), "http://api.local/api/blogs");
    }
}
