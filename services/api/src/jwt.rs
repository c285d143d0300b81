//! Stateless bearer tokens.
//!
//! Tokens are signed with a single HS256 secret and carry the identity
//! claims plus an expiry. There is no server-side session table and no
//! revocation list: a token dies when its `exp` passes, and the client
//! mirrors the same `expires_at` locally so both sides agree on the
//! lifetime. The lifetime is chosen at sign-in: one day by default, seven
//! days with "remember me".

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Role, User};

/// Placeholder value that must never be used as a live secret.
const PLACEHOLDER_SECRET: &str = "change-me-in-production";

const DEFAULT_SESSION_TTL_SECS: u64 = 86_400; // 1 day
const DEFAULT_REMEMBER_TTL_SECS: u64 = 604_800; // 7 days

#[derive(Error, Debug)]
pub enum JwtError {
    /// The signing secret is unset, empty, or still the placeholder. This is
    /// a deployment problem, not a credential problem.
    #[error("JWT secret is not configured")]
    Misconfigured,

    /// Bad signature, expired, or otherwise unusable token.
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("system clock is before the unix epoch")]
    Clock,
}

/// Signing configuration read from the environment.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds without "remember me" (`JWT_SESSION_TTL`).
    pub session_ttl_secs: u64,
    /// Token lifetime in seconds with "remember me" (`JWT_REMEMBER_TTL`).
    pub remember_ttl_secs: u64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` and the optional TTL overrides. The secret is
    /// required; refusing to start beats signing with a known-weak default.
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let config = Self {
            secret,
            session_ttl_secs: std::env::var("JWT_SESSION_TTL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),
            remember_ttl_secs: std::env::var("JWT_REMEMBER_TTL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_REMEMBER_TTL_SECS),
        };

        if !config.secret_is_usable() {
            anyhow::bail!("JWT_SECRET is empty or still set to the placeholder value");
        }

        Ok(config)
    }

    fn secret_is_usable(&self) -> bool {
        !self.secret.trim().is_empty() && self.secret != PLACEHOLDER_SECRET
    }
}

/// Identity claims embedded in every token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub iat: u64,
    pub exp: u64,
}

/// Signs and verifies bearer tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    fn now() -> Result<u64, JwtError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|_| JwtError::Clock)
    }

    /// Token lifetime in seconds for the given "remember me" choice. The
    /// same value feeds both the `exp` claim and the `expires_at` the client
    /// mirrors, so the two can never drift apart.
    pub fn ttl_secs(&self, remember_me: bool) -> u64 {
        if remember_me {
            self.config.remember_ttl_secs
        } else {
            self.config.session_ttl_secs
        }
    }

    /// Sign a token for the user. Returns the token and its absolute expiry
    /// (unix seconds).
    pub fn issue(&self, user: &User, remember_me: bool) -> Result<(String, u64), JwtError> {
        if !self.config.secret_is_usable() {
            return Err(JwtError::Misconfigured);
        }

        let now = Self::now()?;
        let exp = now + self.ttl_secs(remember_me);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            iat: now,
            exp,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok((token, exp))
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        if !self.config.secret_is_usable() {
            return Err(JwtError::Misconfigured);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig {
            secret: secret.to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            remember_ttl_secs: DEFAULT_REMEMBER_TTL_SECS,
        })
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "maya".to_string(),
            email: "maya@example.com".to_string(),
            password_hash: String::new(),
            role: Role::Accountant,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_verifies_with_matching_claims() {
        let service = service("unit-test-secret");
        let user = user();

        let (token, exp) = service.issue(&user, false).expect("issue");
        let claims = service.verify(&token).expect("verify");

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "maya");
        assert_eq!(claims.role, Role::Accountant);
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn remember_me_extends_the_expiry() {
        let service = service("unit-test-secret");
        let user = user();

        let (_, short_exp) = service.issue(&user, false).expect("issue");
        let (_, long_exp) = service.issue(&user, true).expect("issue");

        // The clock may tick between the two issues, so allow a second of
        // drift on top of the TTL difference.
        let diff = long_exp - short_exp;
        let expected = DEFAULT_REMEMBER_TTL_SECS - DEFAULT_SESSION_TTL_SECS;
        assert!(diff >= expected && diff <= expected + 1, "diff = {diff}");
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let issuer = service("secret-a");
        let verifier = service("secret-b");

        let (token, _) = issuer.issue(&user(), false).expect("issue");
        assert!(matches!(verifier.verify(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn placeholder_secret_is_refused_distinctly() {
        let service = service(PLACEHOLDER_SECRET);
        assert!(matches!(
            service.issue(&user(), false),
            Err(JwtError::Misconfigured)
        ));
        assert!(matches!(
            service.verify("anything"),
            Err(JwtError::Misconfigured)
        ));

        let empty = self::service("");
        assert!(matches!(
            empty.verify("anything"),
            Err(JwtError::Misconfigured)
        ));
    }

    #[test]
    fn expired_token_is_invalid() {
        let mut service = service("unit-test-secret");
        // Default leeway is 60s; zero it so a long-past exp fails outright.
        service.validation.leeway = 0;

        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            username: "a".to_string(),
            role: Role::User,
            iat: 0,
            exp: 1, // long past
        };
        let token = encode(&Header::default(), &claims, &service.encoding_key).expect("encode");

        assert!(matches!(service.verify(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    #[serial_test::serial]
    fn from_env_requires_a_real_secret() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_SESSION_TTL");
            std::env::remove_var("JWT_REMEMBER_TTL");
        }
        assert!(JwtConfig::from_env().is_err());

        unsafe { std::env::set_var("JWT_SECRET", PLACEHOLDER_SECRET) };
        assert!(JwtConfig::from_env().is_err());

        unsafe {
            std::env::set_var("JWT_SECRET", "a-real-secret");
            std::env::set_var("JWT_SESSION_TTL", "600");
        }
        let config = JwtConfig::from_env().expect("config");
        assert_eq!(config.session_ttl_secs, 600);
        assert_eq!(config.remember_ttl_secs, DEFAULT_REMEMBER_TTL_SECS);

        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_SESSION_TTL");
        }
    }
}
