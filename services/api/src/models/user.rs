//! User accounts and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The root account. It may never be renamed, deleted, or recreated through
/// the API, and no other account may take its name.
pub const ROOT_ADMIN_USERNAME: &str = "admin";

/// Closed role set. There is no hierarchy: each endpoint checks for exactly
/// the role it requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Accountant,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Accountant => "accountant",
            Role::User => "user",
        }
    }

    /// Parse a role column. Unknown values degrade to the least-privileged
    /// role rather than failing the whole row.
    pub fn from_db(value: &str) -> Role {
        match value {
            "admin" => Role::Admin,
            "accountant" => Role::Accountant,
            _ => Role::User,
        }
    }
}

/// Full account row. Never serialized to clients as-is: the password hash
/// stays server-side, responses use [`UserSummary`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_root_admin(&self) -> bool {
        self.username.eq_ignore_ascii_case(ROOT_ADMIN_USERNAME)
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// What the API returns for an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// The verified identity attached to a request after token verification.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: name.to_string(),
            email: format!("{}@example.com", name),
            password_hash: String::new(),
            role: Role::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn unknown_roles_degrade_to_user() {
        assert_eq!(Role::from_db("admin"), Role::Admin);
        assert_eq!(Role::from_db("accountant"), Role::Accountant);
        assert_eq!(Role::from_db("superuser"), Role::User);
        assert_eq!(Role::from_db(""), Role::User);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Accountant).unwrap(),
            "\"accountant\""
        );
    }

    #[test]
    fn root_admin_check_is_case_insensitive() {
        assert!(user("Admin").is_root_admin());
        assert!(user("admin").is_root_admin());
        assert!(!user("alice").is_root_admin());
    }

    #[test]
    fn summary_never_carries_the_hash() {
        let summary = serde_json::to_value(user("maya").summary()).unwrap();
        assert!(summary.get("password_hash").is_none());
        assert_eq!(summary["role"], "admin");
    }
}
