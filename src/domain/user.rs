use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Console account. Credentials (password hash, TOTP secret) live in the
/// persistence layer and never cross into the domain.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub totp_enabled: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum UserRole {
    Admin,
    Operator,
    Auditor,
    Other(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub password_hash: String,
}

impl NewUser {
    #[must_use]
    pub fn new(name: String, email: String, role: UserRole, password_hash: String) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.to_lowercase().trim().to_string(),
            role,
            password_hash,
        }
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "Admin"),
            UserRole::Operator => write!(f, "Operator"),
            UserRole::Auditor => write!(f, "Auditor"),
            UserRole::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            "Admin" => UserRole::Admin,
            "Operator" => UserRole::Operator,
            "Auditor" => UserRole::Auditor,
            _ => UserRole::Other(s.to_string()),
        }
    }
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}
