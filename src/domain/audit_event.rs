use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One append-only entry in the audit trail.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuditEvent {
    pub id: i32,
    pub actor: String,
    pub event_type: AuditEventType,
    pub event_data: Value,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum AuditEventType {
    Login,
    UserCreated,
    UserRoleChanged,
    UserDeleted,
    PasswordChanged,
    TwoFactorEnabled,
    TwoFactorDisabled,
    EmailSettingsSaved,
    BackupCreated,
    BackupDeleted,
    StatementsImported,
    Other(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewAuditEvent {
    pub actor: String,
    pub event_type: AuditEventType,
    pub event_data: Value,
    pub created_at: NaiveDateTime,
}

impl Display for AuditEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditEventType::Login => write!(f, "Login"),
            AuditEventType::UserCreated => write!(f, "UserCreated"),
            AuditEventType::UserRoleChanged => write!(f, "UserRoleChanged"),
            AuditEventType::UserDeleted => write!(f, "UserDeleted"),
            AuditEventType::PasswordChanged => write!(f, "PasswordChanged"),
            AuditEventType::TwoFactorEnabled => write!(f, "TwoFactorEnabled"),
            AuditEventType::TwoFactorDisabled => write!(f, "TwoFactorDisabled"),
            AuditEventType::EmailSettingsSaved => write!(f, "EmailSettingsSaved"),
            AuditEventType::BackupCreated => write!(f, "BackupCreated"),
            AuditEventType::BackupDeleted => write!(f, "BackupDeleted"),
            AuditEventType::StatementsImported => write!(f, "StatementsImported"),
            AuditEventType::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for AuditEventType {
    fn from(s: &str) -> Self {
        match s {
            "Login" => AuditEventType::Login,
            "UserCreated" => AuditEventType::UserCreated,
            "UserRoleChanged" => AuditEventType::UserRoleChanged,
            "UserDeleted" => AuditEventType::UserDeleted,
            "PasswordChanged" => AuditEventType::PasswordChanged,
            "TwoFactorEnabled" => AuditEventType::TwoFactorEnabled,
            "TwoFactorDisabled" => AuditEventType::TwoFactorDisabled,
            "EmailSettingsSaved" => AuditEventType::EmailSettingsSaved,
            "BackupCreated" => AuditEventType::BackupCreated,
            "BackupDeleted" => AuditEventType::BackupDeleted,
            "StatementsImported" => AuditEventType::StatementsImported,
            _ => AuditEventType::Other(s.to_string()),
        }
    }
}

impl From<String> for AuditEventType {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}
