use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Record of one database snapshot kept in the backups directory.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Backup {
    pub id: i32,
    pub filename: String,
    pub size_bytes: i64,
    pub status: BackupStatus,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum BackupStatus {
    Completed,
    Failed,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewBackup {
    pub filename: String,
    pub size_bytes: i64,
    pub status: BackupStatus,
    pub note: Option<String>,
}

impl Display for BackupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackupStatus::Completed => write!(f, "Completed"),
            BackupStatus::Failed => write!(f, "Failed"),
        }
    }
}

impl From<&str> for BackupStatus {
    fn from(s: &str) -> Self {
        match s {
            "Completed" => BackupStatus::Completed,
            _ => BackupStatus::Failed,
        }
    }
}

impl From<String> for BackupStatus {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}
