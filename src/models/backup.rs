use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::backup::{Backup as DomainBackup, NewBackup as DomainNewBackup};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::backups)]
/// Diesel model for [`crate::domain::backup::Backup`].
pub struct Backup {
    pub id: i32,
    pub filename: String,
    pub size_bytes: i64,
    pub status: String,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::backups)]
pub struct NewBackup<'a> {
    pub filename: &'a str,
    pub size_bytes: i64,
    pub status: String,
    pub note: Option<&'a str>,
}

impl From<Backup> for DomainBackup {
    fn from(backup: Backup) -> Self {
        Self {
            id: backup.id,
            filename: backup.filename,
            size_bytes: backup.size_bytes,
            status: backup.status.into(),
            note: backup.note,
            created_at: backup.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewBackup> for NewBackup<'a> {
    fn from(backup: &'a DomainNewBackup) -> Self {
        Self {
            filename: backup.filename.as_str(),
            size_bytes: backup.size_bytes,
            status: backup.status.to_string(),
            note: backup.note.as_deref(),
        }
    }
}
