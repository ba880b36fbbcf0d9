//! Repository traits and the Diesel-backed implementation.
//!
//! List operations return `(total, items)` so the caller can derive page
//! counts without a second query round-trip. The `search_field` carried by
//! the list queries is deliberately unvalidated upstream (the query
//! controller forwards whatever the view supplied); implementations reject
//! unknown fields with [`errors::RepositoryError::ValidationError`].

use crate::db::DbPool;
use crate::domain::audit_event::{AuditEvent, AuditEventType, NewAuditEvent};
use crate::domain::backup::{Backup, NewBackup};
use crate::domain::settings::{EmailSettings, UpdateEmailSettings};
use crate::domain::statement::{FinancialStatement, NewStatement};
use crate::domain::types::{BackupId, EmailAddress, StatementId, UserId};
use crate::domain::user::{NewUser, User, UserRole};
use crate::repository::errors::RepositoryResult;

pub mod audit_event;
pub mod backup;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod settings;
pub mod statement;
pub mod user;

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub search_field: Option<String>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default)]
pub struct AuditEventListQuery {
    pub event_type: Option<AuditEventType>,
    pub search: Option<String>,
    pub search_field: Option<String>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default)]
pub struct BackupListQuery {
    pub search: Option<String>,
    pub search_field: Option<String>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default)]
pub struct StatementListQuery {
    pub search: Option<String>,
    pub search_field: Option<String>,
    pub pagination: Option<Pagination>,
}

macro_rules! list_query_builders {
    ($name:ident) => {
        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn search(mut self, term: impl Into<String>) -> Self {
                self.search = Some(term.into());
                self
            }

            pub fn search_field(mut self, field: impl Into<String>) -> Self {
                self.search_field = Some(field.into());
                self
            }

            pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
                self.pagination = Some(Pagination { page, per_page });
                self
            }
        }
    };
}

list_query_builders!(UserListQuery);
list_query_builders!(BackupListQuery);
list_query_builders!(StatementListQuery);

impl AuditEventListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_type(mut self, event_type: AuditEventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn search_field(mut self, field: impl Into<String>) -> Self {
        self.search_field = Some(field.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<User>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    fn user_password_hash(&self, id: UserId) -> RepositoryResult<Option<String>>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_user_role(&self, id: UserId, role: &UserRole) -> RepositoryResult<User>;
    fn set_user_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<()>;
    fn set_user_two_factor(
        &self,
        id: UserId,
        enabled: bool,
        totp_secret: Option<String>,
    ) -> RepositoryResult<User>;
    fn delete_user(&self, id: UserId) -> RepositoryResult<()>;
}

pub trait AuditEventReader {
    fn list_audit_events(
        &self,
        query: AuditEventListQuery,
    ) -> RepositoryResult<(usize, Vec<AuditEvent>)>;
}

pub trait AuditEventWriter {
    fn create_audit_event(&self, event: &NewAuditEvent) -> RepositoryResult<AuditEvent>;
}

pub trait BackupReader {
    fn get_backup_by_id(&self, id: BackupId) -> RepositoryResult<Option<Backup>>;
    fn list_backups(&self, query: BackupListQuery) -> RepositoryResult<(usize, Vec<Backup>)>;
}

pub trait BackupWriter {
    fn create_backup(&self, new_backup: &NewBackup) -> RepositoryResult<Backup>;
    fn delete_backup(&self, id: BackupId) -> RepositoryResult<()>;
}

pub trait StatementReader {
    fn list_statements(
        &self,
        query: StatementListQuery,
    ) -> RepositoryResult<(usize, Vec<FinancialStatement>)>;
}

pub trait StatementWriter {
    fn create_statements(&self, new_statements: &[NewStatement]) -> RepositoryResult<usize>;
    fn delete_statement(&self, id: StatementId) -> RepositoryResult<()>;
}

pub trait SettingsReader {
    fn email_settings(&self) -> RepositoryResult<Option<EmailSettings>>;
}

pub trait SettingsWriter {
    fn save_email_settings(&self, update: &UpdateEmailSettings) -> RepositoryResult<EmailSettings>;
}

/// Diesel implementation of every repository trait, cloneable so the Actix
/// app can hand one instance to all workers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> RepositoryResult<crate::db::DbConnection> {
        Ok(self.pool.get()?)
    }
}
