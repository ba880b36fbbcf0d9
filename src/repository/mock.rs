//! Mock repository implementation for isolating services in tests.

use mockall::mock;

use crate::domain::audit_event::{AuditEvent, NewAuditEvent};
use crate::domain::backup::{Backup, NewBackup};
use crate::domain::settings::{EmailSettings, UpdateEmailSettings};
use crate::domain::statement::{FinancialStatement, NewStatement};
use crate::domain::types::{BackupId, EmailAddress, StatementId, UserId};
use crate::domain::user::{NewUser, User, UserRole};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AuditEventListQuery, AuditEventReader, AuditEventWriter, BackupListQuery, BackupReader,
    BackupWriter, SettingsReader, SettingsWriter, StatementListQuery, StatementReader,
    StatementWriter, UserListQuery, UserReader, UserWriter,
};

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<User>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
        fn user_password_hash(&self, id: UserId) -> RepositoryResult<Option<String>>;
    }

    impl UserWriter for Repository {
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

    impl AuditEventReader for Repository {
        fn list_audit_events(
            &self,
            query: AuditEventListQuery,
        ) -> RepositoryResult<(usize, Vec<AuditEvent>)>;
    }

    impl AuditEventWriter for Repository {
        fn create_audit_event(&self, event: &NewAuditEvent) -> RepositoryResult<AuditEvent>;
    }

    impl BackupReader for Repository {
        fn get_backup_by_id(&self, id: BackupId) -> RepositoryResult<Option<Backup>>;
        fn list_backups(&self, query: BackupListQuery) -> RepositoryResult<(usize, Vec<Backup>)>;
    }

    impl BackupWriter for Repository {
        fn create_backup(&self, new_backup: &NewBackup) -> RepositoryResult<Backup>;
        fn delete_backup(&self, id: BackupId) -> RepositoryResult<()>;
    }

    impl StatementReader for Repository {
        fn list_statements(
            &self,
            query: StatementListQuery,
        ) -> RepositoryResult<(usize, Vec<FinancialStatement>)>;
    }

    impl StatementWriter for Repository {
        fn create_statements(&self, new_statements: &[NewStatement]) -> RepositoryResult<usize>;
        fn delete_statement(&self, id: StatementId) -> RepositoryResult<()>;
    }

    impl SettingsReader for Repository {
        fn email_settings(&self) -> RepositoryResult<Option<EmailSettings>>;
    }

    impl SettingsWriter for Repository {
        fn save_email_settings(&self, update: &UpdateEmailSettings) -> RepositoryResult<EmailSettings>;
    }
}
