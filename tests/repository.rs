use chrono::{NaiveDate, Utc};
use serde_json::json;

use meridian_admin::domain::audit_event::{AuditEventType, NewAuditEvent};
use meridian_admin::domain::backup::{BackupStatus, NewBackup};
use meridian_admin::domain::settings::UpdateEmailSettings;
use meridian_admin::domain::statement::{NewStatement, StatementKind};
use meridian_admin::domain::types::{BackupId, EmailAddress, UserId};
use meridian_admin::domain::user::{NewUser, UserRole};
use meridian_admin::repository::errors::RepositoryError;
use meridian_admin::repository::{
    AuditEventListQuery, AuditEventReader, AuditEventWriter, BackupListQuery, BackupReader,
    BackupWriter, DieselRepository, SettingsReader, SettingsWriter, StatementListQuery,
    StatementReader, StatementWriter, UserListQuery, UserReader, UserWriter,
};

mod common;

fn new_user(name: &str, email: &str, role: UserRole) -> NewUser {
    NewUser::new(
        name.to_string(),
        email.to_string(),
        role,
        "$argon2id$stub".to_string(),
    )
}

fn new_statement(account: &str, kind: StatementKind, balance_cents: i64) -> NewStatement {
    NewStatement::new(
        account.to_string(),
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        kind,
        balance_cents,
        "USD".to_string(),
    )
}

#[test]
fn test_user_repository_crud() {
    let test_db = common::TestDb::new("test_user_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let alice = repo
        .create_user(&new_user("Alice", "Alice@Example.com", UserRole::Admin))
        .unwrap();
    let bob = repo
        .create_user(&new_user("Bob", "bob@example.com", UserRole::Operator))
        .unwrap();

    assert_eq!(alice.email, "alice@example.com");

    let (total, users) = repo.list_users(UserListQuery::new()).unwrap();
    assert_eq!(total, 2);
    assert_eq!(users.len(), 2);

    let (search_total, search_users) = repo
        .list_users(UserListQuery::new().search("Bob"))
        .unwrap();
    assert_eq!(search_total, 1);
    assert_eq!(search_users[0].name, "Bob");

    // Field-scoped search only matches the named column.
    let (by_role_total, _) = repo
        .list_users(UserListQuery::new().search("Operator").search_field("role"))
        .unwrap();
    assert_eq!(by_role_total, 1);
    let (no_match_total, _) = repo
        .list_users(UserListQuery::new().search("Bob").search_field("role"))
        .unwrap();
    assert_eq!(no_match_total, 0);

    let by_email = repo
        .get_user_by_email(&EmailAddress::new("alice@example.com").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, alice.id);

    let bob_id = UserId::new(bob.id).unwrap();
    let promoted = repo.update_user_role(bob_id, &UserRole::Auditor).unwrap();
    assert_eq!(promoted.role, UserRole::Auditor);

    repo.set_user_password(bob_id, "$argon2id$other").unwrap();
    assert_eq!(
        repo.user_password_hash(bob_id).unwrap().as_deref(),
        Some("$argon2id$other")
    );

    let with_totp = repo
        .set_user_two_factor(bob_id, true, Some("secret".to_string()))
        .unwrap();
    assert!(with_totp.totp_enabled);

    repo.delete_user(UserId::new(alice.id).unwrap()).unwrap();
    assert!(
        repo.get_user_by_id(UserId::new(alice.id).unwrap())
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_user_repository_rejects_unknown_search_field() {
    let test_db = common::TestDb::new("test_user_unknown_field.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let result = repo.list_users(UserListQuery::new().search("x").search_field("whatever"));

    assert!(matches!(result, Err(RepositoryError::ValidationError(_))));
}

#[test]
fn test_user_repository_pagination() {
    let test_db = common::TestDb::new("test_user_pagination.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    for i in 0..15 {
        repo.create_user(&new_user(
            &format!("User {i:02}"),
            &format!("user{i:02}@example.com"),
            UserRole::Operator,
        ))
        .unwrap();
    }

    let (total, first_page) = repo
        .list_users(UserListQuery::new().paginate(1, 10))
        .unwrap();
    assert_eq!(total, 15);
    assert_eq!(first_page.len(), 10);

    let (_, second_page) = repo
        .list_users(UserListQuery::new().paginate(2, 10))
        .unwrap();
    assert_eq!(second_page.len(), 5);
    assert_eq!(second_page[0].name, "User 10");
}

#[test]
fn test_statement_repository_crud() {
    let test_db = common::TestDb::new("test_statement_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let created = repo
        .create_statements(&[
            new_statement("1010-operating", StatementKind::BalanceSheet, 1_250_000),
            new_statement("2020-reserve", StatementKind::IncomeStatement, -40_000),
            new_statement("1010-operating", StatementKind::CashFlow, 90_000),
        ])
        .unwrap();
    assert_eq!(created, 3);

    let (total, statements) = repo.list_statements(StatementListQuery::new()).unwrap();
    assert_eq!(total, 3);
    assert_eq!(statements.len(), 3);

    let (operating_total, operating) = repo
        .list_statements(StatementListQuery::new().search("1010"))
        .unwrap();
    assert_eq!(operating_total, 2);
    assert!(operating.iter().all(|s| s.account == "1010-operating"));

    let (by_kind_total, by_kind) = repo
        .list_statements(
            StatementListQuery::new()
                .search("CashFlow")
                .search_field("kind"),
        )
        .unwrap();
    assert_eq!(by_kind_total, 1);
    assert_eq!(by_kind[0].kind, StatementKind::CashFlow);

    let (paged_total, paged) = repo
        .list_statements(StatementListQuery::new().paginate(2, 2))
        .unwrap();
    assert_eq!(paged_total, 3);
    assert_eq!(paged.len(), 1);

    let id = meridian_admin::domain::types::StatementId::new(statements[0].id).unwrap();
    repo.delete_statement(id).unwrap();
    let (total_after, _) = repo.list_statements(StatementListQuery::new()).unwrap();
    assert_eq!(total_after, 2);
}

#[test]
fn test_audit_event_repository() {
    let test_db = common::TestDb::new("test_audit_event_repository.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let created = repo
        .create_audit_event(&NewAuditEvent {
            actor: "admin@example.com".to_string(),
            event_type: AuditEventType::BackupCreated,
            event_data: json!({"filename": "backup-1.sqlite"}),
            created_at: Utc::now().naive_utc(),
        })
        .unwrap();
    assert_eq!(created.event_type, AuditEventType::BackupCreated);

    repo.create_audit_event(&NewAuditEvent {
        actor: "ops@example.com".to_string(),
        event_type: AuditEventType::Login,
        event_data: json!({}),
        created_at: Utc::now().naive_utc(),
    })
    .unwrap();

    let (total, events) = repo.list_audit_events(AuditEventListQuery::new()).unwrap();
    assert_eq!(total, 2);
    assert_eq!(events.len(), 2);

    let (login_total, logins) = repo
        .list_audit_events(AuditEventListQuery::new().event_type(AuditEventType::Login))
        .unwrap();
    assert_eq!(login_total, 1);
    assert_eq!(logins[0].actor, "ops@example.com");

    let (actor_total, _) = repo
        .list_audit_events(AuditEventListQuery::new().search("admin").search_field("actor"))
        .unwrap();
    assert_eq!(actor_total, 1);
}

#[test]
fn test_backup_repository_crud() {
    let test_db = common::TestDb::new("test_backup_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    let backup = repo
        .create_backup(&NewBackup {
            filename: "backup-20260712-1.sqlite".to_string(),
            size_bytes: 4096,
            status: BackupStatus::Completed,
            note: Some("quarterly".to_string()),
        })
        .unwrap();
    assert_eq!(backup.status, BackupStatus::Completed);

    let (total, backups) = repo.list_backups(BackupListQuery::new()).unwrap();
    assert_eq!(total, 1);
    assert_eq!(backups[0].filename, "backup-20260712-1.sqlite");

    let (note_total, _) = repo
        .list_backups(BackupListQuery::new().search("quarterly").search_field("note"))
        .unwrap();
    assert_eq!(note_total, 1);

    let id = BackupId::new(backup.id).unwrap();
    repo.delete_backup(id).unwrap();
    assert!(repo.get_backup_by_id(id).unwrap().is_none());
}

#[test]
fn test_email_settings_upsert() {
    let test_db = common::TestDb::new("test_email_settings_upsert.db");
    let repo = DieselRepository::new(test_db.pool().clone());

    assert!(repo.email_settings().unwrap().is_none());

    let saved = repo
        .save_email_settings(&UpdateEmailSettings::new(
            "smtp.example.com".to_string(),
            587,
            "Console@Example.com".to_string(),
            None,
        ))
        .unwrap();
    assert_eq!(saved.sender, "console@example.com");

    let replaced = repo
        .save_email_settings(&UpdateEmailSettings::new(
            "smtp2.example.com".to_string(),
            2525,
            "console@example.com".to_string(),
            Some("Replies@Example.com".to_string()),
        ))
        .unwrap();
    assert_eq!(replaced.smtp_host, "smtp2.example.com");
    assert_eq!(replaced.reply_to.as_deref(), Some("replies@example.com"));

    // Still a single row.
    let current = repo.email_settings().unwrap().unwrap();
    assert_eq!(current.smtp_port, 2525);
}
