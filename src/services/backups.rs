//! Backup services: the listing screen plus snapshot creation and removal.
//!
//! A backup copies the SQLite database file into the configured backups
//! directory; failures are recorded as `Failed` rows so the screen shows
//! the attempt.

use std::path::Path;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::domain::audit_event::AuditEventType;
use crate::domain::backup::{Backup, BackupStatus, NewBackup};
use crate::domain::types::{BackupId, SanitizedText};
use crate::dto::backups::{BackupsPageData, BackupsQuery};
use crate::forms::backups::{CreateBackupForm, DeleteBackupForm};
use crate::models::auth::{AuthenticatedUser, check_role};
use crate::models::config::ServerConfig;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::query::{PageQuery, PagedQuery};
use crate::repository::{AuditEventWriter, BackupReader, BackupWriter};
use crate::services::fetchers::BackupPages;
use crate::services::{ServiceError, ServiceResult, audit};
use crate::SERVICE_ADMIN_ROLE;

/// Loads the paginated backup list.
pub async fn load_backups_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: BackupsQuery,
) -> ServiceResult<BackupsPageData>
where
    R: BackupReader + ?Sized,
{
    if !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = query.page.unwrap_or(1);
    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let search_field = query
        .field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut params = PageQuery::new(page, DEFAULT_ITEMS_PER_PAGE);
    params.search = search_query.clone();
    params.search_field = search_field.clone();

    let pages = PagedQuery::new(Box::new(BackupPages { repo }), params).await;
    let snapshot = pages.snapshot();

    Ok(BackupsPageData {
        backups: Paginated::new(snapshot.items, snapshot.page, snapshot.total_pages),
        total: snapshot.total,
        search_query,
        search_field,
        fetch_error: snapshot.error,
    })
}

/// Copies the database file into the backups directory and records the
/// outcome. Returns the stored record; its status tells the caller whether
/// the copy succeeded.
pub fn create_backup<R>(
    repo: &R,
    user: &AuthenticatedUser,
    config: &ServerConfig,
    form: CreateBackupForm,
) -> ServiceResult<Backup>
where
    R: BackupWriter + AuditEventWriter + ?Sized,
{
    if !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let note = form
        .note
        .as_deref()
        .and_then(|n| SanitizedText::new(n).ok())
        .map(SanitizedText::into_inner);

    let filename = format!(
        "backup-{}-{}.sqlite",
        Utc::now().format("%Y%m%d%H%M%S"),
        Uuid::new_v4()
    );
    let destination = Path::new(&config.backups_dir).join(&filename);

    let copied = std::fs::create_dir_all(&config.backups_dir)
        .and_then(|_| std::fs::copy(&config.database_url, &destination));

    let new_backup = match &copied {
        Ok(size) => NewBackup {
            filename: filename.clone(),
            size_bytes: *size as i64,
            status: BackupStatus::Completed,
            note,
        },
        Err(err) => {
            log::error!("Failed to copy database to {}: {err}", destination.display());
            NewBackup {
                filename: filename.clone(),
                size_bytes: 0,
                status: BackupStatus::Failed,
                note,
            }
        }
    };

    let backup = repo.create_backup(&new_backup).map_err(|err| {
        log::error!("Failed to record backup: {err}");
        err
    })?;

    audit::record_event(
        repo,
        &user.email,
        AuditEventType::BackupCreated,
        json!({
            "backup_id": backup.id,
            "filename": backup.filename,
            "status": backup.status.to_string(),
        }),
    )?;

    Ok(backup)
}

/// Removes a backup record and its file on disk.
pub fn delete_backup<R>(
    repo: &R,
    user: &AuthenticatedUser,
    config: &ServerConfig,
    form: DeleteBackupForm,
) -> ServiceResult<()>
where
    R: BackupReader + BackupWriter + AuditEventWriter + ?Sized,
{
    if !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let id = BackupId::new(form.backup_id)?;
    let backup = repo.get_backup_by_id(id)?.ok_or(ServiceError::NotFound)?;

    let path = Path::new(&config.backups_dir).join(&backup.filename);
    if let Err(err) = std::fs::remove_file(&path) {
        // The record is still removed; a missing file is not fatal.
        log::error!("Failed to remove backup file {}: {err}", path.display());
    }

    repo.delete_backup(id).map_err(|err| {
        log::error!("Failed to delete backup {id}: {err}");
        err
    })?;

    audit::record_event(
        repo,
        &user.email,
        AuditEventType::BackupDeleted,
        json!({"backup_id": backup.id, "filename": backup.filename}),
    )?;

    Ok(())
}
