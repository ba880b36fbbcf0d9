//! Index screen services: the financial statements table plus the add and
//! CSV import mutations behind it.

use serde_json::json;
use validator::Validate;

use crate::domain::audit_event::AuditEventType;
use crate::dto::main::{IndexPageData, IndexQuery};
use crate::forms::main::{AddStatementForm, UploadStatementsForm};
use crate::models::auth::{AuthenticatedUser, check_role};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::query::{PageQuery, PagedQuery};
use crate::repository::{AuditEventWriter, StatementReader, StatementWriter};
use crate::services::fetchers::StatementPages;
use crate::services::{ServiceError, ServiceResult, audit};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Loads the statements table for the index page.
pub async fn load_index_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: IndexQuery,
) -> ServiceResult<IndexPageData>
where
    R: StatementReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
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

    let pages = PagedQuery::new(Box::new(StatementPages { repo }), params).await;
    let snapshot = pages.snapshot();

    Ok(IndexPageData {
        statements: Paginated::new(snapshot.items, snapshot.page, snapshot.total_pages),
        total: snapshot.total,
        search_query,
        search_field,
        fetch_error: snapshot.error,
    })
}

/// Validates the add-statement form and persists a new statement record.
pub fn add_statement<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddStatementForm,
) -> ServiceResult<()>
where
    R: StatementWriter + AuditEventWriter + ?Sized,
{
    if !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    if let Err(err) = form.validate() {
        log::error!("Failed to validate statement form: {err}");
        return Err(ServiceError::Form("Invalid statement form".to_string()));
    }

    let new_statement = form
        .to_new_statement()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_statements(std::slice::from_ref(&new_statement))
        .map_err(|err| {
            log::error!("Failed to add a statement: {err}");
            err
        })?;

    audit::record_event(
        repo,
        &user.email,
        AuditEventType::StatementsImported,
        json!({"count": 1, "source": "form", "account": new_statement.account}),
    )?;

    Ok(())
}

/// Parses the uploaded CSV file and creates statement records in bulk.
pub fn upload_statements<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &mut UploadStatementsForm,
) -> ServiceResult<usize>
where
    R: StatementWriter + AuditEventWriter + ?Sized,
{
    if !check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let statements = form.parse().map_err(|err| {
        log::error!("Failed to parse statements: {err}");
        ServiceError::Form(err.to_string())
    })?;

    let created = repo.create_statements(&statements).map_err(|err| {
        log::error!("Failed to import statements: {err}");
        err
    })?;

    audit::record_event(
        repo,
        &user.email,
        AuditEventType::StatementsImported,
        json!({"count": created, "source": "csv"}),
    )?;

    Ok(created)
}
