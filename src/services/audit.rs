//! Audit trail services: the listing screen plus the recording helper the
//! mutating services call.

use chrono::Utc;
use serde_json::Value;

use crate::domain::audit_event::{AuditEvent, AuditEventType, NewAuditEvent};
use crate::dto::audit::{AuditPageData, AuditQuery};
use crate::models::auth::{AuthenticatedUser, check_role};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::query::{PageQuery, PagedQuery};
use crate::repository::{AuditEventReader, AuditEventWriter};
use crate::services::fetchers::AuditEventPages;
use crate::services::{ServiceError, ServiceResult};
use crate::{SERVICE_ADMIN_ROLE, SERVICE_AUDITOR_ROLE};

/// Loads the paginated audit trail for admins and auditors.
pub async fn load_audit_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: AuditQuery,
) -> ServiceResult<AuditPageData>
where
    R: AuditEventReader + ?Sized,
{
    if !check_role(SERVICE_ADMIN_ROLE, &user.roles)
        && !check_role(SERVICE_AUDITOR_ROLE, &user.roles)
    {
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

    let pages = PagedQuery::new(Box::new(AuditEventPages { repo }), params).await;
    let snapshot = pages.snapshot();

    Ok(AuditPageData {
        events: Paginated::new(snapshot.items, snapshot.page, snapshot.total_pages),
        total: snapshot.total,
        search_query,
        search_field,
        fetch_error: snapshot.error,
    })
}

/// Appends one event to the audit trail.
pub fn record_event<R>(
    repo: &R,
    actor: &str,
    event_type: AuditEventType,
    event_data: Value,
) -> ServiceResult<AuditEvent>
where
    R: AuditEventWriter + ?Sized,
{
    repo.create_audit_event(&NewAuditEvent {
        actor: actor.to_string(),
        event_type,
        event_data,
        created_at: Utc::now().naive_utc(),
    })
    .map_err(ServiceError::from)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::repository::mock::MockRepository;

    fn auditor_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "2".to_string(),
            email: "auditor@example.com".to_string(),
            name: "Auditor".to_string(),
            roles: vec!["console".to_string(), SERVICE_AUDITOR_ROLE.to_string()],
            exp: 0,
        }
    }

    fn operator_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "3".to_string(),
            email: "operator@example.com".to_string(),
            name: "Operator".to_string(),
            roles: vec!["console".to_string()],
            exp: 0,
        }
    }

    #[test]
    fn load_requires_admin_or_auditor_role() {
        let mut repo = MockRepository::new();
        repo.expect_list_audit_events().times(0);

        let result = block_on(load_audit_page(
            &repo,
            &operator_user(),
            AuditQuery::default(),
        ));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn load_forwards_search_and_pagination() {
        let mut repo = MockRepository::new();
        repo.expect_list_audit_events()
            .withf(|query| {
                query.search.as_deref() == Some("ops@example.com")
                    && query.search_field.as_deref() == Some("actor")
                    && query
                        .pagination
                        .as_ref()
                        .is_some_and(|p| p.page == 2 && p.per_page == DEFAULT_ITEMS_PER_PAGE)
            })
            .times(1)
            .returning(|_| Ok((0, Vec::new())));

        let query = AuditQuery {
            search: Some(" ops@example.com ".to_string()),
            field: Some("actor".to_string()),
            page: Some(2),
        };
        let data = block_on(load_audit_page(&repo, &auditor_user(), query)).unwrap();

        assert_eq!(data.total, 0);
        assert_eq!(data.search_query.as_deref(), Some("ops@example.com"));
    }

    #[test]
    fn load_surfaces_fetch_error_without_failing() {
        let mut repo = MockRepository::new();
        repo.expect_list_audit_events().times(1).returning(|_| {
            Err(crate::repository::errors::RepositoryError::ValidationError(
                "Unknown search field: whatever".to_string(),
            ))
        });

        let query = AuditQuery {
            search: Some("x".to_string()),
            field: Some("whatever".to_string()),
            page: None,
        };
        let data = block_on(load_audit_page(&repo, &auditor_user(), query)).unwrap();

        assert!(data.fetch_error.is_some());
        assert!(data.events.items.is_empty());
    }

    #[test]
    fn record_event_persists_with_actor() {
        let mut repo = MockRepository::new();
        repo.expect_create_audit_event()
            .withf(|event| {
                event.actor == "admin@example.com"
                    && event.event_type == AuditEventType::BackupCreated
            })
            .times(1)
            .returning(|event| {
                Ok(AuditEvent {
                    id: 1,
                    actor: event.actor.clone(),
                    event_type: event.event_type.clone(),
                    event_data: event.event_data.clone(),
                    created_at: event.created_at,
                })
            });

        let event = record_event(
            &repo,
            "admin@example.com",
            AuditEventType::BackupCreated,
            json!({"filename": "backup-1.sqlite"}),
        )
        .unwrap();

        assert_eq!(event.id, 1);
    }
}
