use crate::dto::api::{StatementsQuery, StatementsResponse};
use crate::models::auth::{AuthenticatedUser, check_role};
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::query::{PageQuery, PagedQuery};
use crate::repository::StatementReader;
use crate::services::fetchers::StatementPages;
use crate::services::{ServiceError, ServiceResult};
use crate::SERVICE_ACCESS_ROLE;

/// Returns one page of statements for REST consumers.
pub async fn list_statements<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: StatementsQuery,
) -> ServiceResult<StatementsResponse>
where
    R: StatementReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_ITEMS_PER_PAGE);

    let mut query = PageQuery::new(page, per_page);
    query.search = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    query.search_field = params
        .field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let pages = PagedQuery::new(Box::new(StatementPages { repo }), query).await;
    let snapshot = pages.snapshot();

    if let Some(error) = snapshot.error {
        return Err(ServiceError::Internal(error));
    }

    Ok(StatementsResponse {
        total: snapshot.total,
        page: snapshot.page,
        per_page: snapshot.per_page,
        total_pages: snapshot.total_pages,
        data: snapshot.items,
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::repository::mock::MockRepository;

    fn console_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "ops@example.com".to_string(),
            name: "Ops".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    #[test]
    fn list_maps_snapshot_into_response() {
        let mut repo = MockRepository::new();
        repo.expect_list_statements()
            .withf(|query| {
                query
                    .pagination
                    .as_ref()
                    .is_some_and(|p| p.page == 2 && p.per_page == 10)
            })
            .times(1)
            .returning(|_| Ok((47, Vec::new())));

        let params = StatementsQuery {
            page: Some(2),
            per_page: Some(10),
            ..Default::default()
        };
        let response = block_on(list_statements(&repo, &console_user(), params)).unwrap();

        assert_eq!(response.total, 47);
        assert_eq!(response.total_pages, 5);
        assert_eq!(response.page, 2);
    }

    #[test]
    fn provider_failure_becomes_internal_error() {
        let mut repo = MockRepository::new();
        repo.expect_list_statements().times(1).returning(|_| {
            Err(crate::repository::errors::RepositoryError::DatabaseError(
                "disk I/O error".to_string(),
            ))
        });

        let result = block_on(list_statements(
            &repo,
            &console_user(),
            StatementsQuery::default(),
        ));

        assert!(matches!(result, Err(ServiceError::Internal(_))));
    }
}
