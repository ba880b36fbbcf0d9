//! Repository-backed page providers for the query controller.
//!
//! One adapter per list screen: each translates the controller's
//! [`PageQuery`] into the matching repository list query and returns the
//! `(total, items)` pair as a [`PageResult`]. The `search`/`search_field`
//! values are forwarded untouched; the repository decides whether a field
//! name is meaningful.

use async_trait::async_trait;

use crate::domain::audit_event::AuditEvent;
use crate::domain::backup::Backup;
use crate::domain::statement::FinancialStatement;
use crate::domain::user::User;
use crate::query::{FetchError, PageFetcher, PageQuery, PageResult};
use crate::repository::{
    AuditEventListQuery, AuditEventReader, BackupListQuery, BackupReader, StatementListQuery,
    StatementReader, UserListQuery, UserReader,
};

pub struct StatementPages<'a, R: ?Sized> {
    pub repo: &'a R,
}

#[async_trait(?Send)]
impl<R> PageFetcher<FinancialStatement> for StatementPages<'_, R>
where
    R: StatementReader + ?Sized,
{
    async fn fetch_page(
        &self,
        query: &PageQuery,
    ) -> Result<PageResult<FinancialStatement>, FetchError> {
        let mut list_query = StatementListQuery::new().paginate(query.page, query.per_page);
        if let Some(term) = &query.search {
            list_query = list_query.search(term.clone());
        }
        if let Some(field) = &query.search_field {
            list_query = list_query.search_field(field.clone());
        }

        let (total, items) = self.repo.list_statements(list_query)?;
        Ok(PageResult { items, total })
    }
}

pub struct UserPages<'a, R: ?Sized> {
    pub repo: &'a R,
}

#[async_trait(?Send)]
impl<R> PageFetcher<User> for UserPages<'_, R>
where
    R: UserReader + ?Sized,
{
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult<User>, FetchError> {
        let mut list_query = UserListQuery::new().paginate(query.page, query.per_page);
        if let Some(term) = &query.search {
            list_query = list_query.search(term.clone());
        }
        if let Some(field) = &query.search_field {
            list_query = list_query.search_field(field.clone());
        }

        let (total, items) = self.repo.list_users(list_query)?;
        Ok(PageResult { items, total })
    }
}

pub struct AuditEventPages<'a, R: ?Sized> {
    pub repo: &'a R,
}

#[async_trait(?Send)]
impl<R> PageFetcher<AuditEvent> for AuditEventPages<'_, R>
where
    R: AuditEventReader + ?Sized,
{
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult<AuditEvent>, FetchError> {
        let mut list_query = AuditEventListQuery::new().paginate(query.page, query.per_page);
        if let Some(term) = &query.search {
            list_query = list_query.search(term.clone());
        }
        if let Some(field) = &query.search_field {
            list_query = list_query.search_field(field.clone());
        }

        let (total, items) = self.repo.list_audit_events(list_query)?;
        Ok(PageResult { items, total })
    }
}

pub struct BackupPages<'a, R: ?Sized> {
    pub repo: &'a R,
}

#[async_trait(?Send)]
impl<R> PageFetcher<Backup> for BackupPages<'_, R>
where
    R: BackupReader + ?Sized,
{
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult<Backup>, FetchError> {
        let mut list_query = BackupListQuery::new().paginate(query.page, query.per_page);
        if let Some(term) = &query.search {
            list_query = list_query.search(term.clone());
        }
        if let Some(field) = &query.search_field {
            list_query = list_query.search_field(field.clone());
        }

        let (total, items) = self.repo.list_backups(list_query)?;
        Ok(PageResult { items, total })
    }
}
