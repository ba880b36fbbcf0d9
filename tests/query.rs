//! End-to-end checks of the query controller over a real repository-backed
//! page provider.

use chrono::NaiveDate;
use futures::executor::block_on;

use meridian_admin::domain::statement::{NewStatement, StatementKind};
use meridian_admin::query::{PageQuery, PagedQuery};
use meridian_admin::repository::{DieselRepository, StatementWriter};
use meridian_admin::services::fetchers::StatementPages;

mod common;

fn seed_statements(repo: &DieselRepository, count: usize) {
    let statements: Vec<NewStatement> = (0..count)
        .map(|i| {
            NewStatement::new(
                format!("acct-{i:03}"),
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
                StatementKind::BalanceSheet,
                (i as i64) * 100,
                "USD".to_string(),
            )
        })
        .collect();
    repo.create_statements(&statements).unwrap();
}

#[test]
fn controller_pages_through_repository_data() {
    let test_db = common::TestDb::new("test_controller_pages.db");
    let repo = DieselRepository::new(test_db.pool().clone());
    seed_statements(&repo, 47);

    block_on(async {
        let fetcher = StatementPages { repo: &repo };
        let pages = PagedQuery::new(Box::new(fetcher), PageQuery::new(1, 10)).await;

        assert_eq!(pages.total_records(), 47);
        assert_eq!(pages.total_pages(), 5);
        assert_eq!(pages.items().len(), 10);
        assert!(pages.error().is_none());

        pages.set_page_number(5).await;
        assert_eq!(pages.items().len(), 7);
        assert_eq!(pages.page_number(), 5);
    });
}

#[test]
fn controller_search_narrows_and_clears() {
    let test_db = common::TestDb::new("test_controller_search.db");
    let repo = DieselRepository::new(test_db.pool().clone());
    seed_statements(&repo, 25);

    block_on(async {
        let fetcher = StatementPages { repo: &repo };
        let pages = PagedQuery::new(Box::new(fetcher), PageQuery::new(1, 10)).await;
        assert_eq!(pages.total_records(), 25);

        pages.set_search_term(Some("acct-004".to_string())).await;
        assert_eq!(pages.total_records(), 1);
        assert_eq!(pages.total_pages(), 1);

        // Clearing the filter means "no search", not "search for empty string".
        pages.set_search_term(None).await;
        assert_eq!(pages.total_records(), 25);
    });
}

#[test]
fn unknown_search_field_surfaces_as_fetch_error_and_keeps_data() {
    let test_db = common::TestDb::new("test_controller_bad_field.db");
    let repo = DieselRepository::new(test_db.pool().clone());
    seed_statements(&repo, 12);

    block_on(async {
        let fetcher = StatementPages { repo: &repo };
        let pages = PagedQuery::new(Box::new(fetcher), PageQuery::new(1, 10)).await;
        assert_eq!(pages.items().len(), 10);

        pages.set_search_term(Some("acct".to_string())).await;
        pages.set_search_field(Some("whatever".to_string())).await;

        // The repository rejected the unvalidated field; the controller
        // reports the fixed message and keeps the previous page.
        assert_eq!(pages.error(), Some("Error fetching data"));
        assert_eq!(pages.items().len(), 10);
        assert!(!pages.is_loading());

        pages.set_search_field(Some("account".to_string())).await;
        assert!(pages.error().is_none());
        assert_eq!(pages.total_records(), 12);
    });
}
