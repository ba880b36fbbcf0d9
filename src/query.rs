//! Generic paginated/searchable query controller.
//!
//! Every list screen in the console loads its rows through [`PagedQuery`]: a
//! small coordinator that owns page/size/search parameters, drives an
//! injected [`PageFetcher`], and exposes the fetched page together with the
//! derived page count to the caller.
//!
//! The controller intentionally performs no parameter validation: page
//! numbers are not clamped to `[1, total_pages]`, a page size of zero is
//! passed through to the provider, and changing the page size does not
//! adjust the current page number. Bounds belong to the consumer, which is
//! given [`PagedQuery::total_pages`] for its own clamping.
//!
//! Overlapping fetches are resolved with a generation counter: every issued
//! fetch is tagged with a sequence number, and a completion whose sequence
//! is no longer the latest issued is discarded. Without that check the
//! controller would apply whichever fetch resolved last in wall-clock
//! order, letting a stale page overwrite a newer one; the sequence
//! comparison removes the race without any cancellation primitive.

use std::cell::RefCell;

use async_trait::async_trait;
use thiserror::Error;

/// Fixed user-facing message reported for any provider failure.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching data";

/// Failure reported by a [`PageFetcher`].
///
/// Consumers of [`PagedQuery`] only ever see [`FETCH_ERROR_MESSAGE`]; the
/// typed cause is retained on [`FetchStatus::Failed`] and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FetchError(String);

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Parameter snapshot handed to a [`PageFetcher`] on every fetch.
///
/// `search` and `search_field` are forwarded as-is: `None` means "not
/// searching", which a provider must be able to distinguish from a search
/// for the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: usize,
    pub per_page: usize,
    pub search: Option<String>,
    pub search_field: Option<String>,
}

impl PageQuery {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page,
            per_page,
            search: None,
            search_field: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn search_field(mut self, field: impl Into<String>) -> Self {
        self.search_field = Some(field.into());
        self
    }
}

/// One page of items plus the total row count behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Asynchronous page provider injected into [`PagedQuery`] at construction.
///
/// Implementations must treat repeated and overlapping invocations as safe;
/// the controller never de-duplicates requests.
#[async_trait(?Send)]
pub trait PageFetcher<T> {
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult<T>, FetchError>;
}

/// Fetch lifecycle state; exactly one variant holds at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// No fetch has been issued yet.
    Idle,
    /// A fetch is in flight for the current parameters.
    Loading,
    /// The most recent applied fetch succeeded.
    Success,
    /// The most recent applied fetch failed; the cause is retained here.
    Failed(FetchError),
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }
}

/// Read-only view of the controller handed to rendering code.
#[derive(Debug, Clone)]
pub struct PageSnapshot<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub loading: bool,
    pub error: Option<String>,
}

struct QueryState<T> {
    params: PageQuery,
    items: Vec<T>,
    total: usize,
    status: FetchStatus,
    seq: u64,
}

/// Stateful coordinator between a list view and its [`PageFetcher`].
///
/// All state lives behind a [`RefCell`]: the controller is built for a
/// single logical thread where mutator calls, fetch completions, and reads
/// interleave cooperatively. Mutators are `async fn`s taking `&self`, so
/// futures from successive calls may be in flight at the same time; the
/// sequence check in [`PagedQuery::run`] decides which completion is
/// applied. Dropping a mutator future abandons its fetch; the next mutation
/// or [`PagedQuery::refresh`] recovers.
pub struct PagedQuery<'f, T> {
    fetcher: Box<dyn PageFetcher<T> + 'f>,
    state: RefCell<QueryState<T>>,
}

impl<'f, T> PagedQuery<'f, T> {
    /// Creates a controller bound to `fetcher` and performs the initial
    /// fetch with `params` before returning.
    pub async fn new(fetcher: Box<dyn PageFetcher<T> + 'f>, params: PageQuery) -> Self {
        let controller = Self {
            fetcher,
            state: RefCell::new(QueryState {
                params,
                items: Vec::new(),
                total: 0,
                status: FetchStatus::Idle,
                seq: 0,
            }),
        };
        controller.refresh().await;
        controller
    }

    /// Re-issues a fetch for the current parameter snapshot.
    pub async fn refresh(&self) {
        self.run(|_| {}).await;
    }

    /// Sets the page number and re-fetches. The value is not clamped.
    pub async fn set_page_number(&self, page: usize) {
        self.run(|params| params.page = page).await;
    }

    /// Sets the page size and re-fetches.
    ///
    /// The page number is NOT adjusted, so the consumer may observe an
    /// out-of-range page until it corrects it.
    pub async fn set_page_size(&self, per_page: usize) {
        self.run(|params| params.per_page = per_page).await;
    }

    /// Sets or clears the free-text search term and re-fetches.
    pub async fn set_search_term(&self, term: Option<String>) {
        self.run(|params| params.search = term).await;
    }

    /// Sets or clears the field the search term applies to and re-fetches.
    pub async fn set_search_field(&self, field: Option<String>) {
        self.run(|params| params.search_field = field).await;
    }

    /// Applies a parameter mutation, then drives one fetch for the
    /// resulting snapshot. The single suspension point is the provider
    /// call; a completion that is no longer the latest issued is discarded.
    async fn run(&self, mutate: impl FnOnce(&mut PageQuery)) {
        let (query, seq) = {
            let mut state = self.state.borrow_mut();
            mutate(&mut state.params);
            state.seq += 1;
            state.status = FetchStatus::Loading;
            (state.params.clone(), state.seq)
        };

        let outcome = self.fetcher.fetch_page(&query).await;

        let mut state = self.state.borrow_mut();
        if state.seq != seq {
            // A newer fetch was issued while this one was in flight; its
            // state, including Loading, belongs to that newer fetch.
            return;
        }
        match outcome {
            Ok(page) => {
                state.items = page.items;
                state.total = page.total;
                state.status = FetchStatus::Success;
            }
            Err(err) => {
                log::error!("Failed to fetch page {}: {err}", query.page);
                state.status = FetchStatus::Failed(err);
            }
        }
    }

    pub fn page_number(&self) -> usize {
        self.state.borrow().params.page
    }

    pub fn page_size(&self) -> usize {
        self.state.borrow().params.per_page
    }

    pub fn total_records(&self) -> usize {
        self.state.borrow().total
    }

    /// Derived page count: `ceil(total / per_page)`, or zero when the
    /// (unvalidated) page size is zero.
    pub fn total_pages(&self) -> usize {
        let state = self.state.borrow();
        if state.params.per_page == 0 {
            0
        } else {
            state.total.div_ceil(state.params.per_page)
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().status.is_loading()
    }

    /// Current lifecycle state, including the typed cause on failure.
    pub fn status(&self) -> FetchStatus {
        self.state.borrow().status.clone()
    }

    /// Fixed user-facing error message, present only after a failed fetch.
    pub fn error(&self) -> Option<&'static str> {
        match self.state.borrow().status {
            FetchStatus::Failed(_) => Some(FETCH_ERROR_MESSAGE),
            _ => None,
        }
    }
}

impl<T: Clone> PagedQuery<'_, T> {
    /// Items from the most recent applied fetch, in provider order.
    pub fn items(&self) -> Vec<T> {
        self.state.borrow().items.clone()
    }

    pub fn snapshot(&self) -> PageSnapshot<T> {
        let state = self.state.borrow();
        let total_pages = if state.params.per_page == 0 {
            0
        } else {
            state.total.div_ceil(state.params.per_page)
        };
        PageSnapshot {
            items: state.items.clone(),
            page: state.params.page,
            per_page: state.params.per_page,
            total: state.total,
            total_pages,
            loading: state.status.is_loading(),
            error: match state.status {
                FetchStatus::Failed(_) => Some(FETCH_ERROR_MESSAGE.to_string()),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::pin::pin;
    use std::rc::Rc;

    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::poll;

    use super::*;

    /// Serves `total` numbered rows; row values encode the requested page.
    struct NumberedRows {
        total: usize,
    }

    #[async_trait(?Send)]
    impl PageFetcher<usize> for NumberedRows {
        async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult<usize>, FetchError> {
            let start = query.page.saturating_sub(1) * query.per_page;
            let end = (start + query.per_page).min(self.total);
            Ok(PageResult {
                items: (start..end).collect(),
                total: self.total,
            })
        }
    }

    /// Records every query it receives and returns a fixed total.
    struct Recording {
        calls: Rc<RefCell<Vec<PageQuery>>>,
        total: usize,
    }

    #[async_trait(?Send)]
    impl PageFetcher<usize> for Recording {
        async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult<usize>, FetchError> {
            self.calls.borrow_mut().push(query.clone());
            Ok(PageResult {
                items: vec![query.page],
                total: self.total,
            })
        }
    }

    /// Fails whenever a search term is set, succeeds otherwise.
    struct FailsOnSearch;

    #[async_trait(?Send)]
    impl PageFetcher<usize> for FailsOnSearch {
        async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult<usize>, FetchError> {
            if query.search.is_some() {
                Err(FetchError::new("backend rejected the filter"))
            } else {
                Ok(PageResult {
                    items: (0..10).collect(),
                    total: 47,
                })
            }
        }
    }

    type Gate = oneshot::Receiver<Result<PageResult<usize>, FetchError>>;

    /// Completes each fetch only when the gate for its page number opens,
    /// so tests control completion order explicitly.
    struct Gated {
        gates: Rc<RefCell<HashMap<usize, Gate>>>,
    }

    #[async_trait(?Send)]
    impl PageFetcher<usize> for Gated {
        async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult<usize>, FetchError> {
            let gate = self
                .gates
                .borrow_mut()
                .remove(&query.page)
                .expect("no gate registered for page");
            gate.await.expect("gate sender dropped")
        }
    }

    fn page_of(values: Vec<usize>, total: usize) -> Result<PageResult<usize>, FetchError> {
        Ok(PageResult {
            items: values,
            total,
        })
    }

    #[test]
    fn construction_issues_one_fetch_with_initial_params() {
        block_on(async {
            let calls = Rc::new(RefCell::new(Vec::new()));
            let fetcher = Recording {
                calls: calls.clone(),
                total: 47,
            };
            let pages = PagedQuery::new(Box::new(fetcher), PageQuery::new(1, 10)).await;

            assert_eq!(*calls.borrow(), vec![PageQuery::new(1, 10)]);
            assert_eq!(pages.status(), FetchStatus::Success);
            assert!(!pages.is_loading());
        });
    }

    #[test]
    fn total_pages_is_ceil_of_total_over_page_size() {
        block_on(async {
            let pages = PagedQuery::new(Box::new(NumberedRows { total: 47 }), PageQuery::new(1, 10)).await;

            assert_eq!(pages.items().len(), 10);
            assert_eq!(pages.total_records(), 47);
            assert_eq!(pages.total_pages(), 5);
        });
    }

    #[test]
    fn total_pages_handles_exact_and_empty_divisions() {
        block_on(async {
            let pages = PagedQuery::new(Box::new(NumberedRows { total: 40 }), PageQuery::new(1, 10)).await;
            assert_eq!(pages.total_pages(), 4);

            let empty = PagedQuery::new(Box::new(NumberedRows { total: 0 }), PageQuery::new(1, 10)).await;
            assert_eq!(empty.total_pages(), 0);
        });
    }

    #[test]
    fn zero_page_size_reaches_the_provider_unvalidated() {
        block_on(async {
            let calls = Rc::new(RefCell::new(Vec::new()));
            let fetcher = Recording {
                calls: calls.clone(),
                total: 15,
            };
            let pages = PagedQuery::new(Box::new(fetcher), PageQuery::new(1, 0)).await;

            assert_eq!(calls.borrow()[0].per_page, 0);
            assert_eq!(pages.total_pages(), 0);
        });
    }

    #[test]
    fn mutators_refetch_in_issue_order() {
        block_on(async {
            let calls = Rc::new(RefCell::new(Vec::new()));
            let fetcher = Recording {
                calls: calls.clone(),
                total: 47,
            };
            let pages = PagedQuery::new(Box::new(fetcher), PageQuery::new(1, 10)).await;

            pages.set_page_number(2).await;
            pages.set_page_number(3).await;

            let observed: Vec<usize> = calls.borrow().iter().map(|q| q.page).collect();
            assert_eq!(observed, vec![1, 2, 3]);
            assert_eq!(pages.page_number(), 3);
        });
    }

    #[test]
    fn search_term_is_forwarded_without_defaulting() {
        block_on(async {
            let calls = Rc::new(RefCell::new(Vec::new()));
            let fetcher = Recording {
                calls: calls.clone(),
                total: 1,
            };
            let pages = PagedQuery::new(Box::new(fetcher), PageQuery::new(1, 10)).await;

            pages.set_search_term(Some("alice".to_string())).await;

            let last = calls.borrow().last().cloned().unwrap();
            assert_eq!(last.search.as_deref(), Some("alice"));
            assert_eq!(last.search_field, None);

            pages.set_search_term(None).await;
            let last = calls.borrow().last().cloned().unwrap();
            assert_eq!(last.search, None);
        });
    }

    #[test]
    fn page_size_change_does_not_clamp_page_number() {
        block_on(async {
            let pages = PagedQuery::new(Box::new(NumberedRows { total: 15 }), PageQuery::new(5, 10)).await;

            pages.set_page_size(20).await;

            assert_eq!(pages.total_pages(), 1);
            assert_eq!(pages.page_number(), 5);
        });
    }

    #[test]
    fn failure_keeps_previous_data_and_sets_error() {
        block_on(async {
            let pages = PagedQuery::new(Box::new(FailsOnSearch), PageQuery::new(1, 10)).await;
            assert_eq!(pages.items().len(), 10);
            assert_eq!(pages.error(), None);

            pages.set_search_term(Some("x".to_string())).await;

            assert_eq!(pages.items().len(), 10);
            assert_eq!(pages.total_records(), 47);
            assert!(!pages.is_loading());
            assert_eq!(pages.error(), Some(FETCH_ERROR_MESSAGE));
            assert!(matches!(pages.status(), FetchStatus::Failed(_)));

            // The next successful fetch clears the error.
            pages.set_search_term(None).await;
            assert_eq!(pages.error(), None);
            assert_eq!(pages.status(), FetchStatus::Success);
        });
    }

    #[test]
    fn stale_completion_is_discarded() {
        block_on(async {
            let gates = Rc::new(RefCell::new(HashMap::new()));
            let (initial_tx, initial_rx) = oneshot::channel();
            gates.borrow_mut().insert(1, initial_rx);
            initial_tx.send(page_of(vec![0], 47)).unwrap();

            let pages = PagedQuery::new(Box::new(Gated { gates: gates.clone() }), PageQuery::new(1, 10)).await;

            let (tx2, rx2) = oneshot::channel();
            let (tx3, rx3) = oneshot::channel();
            gates.borrow_mut().insert(2, rx2);
            gates.borrow_mut().insert(3, rx3);

            let mut page2 = pin!(pages.set_page_number(2));
            let mut page3 = pin!(pages.set_page_number(3));
            assert!(poll!(page2.as_mut()).is_pending());
            assert!(poll!(page3.as_mut()).is_pending());
            assert!(pages.is_loading());

            // The later-issued fetch resolves first and is applied.
            tx3.send(page_of(vec![30], 47)).unwrap();
            assert!(poll!(page3.as_mut()).is_ready());
            assert_eq!(pages.items(), vec![30]);
            assert!(!pages.is_loading());

            // The earlier fetch resolves afterwards; its result is stale
            // and must not overwrite the newer page.
            tx2.send(page_of(vec![20], 47)).unwrap();
            assert!(poll!(page2.as_mut()).is_ready());
            assert_eq!(pages.items(), vec![30]);
            assert_eq!(pages.page_number(), 3);
            assert_eq!(pages.status(), FetchStatus::Success);
        });
    }

    #[test]
    fn stale_completion_does_not_clear_loading_of_newer_fetch() {
        block_on(async {
            let gates = Rc::new(RefCell::new(HashMap::new()));
            let (initial_tx, initial_rx) = oneshot::channel();
            gates.borrow_mut().insert(1, initial_rx);
            initial_tx.send(page_of(vec![0], 47)).unwrap();

            let pages = PagedQuery::new(Box::new(Gated { gates: gates.clone() }), PageQuery::new(1, 10)).await;

            let (tx2, rx2) = oneshot::channel();
            let (tx3, rx3) = oneshot::channel();
            gates.borrow_mut().insert(2, rx2);
            gates.borrow_mut().insert(3, rx3);

            let mut page2 = pin!(pages.set_page_number(2));
            let mut page3 = pin!(pages.set_page_number(3));
            assert!(poll!(page2.as_mut()).is_pending());
            assert!(poll!(page3.as_mut()).is_pending());

            // The earlier fetch resolves while the newer one is still in
            // flight: discarded, and the controller stays Loading.
            tx2.send(page_of(vec![20], 47)).unwrap();
            assert!(poll!(page2.as_mut()).is_ready());
            assert_eq!(pages.items(), vec![0]);
            assert!(pages.is_loading());

            tx3.send(page_of(vec![30], 47)).unwrap();
            assert!(poll!(page3.as_mut()).is_ready());
            assert_eq!(pages.items(), vec![30]);
            assert!(!pages.is_loading());
        });
    }

    #[test]
    fn failed_stale_completion_is_also_discarded() {
        block_on(async {
            let gates = Rc::new(RefCell::new(HashMap::new()));
            let (initial_tx, initial_rx) = oneshot::channel();
            gates.borrow_mut().insert(1, initial_rx);
            initial_tx.send(page_of(vec![0], 47)).unwrap();

            let pages = PagedQuery::new(Box::new(Gated { gates: gates.clone() }), PageQuery::new(1, 10)).await;

            let (tx2, rx2) = oneshot::channel();
            let (tx3, rx3) = oneshot::channel();
            gates.borrow_mut().insert(2, rx2);
            gates.borrow_mut().insert(3, rx3);

            let mut page2 = pin!(pages.set_page_number(2));
            let mut page3 = pin!(pages.set_page_number(3));
            assert!(poll!(page2.as_mut()).is_pending());
            assert!(poll!(page3.as_mut()).is_pending());

            tx3.send(page_of(vec![30], 47)).unwrap();
            assert!(poll!(page3.as_mut()).is_ready());

            tx2.send(Err(FetchError::new("stale failure"))).unwrap();
            assert!(poll!(page2.as_mut()).is_ready());

            assert_eq!(pages.error(), None);
            assert_eq!(pages.status(), FetchStatus::Success);
            assert_eq!(pages.items(), vec![30]);
        });
    }

    #[test]
    fn snapshot_reflects_current_state() {
        block_on(async {
            let pages = PagedQuery::new(Box::new(NumberedRows { total: 47 }), PageQuery::new(2, 10)).await;

            let snapshot = pages.snapshot();
            assert_eq!(snapshot.items, (10..20).collect::<Vec<_>>());
            assert_eq!(snapshot.page, 2);
            assert_eq!(snapshot.per_page, 10);
            assert_eq!(snapshot.total, 47);
            assert_eq!(snapshot.total_pages, 5);
            assert!(!snapshot.loading);
            assert_eq!(snapshot.error, None);
        });
    }
}
