use crate::domain::statement::FinancialStatement;
use crate::pagination::Paginated;

/// Query parameters accepted by the index (statements) page service.
#[derive(Debug, Default)]
pub struct IndexQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Optional column the search string applies to.
    pub field: Option<String>,
    /// Page number requested by the user interface.
    pub page: Option<usize>,
}

/// Data required to render the statements table on the index template.
pub struct IndexPageData {
    /// Paginated list of statements to show in the table.
    pub statements: Paginated<FinancialStatement>,
    /// Total number of statements matching the filter.
    pub total: usize,
    /// Search query echoed back to the template when present.
    pub search_query: Option<String>,
    /// Search field echoed back to the template when present.
    pub search_field: Option<String>,
    /// Fetch error banner; prior data stays on screen alongside it.
    pub fetch_error: Option<String>,
}
