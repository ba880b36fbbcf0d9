//! DTOs exposed by the console API endpoints.

use serde::Serialize;

use crate::domain::statement::FinancialStatement;

/// Query parameters accepted by the `/api/v1/statements` service.
#[derive(Debug, Default)]
pub struct StatementsQuery {
    pub search: Option<String>,
    pub field: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Result payload returned by [`crate::services::api::list_statements`].
#[derive(Debug, Serialize)]
pub struct StatementsResponse {
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub data: Vec<FinancialStatement>,
}
