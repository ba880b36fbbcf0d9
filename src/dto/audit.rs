use crate::domain::audit_event::AuditEvent;
use crate::pagination::Paginated;

/// Query parameters accepted by the audit trail service.
#[derive(Debug, Default)]
pub struct AuditQuery {
    pub search: Option<String>,
    pub field: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the audit trail screen.
pub struct AuditPageData {
    pub events: Paginated<AuditEvent>,
    pub total: usize,
    pub search_query: Option<String>,
    pub search_field: Option<String>,
    pub fetch_error: Option<String>,
}
