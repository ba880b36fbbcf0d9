use crate::domain::backup::Backup;
use crate::pagination::Paginated;

/// Query parameters accepted by the backups page service.
#[derive(Debug, Default)]
pub struct BackupsQuery {
    pub search: Option<String>,
    pub field: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the backups screen.
pub struct BackupsPageData {
    pub backups: Paginated<Backup>,
    pub total: usize,
    pub search_query: Option<String>,
    pub search_field: Option<String>,
    pub fetch_error: Option<String>,
}
