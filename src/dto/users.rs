use crate::domain::user::User;
use crate::pagination::Paginated;

/// Query parameters accepted by the users page service.
#[derive(Debug, Default)]
pub struct UsersQuery {
    pub search: Option<String>,
    pub field: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the user roles screen.
pub struct UsersPageData {
    pub users: Paginated<User>,
    pub total: usize,
    pub search_query: Option<String>,
    pub search_field: Option<String>,
    pub fetch_error: Option<String>,
}
