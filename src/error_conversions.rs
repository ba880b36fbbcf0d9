//! Error conversion glue between the layered error types.
//!
//! The domain layer must not depend on repository or query error types, so
//! the cross-layer `From` impls live here instead of next to either type.

use crate::domain::types::TypeConstraintError;
use crate::query::FetchError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<RepositoryError> for FetchError {
    fn from(val: RepositoryError) -> Self {
        FetchError::new(val.to_string())
    }
}
