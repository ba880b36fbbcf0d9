//! Form definitions backing the console routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod backups;
pub mod main;
pub mod settings;
pub mod users;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid user id")]
    InvalidUserId,

    #[error("invalid amount")]
    InvalidAmount,

    #[error("period end precedes period start")]
    InvalidPeriod,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("invalid csv: {0}")]
    InvalidCsv(String),
}
