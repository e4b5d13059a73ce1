//! Service-level error taxonomy.
//!
//! Every operation in the registration, registry, and scheduler services
//! surfaces one of these kinds. None are retried by the service itself;
//! retries, if any, belong to the caller.

use thiserror::Error;

use crate::db::DbError;

/// Errors surfaced by the clinic service core.
#[derive(Error, Debug)]
pub enum ClinicError {
    /// A required field is missing or malformed. Payload names the field.
    #[error("missing or invalid field: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The caller is authenticated but not authorized for this action.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A uniqueness violation. Payload names the colliding field.
    #[error("conflict on {0}")]
    Conflict(String),

    /// The requested transition is not legal from the current status.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("database error: {0}")]
    Database(#[from] DbError),
}

impl ClinicError {
    /// Stable machine-readable kind for the API edge.
    pub fn kind(&self) -> &'static str {
        match self {
            ClinicError::Validation(_) => "VALIDATION",
            ClinicError::NotFound(_) => "NOT_FOUND",
            ClinicError::Forbidden(_) => "FORBIDDEN",
            ClinicError::Conflict(_) => "CONFLICT",
            ClinicError::InvalidState(_) => "INVALID_STATE",
            ClinicError::Database(_) => "INTERNAL",
        }
    }

    /// Shorthand for a validation failure naming a field.
    pub fn missing(field: &str) -> Self {
        ClinicError::Validation(field.to_string())
    }
}

pub type ClinicResult<T> = Result<T, ClinicError>;

/// Reject an empty or whitespace-only required field.
pub fn require_field(value: &str, field: &str) -> ClinicResult<()> {
    if value.trim().is_empty() {
        return Err(ClinicError::missing(field));
    }
    Ok(())
}
