use thiserror::Error;
use tracing::error;

use crate::database::DatabaseError;

/// Failures a resource service can report to the HTTP boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable")]
    StorageUnavailable,

    /// A server-side step failed after the request was accepted
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ServiceError::InvalidInput(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::Internal(message.into())
    }

    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} {} not found", kind, id))
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(what) => ServiceError::NotFound(format!("{} not found", what)),
            DatabaseError::Conflict(constraint) => {
                let message = match constraint.as_str() {
                    "users_username_key" => "username is already taken".to_string(),
                    "users_email_key" => "email is already registered".to_string(),
                    other => format!("conflicts with an existing record ({})", other),
                };
                ServiceError::InvalidInput(message)
            }
            other => {
                // Details stay in the logs; clients only learn the store is unavailable
                error!("Store error: {}", other);
                ServiceError::StorageUnavailable
            }
        }
    }
}
