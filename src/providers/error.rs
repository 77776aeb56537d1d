//! Error types for the bundled service implementations.

use crate::error::RemoteOperation;
use thiserror::Error;

/// Errors returned by [`super::InMemoryAppService`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("Service unavailable during {operation}")]
    Unavailable {
        /// The operation that was refused
        operation: RemoteOperation,
    },

    #[error("Invalid application data: {message}")]
    InvalidData {
        /// Description of the invalid data
        message: String,
    },
}

impl ServiceError {
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }
}
