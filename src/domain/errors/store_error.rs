//! Persistence error types.

use thiserror::Error;

/// Errors raised by profile store backends.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StoreError {
    #[error("failed to connect to database: {message}")]
    Connection { message: String },

    #[error("failed to initialize schema: {message}")]
    Schema { message: String },

    #[error("query failed: {message}")]
    Query { message: String },

    #[error("record not found: {what}")]
    NotFound { what: String },
}

impl StoreError {
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}
