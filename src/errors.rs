//! Unified error type for the product administration backend.

use thiserror::Error;

/// Every failure the crate can report.
#[derive(Debug, Error)]
pub enum Error {
    /// No row matched the requested identifier, `resource` reads like `Product/42`
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The request was understood but could not be applied
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

impl Error {
    /// Builds a [`Error::NotFound`] for `kind/id`.
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            resource: format!("{kind}/{id}"),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
