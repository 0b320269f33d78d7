//! Store error types.

use thiserror::Error;

/// Errors from remote store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The store returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// A row could not be turned into (or out of) its typed form.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Serializing a typed row failed.
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A lookup that must match found nothing.
    #[error("Not found: {entity} {id}")]
    NotFound { entity: String, id: String },

    /// The configured backend cannot be used.
    #[error("Store not configured: {0}")]
    NotConfigured(String),
}
