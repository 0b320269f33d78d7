//! Cross-cutting error types for kbase.
//!
//! Domain-specific errors (`StoreError`, `ArtifactError`, ...) live in their
//! respective crates and wrap this one where identifiers are involved.

use thiserror::Error;

/// Errors that can be raised by any kbase crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A string that should hold an identifier does not parse as one.
    #[error("Malformed identifier: '{value}'")]
    MalformedId { value: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
