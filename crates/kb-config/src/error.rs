//! Failures while assembling [`crate::KbConfig`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or environment value could not be merged or decoded.
    #[error("failed to load configuration: {0}")]
    Figment(#[from] figment::Error),

    /// A command needs a section whose required values are empty.
    #[error("the '{section}' section is not configured; set it in .kbase/config.toml or KBASE_{} env vars", section.to_uppercase())]
    NotConfigured { section: String },

    /// A value parsed but cannot be used.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
