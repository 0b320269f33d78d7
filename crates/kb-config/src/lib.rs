//! # kb-config
//!
//! Layered configuration loading for kbase using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`KBASE_*` prefix, `__` as separator)
//! 2. Legacy variables `SUPABASE_URL`, `SUPABASE_SERVICE_KEY`, `GEMINI_API_KEY`
//! 3. Project-level `.kbase/config.toml`
//! 4. User-level `~/.config/kbase/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `KBASE_STORE__URL` -> `store.url`,
//! `KBASE_GENERAL__MAX_CONCURRENT_UPLOADS` -> `general.max_concurrent_uploads`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use kb_config::KbConfig;
//!
//! let config = KbConfig::load_with_dotenv().expect("config");
//! if config.store.is_configured() {
//!     println!("store: {:?}", config.store.backend);
//! }
//! ```

mod ai;
mod error;
mod general;
mod store;

pub use ai::AiConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use store::{StoreBackend, StoreConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Legacy variable names and the config keys they feed.
const LEGACY_ENV: [(&str, &str); 3] = [
    ("SUPABASE_URL", "store.url"),
    ("SUPABASE_SERVICE_KEY", "store.service_key"),
    ("GEMINI_API_KEY", "ai.api_key"),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KbConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl KbConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT read `.env`; use [`Self::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source fails to parse or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the working directory, then every other source.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect it or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".kbase/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
            .merge(Self::legacy_env())
            .merge(Env::prefixed("KBASE_").split("__"))
    }

    /// Reject values no command can run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for zero concurrency limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            (
                "general.max_concurrent_uploads",
                self.general.max_concurrent_uploads,
            ),
            (
                "general.max_concurrent_generations",
                self.general.max_concurrent_generations,
            ),
        ];
        for (field, value) in limits {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Fail unless the configured store backend can connect.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] for the `store` section.
    pub fn require_store(&self) -> Result<&StoreConfig, ConfigError> {
        if self.store.is_configured() {
            Ok(&self.store)
        } else {
            Err(ConfigError::NotConfigured {
                section: "store".to_string(),
            })
        }
    }

    /// Fail unless an AI key is present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] for the `ai` section.
    pub fn require_ai(&self) -> Result<&AiConfig, ConfigError> {
        if self.ai.is_configured() {
            Ok(&self.ai)
        } else {
            Err(ConfigError::NotConfigured {
                section: "ai".to_string(),
            })
        }
    }

    fn legacy_env() -> Env {
        Env::raw()
            .only(&LEGACY_ENV.map(|(name, _)| name))
            .map(|key| {
                LEGACY_ENV
                    .iter()
                    .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                    .map_or_else(|| key.as_str().to_owned().into(), |(_, target)| (*target).into())
            })
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kbase").join("config.toml"))
    }
}
