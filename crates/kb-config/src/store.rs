//! Remote store configuration.

use serde::{Deserialize, Serialize};

/// Which backend serves the remote tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// PostgREST endpoint (e.g. a Supabase project).
    #[default]
    Postgrest,
    /// Local libSQL database file.
    Libsql,
    /// Process-local tables, gone on exit. Useful for dry runs.
    Memory,
}

fn default_local_path() -> String {
    ".kbase/store.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Project URL, e.g. `https://abcd.supabase.co`.
    #[serde(default)]
    pub url: String,

    /// Service role key sent as `apikey` and bearer token.
    #[serde(default)]
    pub service_key: String,

    /// Database file for the libsql backend.
    #[serde(default = "default_local_path")]
    pub local_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: String::new(),
            service_key: String::new(),
            local_path: default_local_path(),
        }
    }
}

impl StoreConfig {
    /// Check if the selected backend has what it needs to connect.
    pub fn is_configured(&self) -> bool {
        match self.backend {
            StoreBackend::Postgrest => !self.url.is_empty() && !self.service_key.is_empty(),
            StoreBackend::Libsql => !self.local_path.is_empty(),
            StoreBackend::Memory => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_postgrest_is_not_configured() {
        let config = StoreConfig::default();
        assert_eq!(config.backend, StoreBackend::Postgrest);
        assert!(!config.is_configured());
        assert_eq!(config.local_path, ".kbase/store.db");
    }

    #[test]
    fn configured_when_url_and_key_set() {
        let config = StoreConfig {
            url: "https://abcd.supabase.co".into(),
            service_key: "service-key".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn local_backends_need_no_credentials() {
        for backend in [StoreBackend::Libsql, StoreBackend::Memory] {
            let config = StoreConfig {
                backend,
                ..Default::default()
            };
            assert!(config.is_configured());
        }
    }
}
