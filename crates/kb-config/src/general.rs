//! Run-wide settings.

use serde::{Deserialize, Serialize};

const fn default_max_concurrent_uploads() -> usize {
    1
}

const fn default_max_concurrent_generations() -> usize {
    3
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Chapters synchronized at the same time.
    #[serde(default = "default_max_concurrent_uploads")]
    pub max_concurrent_uploads: usize,

    /// AI requests (extraction, suggestions) in flight at the same time.
    #[serde(default = "default_max_concurrent_generations")]
    pub max_concurrent_generations: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            max_concurrent_uploads: default_max_concurrent_uploads(),
            max_concurrent_generations: default_max_concurrent_generations(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.max_concurrent_uploads, 1);
        assert_eq!(config.max_concurrent_generations, 3);
    }
}
