use anyhow::Context;
use kb_config::KbConfig;

/// Read `.env` from the working directory, then every configuration layer.
pub fn load_config() -> anyhow::Result<KbConfig> {
    KbConfig::load_with_dotenv().context("failed to load kbase configuration")
}
