use kb_config::KbConfig;

/// Warn about env vars that look meant for a section still at its defaults,
/// usually a single underscore where `__` separates section and key.
pub fn warn_unconfigured(config: &KbConfig) {
    for warning in unconfigured_warnings(config, std::env::vars().map(|(key, _)| key)) {
        tracing::warn!("{warning}");
    }
}

fn unconfigured_warnings<I>(config: &KbConfig, keys: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let keys: Vec<String> = keys.into_iter().collect();
    let mentions = |prefix: &str| keys.iter().any(|key| key.starts_with(prefix));

    let mut warnings = Vec::new();
    if !config.store.is_configured() && mentions("KBASE_STORE") {
        warnings.push(
            "store config appears default while KBASE_STORE* env vars exist. Use double underscores (example: KBASE_STORE__URL)."
                .to_string(),
        );
    }
    if !config.ai.is_configured() && mentions("KBASE_AI") {
        warnings.push(
            "ai config appears default while KBASE_AI* env vars exist. Use double underscores (example: KBASE_AI__API_KEY)."
                .to_string(),
        );
    }
    warnings
}
