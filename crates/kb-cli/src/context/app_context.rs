use std::sync::Arc;

use anyhow::Context;
use kb_ai::GeminiClient;
use kb_config::KbConfig;
use kb_store::KbService;

use crate::cli::GlobalFlags;

/// Configuration plus the handles commands build from it on demand.
pub struct AppContext {
    pub config: KbConfig,
    concurrency: Option<usize>,
}

impl AppContext {
    pub fn new(config: KbConfig, flags: &GlobalFlags) -> Self {
        Self {
            config,
            concurrency: flags.concurrency,
        }
    }

    /// Connect to the configured store.
    pub async fn service(&self) -> anyhow::Result<KbService> {
        let store_config = self.config.require_store()?;
        let store = kb_store::open(store_config)
            .await
            .with_context(|| format!("failed to open {:?} store", store_config.backend))?;
        Ok(KbService::new(store))
    }

    /// The process-wide AI client.
    pub fn gemini(&self) -> anyhow::Result<Arc<GeminiClient>> {
        let ai_config = self.config.require_ai()?;
        let client = GeminiClient::new(ai_config).context("failed to build AI client")?;
        tracing::debug!(model = client.model(), "AI client ready");
        Ok(Arc::new(client))
    }

    /// Chapters synchronized at once.
    pub fn upload_concurrency(&self) -> usize {
        self.concurrency
            .unwrap_or(self.config.general.max_concurrent_uploads)
    }

    /// AI requests in flight at once.
    pub fn generation_concurrency(&self) -> usize {
        self.concurrency
            .unwrap_or(self.config.general.max_concurrent_generations)
    }
}
