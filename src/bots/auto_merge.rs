//! auto-merge bot

use super::{AUTO_MERGE, Bot};
use crate::config::AutoMergeSettings;
use crate::error::Result;
use crate::merge::run_auto_merge;
use crate::platform::PlatformService;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Squash-merges green single-commit PRs from trusted bot accounts
pub struct AutoMergeBot {
    platform: Arc<dyn PlatformService>,
    settings: AutoMergeSettings,
}

impl AutoMergeBot {
    /// Create the bot
    pub fn new(platform: Arc<dyn PlatformService>, settings: AutoMergeSettings) -> Self {
        Self { platform, settings }
    }
}

#[async_trait]
impl Bot for AutoMergeBot {
    fn name(&self) -> &'static str {
        AUTO_MERGE
    }

    // The payload carries nothing this bot uses.
    async fn handle(&self, _payload: Value) -> Result<Value> {
        let report = run_auto_merge(
            self.platform.as_ref(),
            &self.settings.query(),
            &self.settings.policy(),
            chrono::Utc::now(),
        )
        .await?;
        Ok(serde_json::to_value(report)?)
    }
}
