//! node-release bot

use super::{Bot, NODE_RELEASE, Payload};
use crate::config::NodeReleaseSettings;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::release::{VersionFeed, resolve_versions};
use crate::update::update_all;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Opens PRs moving each target repository to the current Node.js release
pub struct NodeReleaseBot {
    platform: Arc<dyn PlatformService>,
    feed: Arc<dyn VersionFeed>,
    settings: NodeReleaseSettings,
}

impl NodeReleaseBot {
    /// Create the bot
    pub fn new(
        platform: Arc<dyn PlatformService>,
        feed: Arc<dyn VersionFeed>,
        settings: NodeReleaseSettings,
    ) -> Self {
        Self {
            platform,
            feed,
            settings,
        }
    }
}

#[async_trait]
impl Bot for NodeReleaseBot {
    fn name(&self) -> &'static str {
        NODE_RELEASE
    }

    /// Returns one array of planned calls per target repository
    async fn handle(&self, payload: Value) -> Result<Value> {
        let payload = Payload::from_value(&payload);
        let versions = resolve_versions(self.feed.as_ref()).await?;
        info!(
            targets = self.settings.targets.len(),
            dry_run = payload.dry_run,
            "running node-release"
        );

        let results = update_all(
            self.platform.as_ref(),
            &self.settings.targets,
            &versions,
            &self.settings.options(payload.dry_run),
        )
        .await?;
        Ok(serde_json::to_value(results)?)
    }
}
