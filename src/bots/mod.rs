//! Bot entry points and the name → handler registration table

mod auto_merge;
mod node_release;

pub use auto_merge::AutoMergeBot;
pub use node_release::NodeReleaseBot;

use crate::config::BotsConfig;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::release::VersionFeed;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Name of the auto-merge bot
pub const AUTO_MERGE: &str = "auto-merge";

/// Name of the node-release bot
pub const NODE_RELEASE: &str = "node-release";

/// Built-in bots with a one-line description, sorted by name
pub const BUILTIN_BOTS: [(&str, &str); 2] = [
    (AUTO_MERGE, "squash-merge green single-commit PRs from trusted bots"),
    (NODE_RELEASE, "open PRs bumping target repos to the current Node.js release"),
];

/// Options every bot understands
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// Compute the plan without performing mutating calls
    #[serde(default)]
    pub dry_run: bool,
}

impl Payload {
    /// Read the options from a trigger body
    ///
    /// Anything that is not a JSON object is treated as an empty object, as
    /// are unknown or mistyped fields.
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// A webhook-triggered bot
#[async_trait]
pub trait Bot: Send + Sync {
    /// Name the bot is registered under
    fn name(&self) -> &'static str;

    /// Handle one trigger; the result is returned verbatim to the caller
    async fn handle(&self, payload: Value) -> Result<Value>;
}

/// Explicit `{name -> handler}` table
#[derive(Default)]
pub struct BotRegistry {
    bots: BTreeMap<&'static str, Box<dyn Bot>>,
}

impl BotRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with both bots wired to `platform` and `feed`
    pub fn with_defaults(
        config: &BotsConfig,
        platform: Arc<dyn PlatformService>,
        feed: Arc<dyn VersionFeed>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(AutoMergeBot::new(
            Arc::clone(&platform),
            config.auto_merge.clone(),
        )));
        registry.register(Box::new(NodeReleaseBot::new(
            platform,
            feed,
            config.node_release.clone(),
        )));
        registry
    }

    /// Add a bot, replacing any bot with the same name
    pub fn register(&mut self, bot: Box<dyn Bot>) {
        self.bots.insert(bot.name(), bot);
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        self.bots.keys().copied().collect()
    }

    /// Look up a bot
    pub fn get(&self, name: &str) -> Option<&dyn Bot> {
        self.bots.get(name).map(AsRef::as_ref)
    }

    /// Run the bot registered as `name`
    pub async fn dispatch(&self, name: &str, payload: Value) -> Result<Value> {
        let bot = self
            .get(name)
            .ok_or_else(|| Error::UnknownBot(name.to_string()))?;
        info!(bot = name, %payload, "dispatching");
        bot.handle(payload).await
    }
}
