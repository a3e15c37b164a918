//! Shared command context for CLI commands
//!
//! Extracts the setup `run` needs: configuration, credentials, the GitHub
//! service, the version feed and the bot registry.

use repo_bots::auth::get_github_auth;
use repo_bots::bots::BotRegistry;
use repo_bots::config::load_config;
use repo_bots::error::Result;
use repo_bots::platform::{GitHubService, PlatformService, RestClientOptions};
use repo_bots::release::{HttpVersionFeed, VersionFeed};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Shared context for CLI commands that talk to GitHub
pub struct CommandContext {
    /// Bots wired to the live services
    pub registry: BotRegistry,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// Loads configuration, resolves a token and builds the live services.
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = load_config(config_path)?;

        let auth = get_github_auth().await?;
        debug!(source = ?auth.source, "resolved GitHub token");

        let options = RestClientOptions {
            base_url: config.github.api_url.clone(),
            token: auth.token,
            connect_timeout: config.github.connect_timeout(),
            request_timeout: config.github.request_timeout(),
        };
        let platform: Arc<dyn PlatformService> =
            Arc::new(GitHubService::new(&options, &config.github.preview_accept)?);

        let feed: Arc<dyn VersionFeed> = Arc::new(HttpVersionFeed::new(
            config.node_release.release_index_url.clone(),
            config.node_release.ci_tags_url.clone(),
            config.github.connect_timeout(),
            config.github.request_timeout(),
        )?);

        let registry = BotRegistry::with_defaults(&config, platform, feed);
        Ok(Self { registry })
    }
}
