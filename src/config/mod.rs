//! Bot configuration
//!
//! Everything has a default equal to the bots' built-in behavior, so an
//! empty (or missing) config file is valid.

mod storage;

pub use storage::{CONFIG_FILE, default_config_paths, load_config, parse_config};

use crate::merge::MergePolicy;
use crate::platform::rest::POLARIS_PREVIEW_ACCEPT;
use crate::release::{DEFAULT_CI_TAGS_URL, DEFAULT_RELEASE_INDEX_URL};
use crate::types::IssueQuery;
use crate::update::{UpdateOptions, UpdateTarget};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotsConfig {
    /// GitHub API connection
    pub github: GitHubSettings,
    /// auto-merge bot
    pub auto_merge: AutoMergeSettings,
    /// node-release bot
    pub node_release: NodeReleaseSettings,
}

/// GitHub API connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    /// API root
    pub api_url: String,
    /// Media type for the merge endpoint
    pub preview_accept: String,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            preview_accept: POLARIS_PREVIEW_ACCEPT.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
        }
    }
}

impl GitHubSettings {
    /// Connect timeout
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Whole-request timeout
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// auto-merge bot settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoMergeSettings {
    /// Author logins whose PRs are auto-merged
    pub logins: Vec<String>,
    /// Minimum age since last update, in seconds
    pub min_age_secs: i64,
    /// Issue listing `filter`
    pub filter: String,
    /// Issue listing `state`
    pub state: String,
    /// Candidates processed at once
    pub concurrency: usize,
    /// Delete the head branch after merging
    pub delete_branch: bool,
}

impl Default for AutoMergeSettings {
    fn default() -> Self {
        let policy = MergePolicy::default();
        let query = IssueQuery::default();
        Self {
            logins: policy.logins,
            min_age_secs: policy.min_age.num_seconds(),
            filter: query.filter,
            state: query.state,
            concurrency: policy.concurrency,
            delete_branch: policy.delete_branch,
        }
    }
}

impl AutoMergeSettings {
    /// Merge policy described by these settings
    pub fn policy(&self) -> MergePolicy {
        MergePolicy {
            logins: self.logins.clone(),
            min_age: chrono::Duration::seconds(self.min_age_secs),
            concurrency: self.concurrency,
            delete_branch: self.delete_branch,
        }
    }

    /// Issue listing query described by these settings
    pub fn query(&self) -> IssueQuery {
        IssueQuery {
            filter: self.filter.clone(),
            state: self.state.clone(),
        }
    }
}

/// node-release bot settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeReleaseSettings {
    /// Release index feed
    pub release_index_url: String,
    /// CI image tag feed
    pub ci_tags_url: String,
    /// Update branch prefix
    pub branch_prefix: String,
    /// Repositories to keep current
    pub targets: Vec<UpdateTarget>,
}

impl Default for NodeReleaseSettings {
    fn default() -> Self {
        Self {
            release_index_url: DEFAULT_RELEASE_INDEX_URL.to_string(),
            ci_tags_url: DEFAULT_CI_TAGS_URL.to_string(),
            branch_prefix: UpdateOptions::default().branch_prefix,
            targets: default_targets(),
        }
    }
}

impl NodeReleaseSettings {
    /// Update options for a run
    pub fn options(&self, dry_run: bool) -> UpdateOptions {
        UpdateOptions {
            dry_run,
            branch_prefix: self.branch_prefix.clone(),
        }
    }
}

fn default_targets() -> Vec<UpdateTarget> {
    [
        ("ForbesLindesay", "forbeslindesay-bots"),
        ("ForbesLindesay", "tempjs.org"),
        ("esdiscuss", "bot"),
        ("esdiscuss", "esdiscuss.org"),
        ("readable-email", "readable-email-bot"),
        ("readable-email", "readable-email-site"),
        ("jepso", "MAPS"),
        ("jepso", "canoeslalomentries"),
    ]
    .into_iter()
    .map(|(owner, repo)| UpdateTarget {
        owner: owner.to_string(),
        repo: repo.to_string(),
        base_branch: Some("master".to_string()),
    })
    .collect()
}
