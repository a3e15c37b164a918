//! Version feeds: the Node.js release index and the CI image tag list

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Node.js release index
pub const DEFAULT_RELEASE_INDEX_URL: &str = "https://nodejs.org/download/release/index.json";

/// Default CircleCI node image tag list
pub const DEFAULT_CI_TAGS_URL: &str = "https://index.docker.io/v1/repositories/circleci/node/tags";

/// One entry of the release index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseEntry {
    /// Release tag, e.g. `v16.0.0`
    pub version: String,
    /// `false`, or the LTS codename
    #[serde(default)]
    pub lts: serde_json::Value,
}

impl ReleaseEntry {
    /// Whether the release index flags this release as LTS
    ///
    /// The feed uses `false` for non-LTS lines and a codename string for LTS
    /// lines; any truthy value counts.
    pub fn is_lts(&self) -> bool {
        match &self.lts {
            serde_json::Value::Bool(b) => *b,
            serde_json::Value::String(s) => !s.is_empty(),
            serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
            serde_json::Value::Null => false,
        }
    }
}

/// One tag of the CI provider's image registry (bare version, no `v`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiTag {
    /// Tag name, e.g. `16.0.0`
    pub name: String,
}

/// Source of the two version feeds
#[async_trait]
pub trait VersionFeed: Send + Sync {
    /// Fetch the full release index
    async fn releases(&self) -> Result<Vec<ReleaseEntry>>;

    /// Fetch the CI provider's image tags
    async fn ci_tags(&self) -> Result<Vec<CiTag>>;
}

/// [`VersionFeed`] backed by plain HTTP GETs
pub struct HttpVersionFeed {
    http: Client,
    release_index_url: String,
    ci_tags_url: String,
}

impl HttpVersionFeed {
    /// Create a feed reading from the given URLs
    pub fn new(
        release_index_url: impl Into<String>,
        ci_tags_url: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("repo-bots/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            release_index_url: release_index_url.into(),
            ci_tags_url: ci_tags_url.into(),
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "fetching version feed");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Feed(format!("{url} returned {status}")));
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Feed(format!("{url}: {e}")))
    }
}

#[async_trait]
impl VersionFeed for HttpVersionFeed {
    async fn releases(&self) -> Result<Vec<ReleaseEntry>> {
        self.fetch(&self.release_index_url).await
    }

    async fn ci_tags(&self) -> Result<Vec<CiTag>> {
        self.fetch(&self.ci_tags_url).await
    }
}
