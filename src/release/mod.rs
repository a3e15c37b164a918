//! Node.js version resolution
//!
//! Resolves the newest stable and LTS releases, with and without the
//! restriction to versions the CI provider publishes images for, and decides
//! which of those a consuming repository should move to.

mod feed;
mod version;

pub use feed::{
    CiTag, DEFAULT_CI_TAGS_URL, DEFAULT_RELEASE_INDEX_URL, HttpVersionFeed, ReleaseEntry,
    VersionFeed,
};
pub use version::NodeVersion;

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Version track a repository follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Newest LTS release
    Lts,
    /// Newest release
    Stable,
    /// Newest LTS release with a CI image
    LtsCircle,
    /// Newest release with a CI image
    StableCircle,
}

impl Mode {
    /// Combine the track and the CI restriction
    pub const fn new(lts: bool, ci_restricted: bool) -> Self {
        match (lts, ci_restricted) {
            (true, false) => Self::Lts,
            (false, false) => Self::Stable,
            (true, true) => Self::LtsCircle,
            (false, true) => Self::StableCircle,
        }
    }

    /// Canonical name (`lts`, `stable`, `lts_circle`, `stable_circle`)
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lts => "lts",
            Self::Stable => "stable",
            Self::LtsCircle => "lts_circle",
            Self::StableCircle => "stable_circle",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Newest versions per mode, plus the LTS membership table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVersions {
    /// Newest release overall
    pub stable: Option<NodeVersion>,
    /// Newest LTS release
    pub lts: Option<NodeVersion>,
    /// Newest release that also has a CI image
    pub stable_circle: Option<NodeVersion>,
    /// Newest LTS release that also has a CI image
    pub lts_circle: Option<NodeVersion>,
    /// Whether each known release is LTS
    pub is_lts: BTreeMap<NodeVersion, bool>,
}

impl ResolvedVersions {
    /// Compute the maxima from raw feed data (pure)
    pub fn from_feeds(releases: &[ReleaseEntry], ci_tags: &[CiTag]) -> Self {
        let ci: HashSet<&str> = ci_tags.iter().map(|t| t.name.as_str()).collect();

        let mut resolved = Self {
            stable: None,
            lts: None,
            stable_circle: None,
            lts_circle: None,
            is_lts: BTreeMap::new(),
        };

        for release in releases {
            let Some(version) = NodeVersion::from_release_tag(&release.version) else {
                continue;
            };
            let lts = release.is_lts();
            let in_ci = ci.contains(&release.version[1..]);
            resolved.is_lts.insert(version, lts);

            bump(&mut resolved.stable, version);
            if lts {
                bump(&mut resolved.lts, version);
            }
            if in_ci {
                bump(&mut resolved.stable_circle, version);
                if lts {
                    bump(&mut resolved.lts_circle, version);
                }
            }
        }

        resolved
    }

    /// Version for a mode; `Error::Feed` when the feeds had none
    pub fn target(&self, mode: Mode) -> Result<NodeVersion> {
        let version = match mode {
            Mode::Lts => self.lts,
            Mode::Stable => self.stable,
            Mode::LtsCircle => self.lts_circle,
            Mode::StableCircle => self.stable_circle,
        };
        version.ok_or_else(|| Error::Feed(format!("no release available for mode {mode}")))
    }

    /// Whether `version` is a known LTS release
    pub fn is_lts(&self, version: &str) -> bool {
        version
            .parse::<NodeVersion>()
            .ok()
            .and_then(|v| self.is_lts.get(&v).copied())
            .unwrap_or(false)
    }
}

fn bump(slot: &mut Option<NodeVersion>, version: NodeVersion) {
    if slot.is_none_or(|current| version > current) {
        *slot = Some(version);
    }
}

/// Decide which mode a repository should follow
///
/// Repositories pinned to an LTS release stay on LTS; everything else
/// (including pins not present in the release index) follows stable.
pub fn decide_mode(current_pinned: &str, resolved: &ResolvedVersions, uses_ci_provider: bool) -> Mode {
    Mode::new(resolved.is_lts(current_pinned), uses_ci_provider)
}

/// Fetch both feeds concurrently and resolve the versions
pub async fn resolve_versions(feed: &dyn VersionFeed) -> Result<ResolvedVersions> {
    let (releases, ci_tags) = futures::try_join!(feed.releases(), feed.ci_tags())?;
    let resolved = ResolvedVersions::from_feeds(&releases, &ci_tags);
    debug!(
        stable = ?resolved.stable,
        lts = ?resolved.lts,
        stable_circle = ?resolved.stable_circle,
        lts_circle = ?resolved.lts_circle,
        "resolved versions"
    );
    if resolved.stable.is_none() {
        return Err(Error::Feed("release index has no valid releases".to_string()));
    }
    Ok(resolved)
}
