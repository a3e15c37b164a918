//! Update detection and trusted content reads

use crate::error::{Error, Result};
use crate::patch::{ManifestKind, pinned_node_version};
use crate::platform::PlatformService;
use crate::release::{Mode, NodeVersion, ResolvedVersions, decide_mode};
use crate::types::RepoId;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tracing::debug;

/// Outcome of checking whether a repository needs a version bump
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    /// Already pins one of the resolved versions
    UpToDate {
        /// Currently pinned version
        pinned: String,
    },
    /// The update branch already exists (a PR is open or was handled)
    BranchExists {
        /// Existing branch name
        branch: String,
    },
    /// A bump is needed
    Needed {
        /// Currently pinned version
        pinned: String,
        /// Track the repository follows
        mode: Mode,
        /// Version to move to
        version: NodeVersion,
        /// Branch to create
        branch: String,
    },
}

impl UpdateCheck {
    /// Whether a bump is needed
    pub const fn is_needed(&self) -> bool {
        matches!(self, Self::Needed { .. })
    }
}

/// Branch name used for a bump to `version`
pub fn branch_name(prefix: &str, version: &NodeVersion) -> String {
    format!("{prefix}-{version}")
}

/// Read a file and return its UTF-8 text
///
/// The entry must be a regular file with string content; anything else
/// (directories, symlinks, submodules) is rejected before the content is
/// trusted.
pub async fn get_content(platform: &dyn PlatformService, repo: &RepoId, path: &str) -> Result<String> {
    let entry = platform.get_content(repo, path).await?;
    if entry.kind != "file" {
        return Err(Error::Assertion(format!(
            "expected {repo}/{path} to be a file, got {}",
            entry.kind
        )));
    }
    let Some(Value::String(content)) = entry.content else {
        return Err(Error::Assertion(format!(
            "expected content of {repo}/{path} to be a string"
        )));
    };
    decode_content(&content, entry.encoding.as_deref())
        .map_err(|e| Error::Assertion(format!("{repo}/{path}: {e}")))
}

/// Like [`get_content`], but a missing file is `None`
pub async fn try_get_content(
    platform: &dyn PlatformService,
    repo: &RepoId,
    path: &str,
) -> Result<Option<String>> {
    match get_content(platform, repo, path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

fn decode_content(content: &str, encoding: Option<&str>) -> std::result::Result<String, String> {
    match encoding {
        Some("base64") | None => {
            let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            let bytes = STANDARD.decode(compact).map_err(|e| e.to_string())?;
            String::from_utf8(bytes).map_err(|e| e.to_string())
        }
        Some("utf-8" | "utf8") => Ok(content.to_string()),
        Some(other) => Err(format!("unsupported encoding {other}")),
    }
}

/// Decide whether `repo` needs a bump
///
/// Up to date when the pinned version equals the newest stable, the newest
/// LTS, or the target of the repository's mode. Otherwise an existing update
/// branch also means nothing to do; only a 404 on the branch lookup means
/// the bump is needed.
pub async fn needs_update(
    platform: &dyn PlatformService,
    repo: &RepoId,
    versions: &ResolvedVersions,
    branch_prefix: &str,
) -> Result<UpdateCheck> {
    let (package_json, circleci) = futures::try_join!(
        get_content(platform, repo, ManifestKind::PackageJson.path()),
        try_get_content(platform, repo, ManifestKind::CircleCiConfig.path()),
    )?;
    let pinned = pinned_node_version(&package_json)?;

    let matches = |v: Option<NodeVersion>| v.is_some_and(|v| v.to_string() == pinned);
    if matches(versions.stable) || matches(versions.lts) {
        debug!(%repo, %pinned, "already on a current release");
        return Ok(UpdateCheck::UpToDate { pinned });
    }

    let mode = decide_mode(&pinned, versions, circleci.is_some());
    let version = versions.target(mode)?;
    if version.to_string() == pinned {
        debug!(%repo, %pinned, %mode, "already on the mode's release");
        return Ok(UpdateCheck::UpToDate { pinned });
    }

    let branch = branch_name(branch_prefix, &version);
    match platform.get_branch(repo, &branch).await {
        Ok(existing) => {
            if existing.name != branch {
                return Err(Error::Assertion(format!(
                    "branch lookup for {branch} returned {}",
                    existing.name
                )));
            }
            debug!(%repo, %branch, "update branch already exists");
            Ok(UpdateCheck::BranchExists { branch })
        }
        Err(e) if e.is_not_found() => Ok(UpdateCheck::Needed {
            pinned,
            mode,
            version,
            branch,
        }),
        Err(e) => Err(e),
    }
}
