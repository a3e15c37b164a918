//! Patch generation for Node.js version bumps
//!
//! Pure text substitution over the files that pin the Node.js version. Every
//! substitution must change the file: a pattern that matches nothing means
//! the file is not in the format we assumed, and that is reported as an
//! assertion failure instead of being skipped.

mod rules;

pub use rules::ManifestKind;

use crate::error::{Error, Result};
use crate::release::NodeVersion;
use crate::types::FileUpdate;

/// Current contents of the version-pinning files of one repository
#[derive(Debug, Clone, Default)]
pub struct RepoFiles {
    /// `package.json` (mandatory)
    pub package_json: String,
    /// `.travis.yml`, if present
    pub travis: Option<String>,
    /// `circle.yml`, if present
    pub circle: Option<String>,
    /// `.circleci/config.yml`, if present
    pub circleci: Option<String>,
}

impl RepoFiles {
    /// Content of a given kind, if present
    pub fn get(&self, kind: ManifestKind) -> Option<&str> {
        match kind {
            ManifestKind::PackageJson => Some(&self.package_json),
            ManifestKind::TravisYml => self.travis.as_deref(),
            ManifestKind::CircleYml => self.circle.as_deref(),
            ManifestKind::CircleCiConfig => self.circleci.as_deref(),
        }
    }
}

/// Build a [`FileUpdate`], refusing no-op updates
pub fn file_update(path: &str, old: &str, new: String) -> Result<FileUpdate> {
    if old == new {
        return Err(Error::Assertion(format!("expected {path} to be edited")));
    }
    Ok(FileUpdate {
        path: path.to_string(),
        content: new,
    })
}

/// Rewrite one file to pin `version`
///
/// Each rule of the format is applied in turn and each must change the text.
pub fn patch_file(kind: ManifestKind, content: &str, version: &NodeVersion) -> Result<FileUpdate> {
    let version = version.to_string();
    let mut current = content.to_string();
    for rule in kind.rules() {
        let next = rule.apply(&current, &version);
        if next == current {
            return Err(Error::Assertion(format!("expected {} to be edited", kind.path())));
        }
        current = next;
    }
    file_update(kind.path(), content, current)
}

/// Pinned `engines.node` of a `package.json`
pub fn pinned_node_version(package_json: &str) -> Result<String> {
    let manifest: serde_json::Value = serde_json::from_str(package_json)?;
    manifest
        .pointer("/engines/node")
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| Error::Assertion("package.json has no engines.node string".to_string()))
}

/// Produce the file updates that move a repository to `version`
///
/// `package.json` is always patched; CI configs only when present. The
/// patched manifest must pin exactly `version` afterwards.
pub fn generate_patch(files: &RepoFiles, version: &NodeVersion) -> Result<Vec<FileUpdate>> {
    let mut updates = Vec::new();
    for kind in ManifestKind::ALL {
        let Some(content) = files.get(kind) else {
            continue;
        };
        let update = patch_file(kind, content, version)?;
        if kind == ManifestKind::PackageJson {
            let pinned = pinned_node_version(&update.content)?;
            if pinned != version.to_string() {
                return Err(Error::Assertion(format!(
                    "expected package.json to pin {version}, found {pinned}"
                )));
            }
        }
        updates.push(update);
    }
    Ok(updates)
}
