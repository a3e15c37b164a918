//! Loading configuration from disk.

use super::BotsConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filename looked up in the working directory.
pub const CONFIG_FILE: &str = "repo-bots.toml";

/// Candidate config locations, in lookup order.
///
/// `./repo-bots.toml`, then `<config dir>/repo-bots/config.toml`.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("repo-bots").join("config.toml"));
    }
    paths
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<BotsConfig> {
    toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the first existing default
/// location is used, falling back to built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<BotsConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => path,
            None => {
                debug!("no config file found, using defaults");
                return Ok(BotsConfig::default());
            }
        },
    };

    debug!(path = %path.display(), "loading config");
    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    parse_config(&content).map_err(|e| match e {
        Error::Config(msg) => Error::Config(format!("failed to parse {}: {msg}", path.display())),
        other => other,
    })
}
