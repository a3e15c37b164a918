//! List command - show registered bots and their effective settings

use crate::cli::style::Stylize;
use anstream::println;
use repo_bots::bots::{AUTO_MERGE, BUILTIN_BOTS, NODE_RELEASE};
use repo_bots::config::load_config;
use repo_bots::error::Result;
use std::path::Path;

/// Run the list command
///
/// Needs no credentials; only the configuration is read.
pub fn run_list(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    println!("{}:", "Bots".emphasis());
    for (name, description) in BUILTIN_BOTS {
        println!("  {}  {}", name.accent(), description.muted());
        match name {
            AUTO_MERGE => {
                let settings = &config.auto_merge;
                println!("    logins: {}", settings.logins.join(", "));
                println!("    min age: {}s", settings.min_age_secs);
            }
            NODE_RELEASE => {
                for target in &config.node_release.targets {
                    let base = target.base_branch.as_deref().unwrap_or("<default>");
                    println!("    {} {}", target.repo_id(), format!("({base})").muted());
                }
            }
            _ => {}
        }
    }
    Ok(())
}
