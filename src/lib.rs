//! repo-bots: webhook-triggered GitHub maintenance bots
//!
//! Two bots are provided:
//!
//! - `auto-merge` squash-merges single-commit pull requests opened by trusted
//!   bot accounts once every status check is green.
//! - `node-release` opens pull requests that bump a fixed set of repositories
//!   to the current Node.js release.
//!
//! Decision logic is kept pure ([`merge::evaluate_pull_request`],
//! [`update::build_update_plan`], [`patch::generate_patch`]); all I/O goes
//! through the [`platform::PlatformService`] and [`release::VersionFeed`]
//! traits so it can be mocked.

pub mod auth;
pub mod bots;
pub mod config;
pub mod error;
pub mod merge;
pub mod patch;
pub mod platform;
pub mod release;
pub mod types;
pub mod update;

pub use error::{Error, Result};
