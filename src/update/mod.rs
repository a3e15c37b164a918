//! Node.js version update workflow
//!
//! Three-phase pattern, as in the merge engine:
//! 1. Check - decide whether the repository needs a bump (effectful, read-only)
//! 2. Plan - build the `UpdatePlan` (pure, testable)
//! 3. Execute - create branch, commit, open PR (effectful)

mod check;
mod execute;
mod plan;

pub use check::{UpdateCheck, branch_name, get_content, needs_update, try_get_content};
pub use execute::{UpdateOptions, execute_plan, fetch_repo_files, update_all, update_repository};
pub use plan::{
    PlannedCall, UpdatePlan, UpdateState, build_update_plan, update_body, update_title,
};

use crate::types::RepoId;
use serde::{Deserialize, Serialize};

/// A repository kept on the current Node.js release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTarget {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Branch to update; the repository's default branch when unset
    #[serde(default)]
    pub base_branch: Option<String>,
}

impl UpdateTarget {
    /// Build a target using the repository's default branch
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            base_branch: None,
        }
    }

    /// Coordinates of the repository
    pub fn repo_id(&self) -> RepoId {
        RepoId::new(&self.owner, &self.repo)
    }
}
