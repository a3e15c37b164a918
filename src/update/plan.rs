//! Update planning - pure construction of the call sequence
//!
//! No I/O happens here. The plan is plain data so a dry run can return it
//! as-is and tests can compare it against what a live run executes.

use crate::error::Result;
use crate::platform::PlatformService;
use crate::release::{Mode, NodeVersion};
use crate::types::{CommitRequest, FileUpdate, PullRequestDraft, RepoId};
use serde::Serialize;

/// Workflow state of a single repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    /// Reading the manifest and looking for an existing branch
    Checking,
    /// Nothing to do
    NotNeeded,
    /// A bump is needed
    Needed,
    /// File updates generated
    Patched,
    /// Update branch created
    Branched,
    /// File updates committed
    Committed,
    /// Pull request opened
    PrOpened,
}

impl std::fmt::Display for UpdateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Checking => "checking",
            Self::NotNeeded => "not_needed",
            Self::Needed => "needed",
            Self::Patched => "patched",
            Self::Branched => "branched",
            Self::Committed => "committed",
            Self::PrOpened => "pr_opened",
        };
        f.write_str(name)
    }
}

/// One mutating API call of an update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PlannedCall {
    /// Create the update branch from the base branch
    Branch {
        /// Target repository
        repo: RepoId,
        /// Base branch
        from: String,
        /// New branch
        branch: String,
    },
    /// Commit the file updates onto the update branch
    Commit {
        /// Target repository
        repo: RepoId,
        /// Commit to create
        commit: CommitRequest,
    },
    /// Open the pull request
    Pull {
        /// Target repository
        repo: RepoId,
        /// Pull request to open
        pull: PullRequestDraft,
    },
}

impl PlannedCall {
    /// Workflow state reached once this call succeeds
    pub const fn reaches(&self) -> UpdateState {
        match self {
            Self::Branch { .. } => UpdateState::Branched,
            Self::Commit { .. } => UpdateState::Committed,
            Self::Pull { .. } => UpdateState::PrOpened,
        }
    }

    /// Perform the call
    pub async fn apply(&self, platform: &dyn PlatformService) -> Result<()> {
        match self {
            Self::Branch { repo, from, branch } => platform.create_branch(repo, from, branch).await,
            Self::Commit { repo, commit } => platform.commit_files(repo, commit).await,
            Self::Pull { repo, pull } => platform.create_pull_request(repo, pull).await.map(|_| ()),
        }
    }
}

/// Complete plan for one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatePlan {
    /// Target repository
    pub repo: RepoId,
    /// Track the repository follows
    pub mode: Mode,
    /// Version to move to
    pub version: NodeVersion,
    /// Update branch
    pub branch: String,
    /// Calls to perform, strictly in order
    pub calls: Vec<PlannedCall>,
}

/// Commit message and PR title for a bump
pub fn update_title(version: &NodeVersion) -> String {
    format!("Update to node v{version}")
}

/// PR body for a bump, linking the release notes
pub fn update_body(version: &NodeVersion) -> String {
    format!(
        "This is an automated pull request to update the version of node.js. You can \
         find release notes for what changed in this release at \
         https://nodejs.org/en/blog/release/v{version}/\
         \n\n\
         If integration tests pass, this pull request can be safely merged."
    )
}

/// Build the branch → commit → pull sequence (PURE - no I/O)
pub fn build_update_plan(
    repo: &RepoId,
    base_branch: &str,
    mode: Mode,
    version: NodeVersion,
    branch: &str,
    updates: Vec<FileUpdate>,
) -> UpdatePlan {
    let title = update_title(&version);
    let calls = vec![
        PlannedCall::Branch {
            repo: repo.clone(),
            from: base_branch.to_string(),
            branch: branch.to_string(),
        },
        PlannedCall::Commit {
            repo: repo.clone(),
            commit: CommitRequest {
                branch: branch.to_string(),
                message: title.clone(),
                updates,
            },
        },
        PlannedCall::Pull {
            repo: repo.clone(),
            pull: PullRequestDraft {
                head: branch.to_string(),
                base: base_branch.to_string(),
                title,
                body: update_body(&version),
            },
        },
    ];

    UpdatePlan {
        repo: repo.clone(),
        mode,
        version,
        branch: branch.to_string(),
        calls,
    }
}
