//! Core types for repo-bots
//!
//! These mirror the subset of GitHub REST payloads the bots read. They are
//! reconstructed from the API on every invocation and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repository coordinates (`owner/name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoId {
    /// Build repository coordinates
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A GitHub account reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account login
    pub login: String,
}

/// Link from an issue to the pull request resource it represents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePullRequestLink {
    /// API URL of the pull request
    pub url: String,
}

/// An entry from the issue listing (issues and pull requests alike)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue/PR number
    pub number: u64,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Author
    pub user: User,
    /// Present only when the issue is a pull request
    #[serde(default)]
    pub pull_request: Option<IssuePullRequestLink>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Web URL
    #[serde(default)]
    pub html_url: String,
}

impl Issue {
    /// Whether this listing entry is a pull request
    pub const fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// Minimal repository payload embedded in a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    /// Numeric repository id
    pub id: u64,
    /// Repository name
    pub name: String,
    /// Repository owner
    pub owner: User,
}

impl RepoSummary {
    /// Coordinates of this repository
    pub fn repo_id(&self) -> RepoId {
        RepoId::new(&self.owner.login, &self.name)
    }
}

/// Head or base side of a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestBranch {
    /// Branch name
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Commit SHA the branch points at
    pub sha: String,
    /// Repository (None when a fork was deleted)
    #[serde(default)]
    pub repo: Option<RepoSummary>,
}

/// A pull request as returned by the single-PR endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    #[serde(default)]
    pub title: String,
    /// Web URL
    #[serde(default)]
    pub html_url: String,
    /// Platform mergeability flag
    /// - `Some(true)` = mergeable
    /// - `Some(false)` = has conflicts
    /// - `None` = unknown (GitHub still computing)
    #[serde(default)]
    pub mergeable: Option<bool>,
    /// Source side
    pub head: PullRequestBranch,
    /// Target side
    pub base: PullRequestBranch,
    /// API URL listing the PR's commits
    pub commits_url: String,
    /// API URL listing the head commit's statuses
    pub statuses_url: String,
}

impl PullRequest {
    /// Whether head and base live in the same repository (not a fork)
    pub fn is_same_repository(&self) -> bool {
        match (&self.head.repo, &self.base.repo) {
            (Some(head), Some(base)) => head.id == base.id,
            _ => false,
        }
    }
}

/// State of a commit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    /// Check passed
    Success,
    /// Check failed
    Failure,
    /// Check still running
    Pending,
    /// Check errored
    Error,
    /// Any state this client does not know about
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
            Self::Pending => write!(f, "pending"),
            Self::Error => write!(f, "error"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// One commit status entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheck {
    /// Check name
    pub context: String,
    /// Reported state
    pub state: CheckState,
    /// When the status was created
    pub created_at: DateTime<Utc>,
}

/// Commit payload inside a commit-list entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetail {
    /// Full commit message
    pub message: String,
}

/// An entry from a PR's commit list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitEntry {
    /// Commit SHA
    pub sha: String,
    /// Commit data
    pub commit: CommitDetail,
}

/// Parameters of a squash merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SquashMerge {
    /// Repository holding the PR (base side)
    pub repo: RepoId,
    /// PR number
    pub number: u64,
    /// Title of the squashed commit
    pub commit_title: String,
    /// Body of the squashed commit
    pub commit_message: String,
    /// Head SHA the merge must apply to
    pub sha: String,
}

/// Result of a merge operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeResult {
    /// Whether the merge was successful
    #[serde(default)]
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    #[serde(default)]
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    #[serde(default)]
    pub message: Option<String>,
}

/// A branch as returned by the branch endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name
    pub name: String,
}

/// Raw repository content entry
///
/// `content` is only trustworthy once `kind` has been checked to be `file`;
/// directories, symlinks and submodules come back with other shapes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Entry type (`file`, `dir`, `symlink`, `submodule`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Encoded content
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    /// Encoding of `content` (normally `base64`)
    #[serde(default)]
    pub encoding: Option<String>,
}

/// A file to write as part of a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUpdate {
    /// Repository-relative path
    pub path: String,
    /// New file content
    pub content: String,
}

/// A multi-file commit onto an existing branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRequest {
    /// Branch to commit onto
    pub branch: String,
    /// Commit message
    pub message: String,
    /// Files to write
    pub updates: Vec<FileUpdate>,
}

/// A pull request to open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDraft {
    /// Head branch
    pub head: String,
    /// Base branch
    pub base: String,
    /// Title
    pub title: String,
    /// Body
    pub body: String,
}

/// A freshly opened pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPullRequest {
    /// PR number
    pub number: u64,
    /// Web URL
    pub html_url: String,
}

/// Filters for the issue listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueQuery {
    /// `filter` parameter (`assigned`, `created`, `all`, ...)
    pub filter: String,
    /// `state` parameter (`open`, `closed`, `all`)
    pub state: String,
}

impl Default for IssueQuery {
    fn default() -> Self {
        Self {
            filter: "all".to_string(),
            state: "open".to_string(),
        }
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Cursor (URL) of the next page
    pub next: Option<String>,
}
