//! Platform services for GitHub
//!
//! Provides the narrow set of read/write operations the bots need.

mod github;
mod paginate;
pub mod rest;

pub use github::GitHubService;
pub use paginate::IssuePages;
pub use rest::{RestClient, RestClientOptions};

use crate::error::Result;
use crate::types::{
    Branch, CommitEntry, CommitRequest, ContentEntry, CreatedPullRequest, Issue, IssueQuery,
    MergeResult, Page, PullRequest, PullRequestDraft, RepoId, SquashMerge, StatusCheck,
};
use async_trait::async_trait;

/// Platform service trait for the bots' API operations
///
/// This trait abstracts the hosted source-control API so the merge engine
/// and update workflow can be driven by the real GitHub client or by a test
/// double.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// List one page of issues visible to the token
    ///
    /// `cursor` is the next-page URL returned with the previous page, or
    /// `None` for the first page.
    async fn list_issues(&self, query: &IssueQuery, cursor: Option<&str>) -> Result<Page<Issue>>;

    /// Fetch a pull request by its API URL
    async fn get_pull_request(&self, url: &str) -> Result<PullRequest>;

    /// List the commits of a pull request (`commits_url`)
    async fn list_commits(&self, url: &str) -> Result<Vec<CommitEntry>>;

    /// List the statuses of a pull request's head (`statuses_url`)
    async fn list_statuses(&self, url: &str) -> Result<Vec<StatusCheck>>;

    /// Squash-merge a pull request
    async fn merge_pull_request(&self, merge: &SquashMerge) -> Result<MergeResult>;

    /// Delete a branch
    async fn delete_branch(&self, repo: &RepoId, branch: &str) -> Result<()>;

    /// Fetch a branch; `Error::NotFound` when it does not exist
    async fn get_branch(&self, repo: &RepoId, branch: &str) -> Result<Branch>;

    /// Fetch a raw content entry; `Error::NotFound` when the path is absent
    async fn get_content(&self, repo: &RepoId, path: &str) -> Result<ContentEntry>;

    /// Name of the repository's default branch
    async fn default_branch(&self, repo: &RepoId) -> Result<String>;

    /// Create `branch` pointing at the head of `from`
    async fn create_branch(&self, repo: &RepoId, from: &str, branch: &str) -> Result<()>;

    /// Commit a set of file updates onto an existing branch
    async fn commit_files(&self, repo: &RepoId, commit: &CommitRequest) -> Result<()>;

    /// Open a pull request
    async fn create_pull_request(
        &self,
        repo: &RepoId,
        draft: &PullRequestDraft,
    ) -> Result<CreatedPullRequest>;
}
