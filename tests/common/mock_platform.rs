//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use repo_bots::error::{Error, Result};
use repo_bots::platform::PlatformService;
use repo_bots::types::{
    Branch, CommitEntry, CommitRequest, ContentEntry, CreatedPullRequest, Issue, IssueQuery,
    MergeResult, Page, PullRequest, PullRequestDraft, RepoId, SquashMerge, StatusCheck,
};
use repo_bots::update::PlannedCall;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `delete_branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteBranchCall {
    pub repo: RepoId,
    pub branch: String,
}

/// Simple mock platform service for testing
///
/// This manually implements `PlatformService` rather than using mockall,
/// because the trait is object-safe and async and hand-written state is
/// easier to assert on.
///
/// Features:
/// - Configurable responses per URL, repository, path and branch
/// - Unconfigured lookups answer 404 (`Error::NotFound`)
/// - Call tracking for verification, mutating calls kept in order
/// - Error injection for failure path testing
pub struct MockPlatformService {
    next_pr_number: AtomicU64,
    // Responses
    issue_pages: Mutex<HashMap<Option<String>, Page<Issue>>>,
    pull_requests: Mutex<HashMap<String, PullRequest>>,
    commits: Mutex<HashMap<String, Vec<CommitEntry>>>,
    statuses: Mutex<HashMap<String, Vec<StatusCheck>>>,
    merge_responses: Mutex<HashMap<u64, MergeResult>>,
    branches: Mutex<HashSet<(String, String)>>,
    contents: Mutex<HashMap<(String, String), ContentEntry>>,
    default_branches: Mutex<HashMap<String, String>>,
    // Call tracking
    list_issues_calls: Mutex<Vec<Option<String>>>,
    get_pr_calls: Mutex<Vec<String>>,
    list_statuses_calls: Mutex<Vec<String>>,
    list_commits_calls: Mutex<Vec<String>>,
    merge_calls: Mutex<Vec<SquashMerge>>,
    delete_branch_calls: Mutex<Vec<DeleteBranchCall>>,
    get_content_calls: Mutex<Vec<(String, String)>>,
    mutating_calls: Mutex<Vec<PlannedCall>>,
    // Error injection
    error_on_merge: Mutex<Option<String>>,
    error_on_get_content: Mutex<HashMap<String, String>>,
    error_on_create_branch: Mutex<Option<String>>,
    error_on_get_branch: Mutex<Option<u16>>,
    branch_lookup_names: Mutex<HashMap<(String, String), String>>,
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatformService {
    /// Create an empty mock
    pub fn new() -> Self {
        Self {
            next_pr_number: AtomicU64::new(1),
            issue_pages: Mutex::new(HashMap::new()),
            pull_requests: Mutex::new(HashMap::new()),
            commits: Mutex::new(HashMap::new()),
            statuses: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            branches: Mutex::new(HashSet::new()),
            contents: Mutex::new(HashMap::new()),
            default_branches: Mutex::new(HashMap::new()),
            list_issues_calls: Mutex::new(Vec::new()),
            get_pr_calls: Mutex::new(Vec::new()),
            list_statuses_calls: Mutex::new(Vec::new()),
            list_commits_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            delete_branch_calls: Mutex::new(Vec::new()),
            get_content_calls: Mutex::new(Vec::new()),
            mutating_calls: Mutex::new(Vec::new()),
            error_on_merge: Mutex::new(None),
            error_on_get_content: Mutex::new(HashMap::new()),
            error_on_create_branch: Mutex::new(None),
            error_on_get_branch: Mutex::new(None),
            branch_lookup_names: Mutex::new(HashMap::new()),
        }
    }

    // === Error injection methods ===

    /// Make `merge_pull_request` return an error
    pub fn fail_merge(&self, msg: &str) {
        *self.error_on_merge.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `get_content` return a server error for every path of `repo`
    pub fn fail_get_content(&self, repo: &RepoId, msg: &str) {
        self.error_on_get_content
            .lock()
            .unwrap()
            .insert(repo.to_string(), msg.to_string());
    }

    /// Make `create_branch` return an error
    pub fn fail_create_branch(&self, msg: &str) {
        *self.error_on_create_branch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `get_branch` fail with `status`
    pub fn fail_get_branch(&self, status: u16) {
        *self.error_on_get_branch.lock().unwrap() = Some(status);
    }

    // === Response setup ===

    /// Make the lookup of `branch` answer with a branch called `returned`
    pub fn set_branch_lookup(&self, repo: &RepoId, branch: &str, returned: &str) {
        self.branch_lookup_names.lock().unwrap().insert(
            (repo.to_string(), branch.to_string()),
            returned.to_string(),
        );
    }

    /// Set the issue page returned for `cursor` (`None` = first page)
    pub fn set_issue_page(&self, cursor: Option<&str>, items: Vec<Issue>, next: Option<&str>) {
        self.issue_pages.lock().unwrap().insert(
            cursor.map(ToString::to_string),
            Page {
                items,
                next: next.map(ToString::to_string),
            },
        );
    }

    /// Register a pull request under its API URL
    pub fn set_pull_request(&self, url: &str, pr: PullRequest) {
        self.pull_requests
            .lock()
            .unwrap()
            .insert(url.to_string(), pr);
    }

    /// Set the statuses returned for a `statuses_url`
    pub fn set_statuses(&self, url: &str, statuses: Vec<StatusCheck>) {
        self.statuses.lock().unwrap().insert(url.to_string(), statuses);
    }

    /// Set the commits returned for a `commits_url`
    pub fn set_commits(&self, url: &str, commits: Vec<CommitEntry>) {
        self.commits.lock().unwrap().insert(url.to_string(), commits);
    }

    /// Set the response for `merge_pull_request` for a specific PR
    pub fn set_merge_response(&self, number: u64, result: MergeResult) {
        self.merge_responses.lock().unwrap().insert(number, result);
    }

    /// Make `get_branch` find `branch` in `repo`
    pub fn add_branch(&self, repo: &RepoId, branch: &str) {
        self.branches
            .lock()
            .unwrap()
            .insert((repo.to_string(), branch.to_string()));
    }

    /// Set the raw content entry for a path
    pub fn set_content_entry(&self, repo: &RepoId, path: &str, entry: ContentEntry) {
        self.contents
            .lock()
            .unwrap()
            .insert((repo.to_string(), path.to_string()), entry);
    }

    /// Set a regular file's text (stored base64-encoded, as GitHub does)
    pub fn set_file(&self, repo: &RepoId, path: &str, text: &str) {
        self.set_content_entry(repo, path, super::file_entry(text));
    }

    /// Set the repository's default branch (`main` otherwise)
    pub fn set_default_branch(&self, repo: &RepoId, branch: &str) {
        self.default_branches
            .lock()
            .unwrap()
            .insert(repo.to_string(), branch.to_string());
    }

    // === Call verification methods ===

    /// Cursors `list_issues` was called with, in order
    pub fn get_list_issues_calls(&self) -> Vec<Option<String>> {
        self.list_issues_calls.lock().unwrap().clone()
    }

    /// URLs `get_pull_request` was called with
    pub fn get_pr_calls(&self) -> Vec<String> {
        self.get_pr_calls.lock().unwrap().clone()
    }

    /// URLs `list_statuses` was called with
    pub fn get_list_statuses_calls(&self) -> Vec<String> {
        self.list_statuses_calls.lock().unwrap().clone()
    }

    /// URLs `list_commits` was called with
    pub fn get_list_commits_calls(&self) -> Vec<String> {
        self.list_commits_calls.lock().unwrap().clone()
    }

    /// All `merge_pull_request` calls
    pub fn get_merge_calls(&self) -> Vec<SquashMerge> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// All `delete_branch` calls
    pub fn get_delete_branch_calls(&self) -> Vec<DeleteBranchCall> {
        self.delete_branch_calls.lock().unwrap().clone()
    }

    /// `(repo, path)` pairs `get_content` was called with
    pub fn get_content_calls(&self) -> Vec<(String, String)> {
        self.get_content_calls.lock().unwrap().clone()
    }

    /// Branch/commit/pull calls actually performed, in order
    pub fn get_mutating_calls(&self) -> Vec<PlannedCall> {
        self.mutating_calls.lock().unwrap().clone()
    }

    /// Mutating calls performed against one repository, in order
    pub fn get_mutating_calls_for(&self, repo: &RepoId) -> Vec<PlannedCall> {
        self.get_mutating_calls()
            .into_iter()
            .filter(|call| match call {
                PlannedCall::Branch { repo: r, .. }
                | PlannedCall::Commit { repo: r, .. }
                | PlannedCall::Pull { repo: r, .. } => r == repo,
            })
            .collect()
    }

    /// Assert that `merge_pull_request` was called for a specific PR
    pub fn assert_merge_called(&self, number: u64) {
        let calls = self.get_merge_calls();
        assert!(
            calls.iter().any(|c| c.number == number),
            "Expected merge({number}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pull_request` was NOT called for a specific PR
    pub fn assert_merge_not_called(&self, number: u64) {
        let calls = self.get_merge_calls();
        assert!(
            !calls.iter().any(|c| c.number == number),
            "Expected merge({number}) NOT to be called but it was: {calls:?}"
        );
    }

    /// Get count of merge calls
    pub fn merge_call_count(&self) -> usize {
        self.merge_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_issues(&self, _query: &IssueQuery, cursor: Option<&str>) -> Result<Page<Issue>> {
        let cursor = cursor.map(ToString::to_string);
        self.list_issues_calls.lock().unwrap().push(cursor.clone());

        let pages = self.issue_pages.lock().unwrap();
        Ok(pages.get(&cursor).cloned().unwrap_or(Page {
            items: Vec::new(),
            next: None,
        }))
    }

    async fn get_pull_request(&self, url: &str) -> Result<PullRequest> {
        self.get_pr_calls.lock().unwrap().push(url.to_string());

        let responses = self.pull_requests.lock().unwrap();
        responses
            .get(url)
            .cloned()
            .ok_or_else(|| Error::NotFound(url.to_string()))
    }

    async fn list_commits(&self, url: &str) -> Result<Vec<CommitEntry>> {
        self.list_commits_calls.lock().unwrap().push(url.to_string());
        let responses = self.commits.lock().unwrap();
        Ok(responses.get(url).cloned().unwrap_or_default())
    }

    async fn list_statuses(&self, url: &str) -> Result<Vec<StatusCheck>> {
        self.list_statuses_calls.lock().unwrap().push(url.to_string());
        let responses = self.statuses.lock().unwrap();
        Ok(responses.get(url).cloned().unwrap_or_default())
    }

    async fn merge_pull_request(&self, merge: &SquashMerge) -> Result<MergeResult> {
        self.merge_calls.lock().unwrap().push(merge.clone());

        // Check for injected error
        if let Some(msg) = self.error_on_merge.lock().unwrap().as_ref() {
            return Err(Error::Api {
                status: 500,
                message: msg.clone(),
            });
        }

        let responses = self.merge_responses.lock().unwrap();
        Ok(responses.get(&merge.number).cloned().unwrap_or(MergeResult {
            merged: true,
            sha: Some(format!("merged_sha_{}", merge.number)),
            message: Some("Pull Request successfully merged".to_string()),
        }))
    }

    async fn delete_branch(&self, repo: &RepoId, branch: &str) -> Result<()> {
        self.delete_branch_calls
            .lock()
            .unwrap()
            .push(DeleteBranchCall {
                repo: repo.clone(),
                branch: branch.to_string(),
            });
        Ok(())
    }

    async fn get_branch(&self, repo: &RepoId, branch: &str) -> Result<Branch> {
        // Check for injected error
        if let Some(status) = *self.error_on_get_branch.lock().unwrap() {
            return Err(Error::Api {
                status,
                message: format!("{repo} branch {branch} unavailable"),
            });
        }

        let key = (repo.to_string(), branch.to_string());
        if let Some(name) = self.branch_lookup_names.lock().unwrap().get(&key) {
            return Ok(Branch { name: name.clone() });
        }
        let branches = self.branches.lock().unwrap();
        if branches.contains(&key) {
            Ok(Branch {
                name: branch.to_string(),
            })
        } else {
            Err(Error::NotFound(format!("{repo} branch {branch}")))
        }
    }

    async fn get_content(&self, repo: &RepoId, path: &str) -> Result<ContentEntry> {
        self.get_content_calls
            .lock()
            .unwrap()
            .push((repo.to_string(), path.to_string()));

        // Check for injected error
        if let Some(msg) = self.error_on_get_content.lock().unwrap().get(&repo.to_string()) {
            return Err(Error::Api {
                status: 500,
                message: msg.clone(),
            });
        }

        let contents = self.contents.lock().unwrap();
        contents
            .get(&(repo.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{repo}/{path}")))
    }

    async fn default_branch(&self, repo: &RepoId) -> Result<String> {
        let branches = self.default_branches.lock().unwrap();
        Ok(branches
            .get(&repo.to_string())
            .cloned()
            .unwrap_or_else(|| "main".to_string()))
    }

    async fn create_branch(&self, repo: &RepoId, from: &str, branch: &str) -> Result<()> {
        // Check for injected error
        if let Some(msg) = self.error_on_create_branch.lock().unwrap().as_ref() {
            return Err(Error::Api {
                status: 422,
                message: msg.clone(),
            });
        }

        self.mutating_calls.lock().unwrap().push(PlannedCall::Branch {
            repo: repo.clone(),
            from: from.to_string(),
            branch: branch.to_string(),
        });
        self.add_branch(repo, branch);
        Ok(())
    }

    async fn commit_files(&self, repo: &RepoId, commit: &CommitRequest) -> Result<()> {
        self.mutating_calls.lock().unwrap().push(PlannedCall::Commit {
            repo: repo.clone(),
            commit: commit.clone(),
        });
        Ok(())
    }

    async fn create_pull_request(
        &self,
        repo: &RepoId,
        draft: &PullRequestDraft,
    ) -> Result<CreatedPullRequest> {
        self.mutating_calls.lock().unwrap().push(PlannedCall::Pull {
            repo: repo.clone(),
            pull: draft.clone(),
        });

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(CreatedPullRequest {
            number,
            html_url: format!("https://github.com/{repo}/pull/{number}"),
        })
    }
}
