//! Merge execution - effectful operations
//!
//! Walks the issue listing page by page and runs each candidate through
//! fetch → decide → merge via the platform API.

use crate::error::{Error, Result};
use crate::merge::plan::{
    MergeDecision, MergePolicy, SkipReason, check_mergeable, check_statuses, evaluate_pull_request,
    is_candidate,
};
use crate::platform::{IssuePages, PlatformService};
use crate::types::{Issue, IssueQuery};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use tracing::{info, warn};

/// What happened to one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MergeStatus {
    /// Squash-merged
    Merged {
        /// Merge commit SHA
        sha: Option<String>,
        /// Whether the head branch was deleted
        branch_deleted: bool,
    },
    /// Not eligible
    Skipped {
        /// Why
        reason: SkipReason,
    },
    /// The merge endpoint answered but did not merge
    Rejected {
        /// Message from the API
        message: Option<String>,
    },
}

/// Outcome for one candidate PR
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Web URL
    pub html_url: String,
    /// Result
    #[serde(flatten)]
    pub status: MergeStatus,
}

/// Result of one engine run
#[derive(Debug, Clone, Default, Serialize)]
pub struct AutoMergeReport {
    /// Listing pages walked
    pub pages: usize,
    /// Entries seen across all pages
    pub issues_seen: usize,
    /// One entry per candidate, in listing order
    pub outcomes: Vec<MergeOutcome>,
}

impl AutoMergeReport {
    /// Number of PRs merged
    #[must_use]
    pub fn merged_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, MergeStatus::Merged { .. }))
            .count()
    }
}

/// Run the merge engine once (EFFECTFUL)
///
/// Each page is fully processed before the next one is requested. Within a
/// page, candidates are processed `policy.concurrency` at a time, in
/// listing order. Any API error aborts the run.
pub async fn run_auto_merge(
    platform: &dyn PlatformService,
    query: &IssueQuery,
    policy: &MergePolicy,
    now: DateTime<Utc>,
) -> Result<AutoMergeReport> {
    let mut report = AutoMergeReport::default();
    let mut pages = IssuePages::new(platform, query.clone());

    while let Some(issues) = pages.next_page().await? {
        report.pages += 1;
        report.issues_seen += issues.len();

        let candidates: Vec<Issue> = issues
            .into_iter()
            .filter(|issue| is_candidate(issue, policy, now))
            .collect();
        info!(page = report.pages, candidates = candidates.len(), "processing issue page");

        let mut outcomes: Vec<MergeOutcome> = stream::iter(candidates)
            .map(|issue| async move { process_candidate(platform, &issue, policy).await })
            .buffered(policy.concurrency.max(1))
            .try_collect()
            .await?;
        report.outcomes.append(&mut outcomes);
    }

    info!(
        pages = report.pages,
        merged = report.merged_count(),
        candidates = report.outcomes.len(),
        "auto-merge run complete"
    );
    Ok(report)
}

/// Fetch, decide and (if eligible) merge one candidate
pub async fn process_candidate(
    platform: &dyn PlatformService,
    issue: &Issue,
    policy: &MergePolicy,
) -> Result<MergeOutcome> {
    let link = issue
        .pull_request
        .as_ref()
        .ok_or_else(|| Error::Assertion(format!("issue #{} is not a pull request", issue.number)))?;
    let pr = platform.get_pull_request(&link.url).await?;

    let outcome = |status: MergeStatus| MergeOutcome {
        number: pr.number,
        title: pr.title.clone(),
        html_url: pr.html_url.clone(),
        status,
    };

    if let Some(reason) = check_mergeable(&pr) {
        return Ok(outcome(skipped(&pr.html_url, reason)));
    }

    let statuses = platform.list_statuses(&pr.statuses_url).await?;
    if let Some(reason) = check_statuses(&statuses) {
        return Ok(outcome(skipped(&pr.html_url, reason)));
    }

    let commits = platform.list_commits(&pr.commits_url).await?;
    let merge = match evaluate_pull_request(&pr, &statuses, &commits)? {
        MergeDecision::Merge(merge) => merge,
        MergeDecision::Skip(reason) => return Ok(outcome(skipped(&pr.html_url, reason))),
    };

    info!(number = pr.number, title = %pr.title, url = %pr.html_url, "merging");
    let result = platform.merge_pull_request(&merge).await?;
    if !result.merged {
        warn!(number = pr.number, message = ?result.message, "merge was not performed");
        return Ok(outcome(MergeStatus::Rejected {
            message: result.message,
        }));
    }
    info!(number = pr.number, sha = ?result.sha, "merged");

    let mut branch_deleted = false;
    if policy.delete_branch
        && pr.is_same_repository()
        && let Some(head_repo) = &pr.head.repo
    {
        platform
            .delete_branch(&head_repo.repo_id(), &pr.head.ref_name)
            .await?;
        branch_deleted = true;
    }

    Ok(outcome(MergeStatus::Merged {
        sha: result.sha,
        branch_deleted,
    }))
}

fn skipped(url: &str, reason: SkipReason) -> MergeStatus {
    info!(%url, %reason, "not merging");
    MergeStatus::Skipped { reason }
}
