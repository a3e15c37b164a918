//! Merge planning - pure functions deciding merge eligibility
//!
//! This module contains the pure, testable logic of the merge engine.
//! No I/O happens here - all data is passed in, making it easy to unit test.

use crate::error::{Error, Result};
use crate::merge::status::{all_checks_pass, failing_checks};
use crate::types::{CommitEntry, Issue, PullRequest, RepoSummary, SquashMerge, StatusCheck};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Which pull requests the engine may touch
#[derive(Debug, Clone)]
pub struct MergePolicy {
    /// Author logins whose PRs are auto-merged
    pub logins: Vec<String>,
    /// Minimum time since the last update
    pub min_age: Duration,
    /// Candidates processed at once
    pub concurrency: usize,
    /// Delete the head branch after a merge (same-repository PRs only)
    pub delete_branch: bool,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            logins: vec![
                "ForbesLindesay-Bot".to_string(),
                "greenkeeperio-bot".to_string(),
            ],
            min_age: Duration::hours(1),
            concurrency: 1,
            delete_branch: true,
        }
    }
}

/// Why a pull request was not merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The platform does not report the PR as mergeable
    NotMergeable {
        /// Reported flag (`None` while GitHub is still computing)
        mergeable: Option<bool>,
    },
    /// No status checks reported at all
    NoStatuses,
    /// At least one authoritative check is not successful
    ChecksNotPassing {
        /// Offending checks, as `context: state`
        checks: Vec<String>,
    },
    /// Only single-commit PRs are squash-merged
    CommitCount {
        /// Number of commits found
        count: usize,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotMergeable { mergeable: None } => write!(f, "mergeability unknown"),
            Self::NotMergeable { .. } => write!(f, "not mergeable"),
            Self::NoStatuses => write!(f, "no status checks"),
            Self::ChecksNotPassing { checks } => write!(f, "checks not passing: {}", checks.join(", ")),
            Self::CommitCount { count } => write!(f, "expected exactly one commit, found {count}"),
        }
    }
}

/// Decision for one pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeDecision {
    /// Squash-merge with these parameters
    Merge(SquashMerge),
    /// Leave the PR alone
    Skip(SkipReason),
}

/// Whether a listing entry is a merge candidate at time `now`
///
/// Candidates are pull requests by an allow-listed author that have not been
/// updated for at least `policy.min_age`, so checks still in flight are not
/// raced.
pub fn is_candidate(issue: &Issue, policy: &MergePolicy, now: DateTime<Utc>) -> bool {
    issue.is_pull_request()
        && policy.logins.iter().any(|login| *login == issue.user.login)
        && issue.updated_at < now - policy.min_age
}

/// Pre-check on the PR itself, before statuses are fetched
pub const fn check_mergeable(pr: &PullRequest) -> Option<SkipReason> {
    match pr.mergeable {
        Some(true) => None,
        mergeable => Some(SkipReason::NotMergeable { mergeable }),
    }
}

/// Pre-check on the statuses, before commits are fetched
pub fn check_statuses(statuses: &[StatusCheck]) -> Option<SkipReason> {
    if statuses.is_empty() {
        return Some(SkipReason::NoStatuses);
    }
    if all_checks_pass(statuses) {
        None
    } else {
        Some(SkipReason::ChecksNotPassing {
            checks: failing_checks(statuses),
        })
    }
}

/// Squash commit title and message for a single-commit PR
///
/// The title is the first paragraph of the commit message plus `(#<number>)`;
/// the message is the remaining paragraphs.
pub fn squash_commit_message(message: &str, number: u64) -> (String, String) {
    let mut paragraphs = message.split("\n\n");
    let first = paragraphs.next().unwrap_or_default();
    let rest: Vec<&str> = paragraphs.collect();
    (format!("{first} (#{number})"), rest.join("\n\n"))
}

/// Full eligibility decision (PURE - no I/O, easily testable)
///
/// Eligible iff mergeable, the authoritative status set is non-empty and all
/// successful, and the PR has exactly one commit.
pub fn evaluate_pull_request(
    pr: &PullRequest,
    statuses: &[StatusCheck],
    commits: &[CommitEntry],
) -> Result<MergeDecision> {
    if let Some(reason) = check_mergeable(pr).or_else(|| check_statuses(statuses)) {
        return Ok(MergeDecision::Skip(reason));
    }
    let [commit] = commits else {
        return Ok(MergeDecision::Skip(SkipReason::CommitCount {
            count: commits.len(),
        }));
    };

    let repo = pr
        .base
        .repo
        .as_ref()
        .map(RepoSummary::repo_id)
        .ok_or_else(|| Error::Assertion(format!("PR #{} has no base repository", pr.number)))?;
    let (commit_title, commit_message) = squash_commit_message(&commit.commit.message, pr.number);
    Ok(MergeDecision::Merge(SquashMerge {
        repo,
        number: pr.number,
        commit_title,
        commit_message,
        sha: pr.head.sha.clone(),
    }))
}
