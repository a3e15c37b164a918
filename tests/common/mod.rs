//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{DeleteBranchCall, MockPlatformService};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, TimeZone, Utc};
use repo_bots::error::Result;
use repo_bots::release::{CiTag, ReleaseEntry, VersionFeed};
use repo_bots::types::{
    CheckState, CommitDetail, CommitEntry, ContentEntry, Issue, IssuePullRequestLink, PullRequest,
    PullRequestBranch, RepoSummary, StatusCheck, User,
};

/// Fixed "now" used by the merge engine tests
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// `now()` minus `minutes`
pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    now() - Duration::minutes(minutes)
}

/// API URL of a pull request in `owner/repo`
pub fn pr_url(number: u64) -> String {
    format!("https://api.github.com/repos/acme/widgets/pulls/{number}")
}

/// Listing entry for a pull request
pub fn make_issue(number: u64, login: &str, updated_at: DateTime<Utc>) -> Issue {
    Issue {
        number,
        title: format!("Bump dependency #{number}"),
        user: User {
            login: login.to_string(),
        },
        pull_request: Some(IssuePullRequestLink { url: pr_url(number) }),
        updated_at,
        html_url: format!("https://github.com/acme/widgets/pull/{number}"),
    }
}

/// Listing entry for a plain issue
pub fn make_plain_issue(number: u64, login: &str, updated_at: DateTime<Utc>) -> Issue {
    Issue {
        pull_request: None,
        ..make_issue(number, login, updated_at)
    }
}

/// Repository payload with the given numeric id
pub fn repo_summary(id: u64, owner: &str, name: &str) -> RepoSummary {
    RepoSummary {
        id,
        name: name.to_string(),
        owner: User {
            login: owner.to_string(),
        },
    }
}

/// A mergeable same-repository PR in `acme/widgets` (repo id 1)
pub fn make_pr(number: u64) -> PullRequest {
    let repo = repo_summary(1, "acme", "widgets");
    PullRequest {
        number,
        title: format!("Bump dependency #{number}"),
        html_url: format!("https://github.com/acme/widgets/pull/{number}"),
        mergeable: Some(true),
        head: PullRequestBranch {
            ref_name: format!("greenkeeper/dep-{number}"),
            sha: format!("head_sha_{number}"),
            repo: Some(repo.clone()),
        },
        base: PullRequestBranch {
            ref_name: "master".to_string(),
            sha: "base_sha".to_string(),
            repo: Some(repo),
        },
        commits_url: format!("{}/commits", pr_url(number)),
        statuses_url: format!(
            "https://api.github.com/repos/acme/widgets/statuses/head_sha_{number}"
        ),
    }
}

/// Same as [`make_pr`] but opened from a fork (repo id 2)
pub fn make_fork_pr(number: u64) -> PullRequest {
    let mut pr = make_pr(number);
    pr.head.repo = Some(repo_summary(2, "contributor", "widgets"));
    pr
}

/// A status entry created `minutes` before `now()`
pub fn status(context: &str, state: CheckState, minutes: i64) -> StatusCheck {
    StatusCheck {
        context: context.to_string(),
        state,
        created_at: minutes_ago(minutes),
    }
}

/// A commit-list entry
pub fn commit(sha: &str, message: &str) -> CommitEntry {
    CommitEntry {
        sha: sha.to_string(),
        commit: CommitDetail {
            message: message.to_string(),
        },
    }
}

/// Raw content entry for a regular file, base64-encoded with line breaks
pub fn file_entry(text: &str) -> ContentEntry {
    let encoded = STANDARD.encode(text);
    let wrapped: Vec<String> = encoded
        .as_bytes()
        .chunks(60)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect();
    ContentEntry {
        kind: "file".to_string(),
        content: Some(serde_json::Value::String(wrapped.join("\n"))),
        encoding: Some("base64".to_string()),
    }
}

/// Release-index entry; `lts` is a codename or `false`
pub fn release(version: &str, lts: Option<&str>) -> ReleaseEntry {
    ReleaseEntry {
        version: version.to_string(),
        lts: lts.map_or(serde_json::Value::Bool(false), |name| {
            serde_json::Value::String(name.to_string())
        }),
    }
}

/// CI image tag
pub fn ci_tag(name: &str) -> CiTag {
    CiTag {
        name: name.to_string(),
    }
}

/// `package.json` pinning `version`
pub fn package_json(version: &str) -> String {
    format!(
        "{{\n  \"name\": \"widgets\",\n  \"engines\": {{\n    \"node\": \"{version}\"\n  }}\n}}\n"
    )
}

/// [`VersionFeed`] returning fixed data
#[derive(Debug, Clone, Default)]
pub struct StaticVersionFeed {
    pub releases: Vec<ReleaseEntry>,
    pub ci_tags: Vec<CiTag>,
}

impl StaticVersionFeed {
    /// The feed used across tests: stable 16.0.0, LTS 14.17.0, CI images
    /// published up to 15.14.0 (stable) and 14.16.1 (LTS)
    pub fn standard() -> Self {
        Self {
            releases: vec![
                release("v16.0.0", None),
                release("v15.14.0", None),
                release("v14.17.0", Some("Fermium")),
                release("v14.16.1", Some("Fermium")),
                release("v14.2.0", None),
            ],
            ci_tags: vec![ci_tag("15.14.0"), ci_tag("14.16.1"), ci_tag("14.2.0")],
        }
    }
}

#[async_trait]
impl VersionFeed for StaticVersionFeed {
    async fn releases(&self) -> Result<Vec<ReleaseEntry>> {
        Ok(self.releases.clone())
    }

    async fn ci_tags(&self) -> Result<Vec<CiTag>> {
        Ok(self.ci_tags.clone())
    }
}
