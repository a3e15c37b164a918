//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::platform::rest::{RestClient, RestClientOptions};
use crate::types::{
    Branch, CommitEntry, CommitRequest, ContentEntry, CreatedPullRequest, Issue, IssueQuery,
    MergeResult, Page, PullRequest, PullRequestDraft, RepoId, SquashMerge, StatusCheck,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

// Git data API payloads used by branch creation and multi-file commits

#[derive(Deserialize)]
struct GitRef {
    object: GitObject,
}

#[derive(Deserialize)]
struct GitObject {
    sha: String,
}

#[derive(Deserialize)]
struct GitCommit {
    sha: String,
    tree: GitObject,
}

#[derive(Deserialize)]
struct GitTree {
    sha: String,
}

/// GitHub service using raw REST calls plus octocrab for typed endpoints
pub struct GitHubService {
    client: Octocrab,
    /// REST client with the default media type
    rest: RestClient,
    /// REST client negotiating the merge preview media type
    preview: RestClient,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(options: &RestClientOptions, preview_accept: &str) -> Result<Self> {
        let api_url = Url::parse(&options.base_url)
            .map_err(|e| Error::Config(format!("invalid API URL {}: {e}", options.base_url)))?;

        let mut builder = Octocrab::builder()
            .set_connect_timeout(Some(options.connect_timeout))
            .set_read_timeout(Some(options.request_timeout))
            .set_write_timeout(Some(options.request_timeout))
            .personal_token(options.token.clone());
        if api_url.host_str() != Some("api.github.com") {
            builder = builder
                .base_uri(api_url.as_str())
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }
        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let rest = RestClient::new(options)?;
        let preview = rest.with_accept(preview_accept);

        Ok(Self {
            client,
            rest,
            preview,
        })
    }

    /// The underlying REST client
    pub const fn rest(&self) -> &RestClient {
        &self.rest
    }

    async fn branch_head(&self, repo: &RepoId, branch: &str) -> Result<String> {
        let git_ref: GitRef = self
            .rest
            .get(
                "/repos/:owner/:repo/git/ref/:ref",
                &json!({ "owner": repo.owner, "repo": repo.name, "ref": format!("heads/{branch}") }),
            )
            .await?;
        Ok(git_ref.object.sha)
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_issues(&self, query: &IssueQuery, cursor: Option<&str>) -> Result<Page<Issue>> {
        debug!(?cursor, "listing issues");
        let page: Page<Issue> = match cursor {
            Some(url) => self.rest.get_page(url, &serde_json::Value::Null).await?,
            None => {
                self.rest
                    .get_page(
                        "/issues",
                        &json!({ "filter": query.filter, "state": query.state }),
                    )
                    .await?
            }
        };
        debug!(count = page.items.len(), has_next = page.next.is_some(), "listed issues");
        Ok(page)
    }

    async fn get_pull_request(&self, url: &str) -> Result<PullRequest> {
        debug!(url, "getting pull request");
        self.rest.get(url, &serde_json::Value::Null).await
    }

    async fn list_commits(&self, url: &str) -> Result<Vec<CommitEntry>> {
        debug!(url, "listing commits");
        self.rest.get_all(url, &json!({ "per_page": 100 })).await
    }

    async fn list_statuses(&self, url: &str) -> Result<Vec<StatusCheck>> {
        debug!(url, "listing statuses");
        self.rest.get_all(url, &json!({ "per_page": 100 })).await
    }

    async fn merge_pull_request(&self, merge: &SquashMerge) -> Result<MergeResult> {
        debug!(repo = %merge.repo, number = merge.number, "squash merging PR");
        let result: MergeResult = self
            .preview
            .put(
                "/repos/:owner/:repo/pulls/:number/merge",
                &json!({
                    "owner": merge.repo.owner,
                    "repo": merge.repo.name,
                    "number": merge.number,
                    "commit_title": merge.commit_title,
                    "commit_message": merge.commit_message,
                    "sha": merge.sha,
                    "merge_method": "squash",
                    "squash": true,
                }),
            )
            .await?;
        debug!(number = merge.number, merged = result.merged, sha = ?result.sha, "merge complete");
        Ok(result)
    }

    async fn delete_branch(&self, repo: &RepoId, branch: &str) -> Result<()> {
        debug!(%repo, branch, "deleting branch");
        self.rest
            .delete(
                "/repos/:owner/:repo/git/refs/:ref",
                &json!({ "owner": repo.owner, "repo": repo.name, "ref": format!("heads/{branch}") }),
            )
            .await
    }

    async fn get_branch(&self, repo: &RepoId, branch: &str) -> Result<Branch> {
        debug!(%repo, branch, "getting branch");
        self.rest
            .get(
                "/repos/:owner/:repo/branches/:branch",
                &json!({ "owner": repo.owner, "repo": repo.name, "branch": branch }),
            )
            .await
    }

    async fn get_content(&self, repo: &RepoId, path: &str) -> Result<ContentEntry> {
        debug!(%repo, path, "getting content");
        self.rest
            .get(
                "/repos/:owner/:repo/contents/:path",
                &json!({ "owner": repo.owner, "repo": repo.name, "path": path }),
            )
            .await
    }

    async fn default_branch(&self, repo: &RepoId) -> Result<String> {
        debug!(%repo, "getting default branch");
        let repository = self.client.repos(&repo.owner, &repo.name).get().await?;
        repository
            .default_branch
            .ok_or_else(|| Error::Assertion(format!("{repo} has no default branch")))
    }

    async fn create_branch(&self, repo: &RepoId, from: &str, branch: &str) -> Result<()> {
        debug!(%repo, from, branch, "creating branch");
        let sha = self.branch_head(repo, from).await?;
        let _: serde_json::Value = self
            .rest
            .post(
                "/repos/:owner/:repo/git/refs",
                &json!({
                    "owner": repo.owner,
                    "repo": repo.name,
                    "ref": format!("refs/heads/{branch}"),
                    "sha": sha,
                }),
            )
            .await?;
        debug!(%repo, branch, "created branch");
        Ok(())
    }

    async fn commit_files(&self, repo: &RepoId, commit: &CommitRequest) -> Result<()> {
        debug!(%repo, branch = %commit.branch, files = commit.updates.len(), "committing files");
        let parent = self.branch_head(repo, &commit.branch).await?;
        let parent_commit: GitCommit = self
            .rest
            .get(
                "/repos/:owner/:repo/git/commits/:sha",
                &json!({ "owner": repo.owner, "repo": repo.name, "sha": parent }),
            )
            .await?;

        let entries: Vec<serde_json::Value> = commit
            .updates
            .iter()
            .map(|update| {
                json!({
                    "path": update.path,
                    "mode": "100644",
                    "type": "blob",
                    "content": update.content,
                })
            })
            .collect();
        let tree: GitTree = self
            .rest
            .post(
                "/repos/:owner/:repo/git/trees",
                &json!({
                    "owner": repo.owner,
                    "repo": repo.name,
                    "base_tree": parent_commit.tree.sha,
                    "tree": entries,
                }),
            )
            .await?;

        let new_commit: GitCommit = self
            .rest
            .post(
                "/repos/:owner/:repo/git/commits",
                &json!({
                    "owner": repo.owner,
                    "repo": repo.name,
                    "message": commit.message,
                    "tree": tree.sha,
                    "parents": [parent_commit.sha],
                }),
            )
            .await?;

        let _: serde_json::Value = self
            .rest
            .patch(
                "/repos/:owner/:repo/git/refs/:ref",
                &json!({
                    "owner": repo.owner,
                    "repo": repo.name,
                    "ref": format!("heads/{}", commit.branch),
                    "sha": new_commit.sha,
                }),
            )
            .await?;
        debug!(%repo, sha = %new_commit.sha, "committed files");
        Ok(())
    }

    async fn create_pull_request(
        &self,
        repo: &RepoId,
        draft: &PullRequestDraft,
    ) -> Result<CreatedPullRequest> {
        debug!(%repo, head = %draft.head, base = %draft.base, "creating PR");
        let pr = self
            .client
            .pulls(&repo.owner, &repo.name)
            .create(&draft.title, &draft.head, &draft.base)
            .body(&draft.body)
            .send()
            .await?;

        let created = CreatedPullRequest {
            number: pr.number,
            html_url: pr
                .html_url
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        };
        debug!(pr_number = created.number, "created PR");
        Ok(created)
    }
}
