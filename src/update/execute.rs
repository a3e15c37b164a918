//! Update execution - effectful operations
//!
//! Drives one repository from the update check to an opened pull request,
//! and fans the workflow out over a list of repositories.

use crate::error::Result;
use crate::patch::{ManifestKind, RepoFiles, generate_patch};
use crate::platform::PlatformService;
use crate::release::ResolvedVersions;
use crate::update::check::{UpdateCheck, get_content, needs_update, try_get_content};
use crate::update::plan::{PlannedCall, UpdatePlan, UpdateState, build_update_plan};
use crate::update::UpdateTarget;
use futures::future::try_join_all;
use tracing::{info, info_span, Instrument};

/// Options for an update run
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Return the plan without performing any mutating call
    pub dry_run: bool,
    /// Update branch prefix (`<prefix>-<version>`)
    pub branch_prefix: String,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            branch_prefix: "node".to_string(),
        }
    }
}

/// Execute a plan's calls strictly in order (EFFECTFUL)
///
/// Stops at the first failure. Calls that already succeeded are not undone,
/// so a failure can leave a branch without a commit or a commit without a PR.
pub async fn execute_plan(plan: &UpdatePlan, platform: &dyn PlatformService) -> Result<()> {
    for call in &plan.calls {
        call.apply(platform).await?;
        info!(repo = %plan.repo, state = %call.reaches(), "update step complete");
    }
    Ok(())
}

/// Fetch the version-pinning files of a repository
pub async fn fetch_repo_files(platform: &dyn PlatformService, target: &UpdateTarget) -> Result<RepoFiles> {
    let repo = target.repo_id();
    let (package_json, travis, circle, circleci) = futures::try_join!(
        get_content(platform, &repo, ManifestKind::PackageJson.path()),
        try_get_content(platform, &repo, ManifestKind::TravisYml.path()),
        try_get_content(platform, &repo, ManifestKind::CircleYml.path()),
        try_get_content(platform, &repo, ManifestKind::CircleCiConfig.path()),
    )?;
    Ok(RepoFiles {
        package_json,
        travis,
        circle,
        circleci,
    })
}

/// Plan (and unless dry-running, perform) the bump for one repository
///
/// Returns the planned calls; an empty list means nothing was needed.
pub async fn update_repository(
    platform: &dyn PlatformService,
    target: &UpdateTarget,
    versions: &ResolvedVersions,
    options: &UpdateOptions,
) -> Result<Vec<PlannedCall>> {
    let repo = target.repo_id();
    info!(state = %UpdateState::Checking, "checking repository");

    let (mode, version, branch) =
        match needs_update(platform, &repo, versions, &options.branch_prefix).await? {
            UpdateCheck::Needed {
                pinned,
                mode,
                version,
                branch,
            } => {
                info!(state = %UpdateState::Needed, %pinned, %mode, %version, "update needed");
                (mode, version, branch)
            }
            check => {
                info!(state = %UpdateState::NotNeeded, ?check, "no update needed");
                return Ok(Vec::new());
            }
        };

    info!("Updating {repo}");
    let files = fetch_repo_files(platform, target).await?;
    let updates = generate_patch(&files, &version)?;
    info!(state = %UpdateState::Patched, files = updates.len(), "generated patch");

    let base_branch = match &target.base_branch {
        Some(base) => base.clone(),
        None => platform.default_branch(&repo).await?,
    };
    let plan = build_update_plan(&repo, &base_branch, mode, version, &branch, updates);

    if options.dry_run {
        info!(calls = plan.calls.len(), "dry run, not executing plan");
        return Ok(plan.calls);
    }

    execute_plan(&plan, platform).await?;
    Ok(plan.calls)
}

/// Run [`update_repository`] for every target concurrently
///
/// All-or-nothing: the batch fails as soon as any repository fails. Calls
/// already issued for other repositories are not rolled back.
pub async fn update_all(
    platform: &dyn PlatformService,
    targets: &[UpdateTarget],
    versions: &ResolvedVersions,
    options: &UpdateOptions,
) -> Result<Vec<Vec<PlannedCall>>> {
    try_join_all(targets.iter().map(|target| {
        let span = info_span!("update_repository", repo = %target.repo_id());
        update_repository(platform, target, versions, options).instrument(span)
    }))
    .await
}
