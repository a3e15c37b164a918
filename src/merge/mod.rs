//! Merge engine for trusted bot PRs
//!
//! Three-phase pattern:
//! 1. Gather - list candidates, fetch PR, statuses and commits (effectful)
//! 2. Decide - reduce statuses and evaluate eligibility (pure, testable)
//! 3. Execute - squash-merge and clean up the branch (effectful)

mod execute;
mod plan;
mod status;

pub use execute::{AutoMergeReport, MergeOutcome, MergeStatus, process_candidate, run_auto_merge};
pub use plan::{
    MergeDecision, MergePolicy, SkipReason, check_mergeable, check_statuses,
    evaluate_pull_request, is_candidate, squash_commit_message,
};
pub use status::{all_checks_pass, authoritative_statuses, failing_checks};
