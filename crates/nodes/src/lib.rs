//! forkpr pipeline step nodes and executor.
//!
//! This crate provides the four step nodes that make up a run and the
//! [`PipelineExecutor`] that drives them in order:
//!
//! 1. [`BranchSyncer`]: merge upstream's base branch into the fork's.
//! 2. [`BranchCreator`]: branch `update-<unique_id>` off the fork's base head.
//! 3. [`FileCommitter`]: commit `<unique_id>.json` to that branch.
//! 4. [`PullRequestOpener`]: open `<fork_owner>:<branch>` → upstream base.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Nodes sequence calls between business logic in the
//! [`pipeline`] crate and the [`pipeline::ForkHost`] port. They contain no
//! domain rules of their own; soft/fatal classification is looked up in
//! [`pipeline::PipelinePolicy`].

mod branch;
mod commit;
mod executor;
mod pull_request;
mod sync;

pub use branch::BranchCreator;
pub use commit::FileCommitter;
pub use executor::PipelineExecutor;
pub use pull_request::PullRequestOpener;
pub use sync::BranchSyncer;

use pipeline::{PipelinePolicy, StepKind, StepOutcome};
use tracing::{error, warn};

/// Classifies a step failure through `policy` and logs it at the matching level.
fn step_failed<T>(policy: &PipelinePolicy, step: StepKind, reason: String) -> StepOutcome<T> {
    let outcome = policy.classify(step, reason);
    match &outcome {
        StepOutcome::FatalFailure(reason) => error!(step = %step, %reason, "Step failed; halting"),
        StepOutcome::SoftFailure(reason) => warn!(step = %step, %reason, "Step failed; continuing"),
        StepOutcome::Success(_) => {}
    }
    outcome
}
