use pipeline::{ForkHost, ForkPrConfig, MergeType, MergeUpstream, StepKind, StepOutcome};
use tracing::{info, instrument};

use crate::step_failed;

/// Merges upstream's base branch into the fork's base branch.
///
/// "Already up to date" and "merged" are both success. Any failure is handed to
/// the policy; under the default policy the run continues on a stale base.
pub struct BranchSyncer<'a> {
    host: &'a dyn ForkHost,
    config: &'a ForkPrConfig,
}

impl<'a> BranchSyncer<'a> {
    /// Creates a node that talks to `host` using the settings in `config`.
    pub fn new(host: &'a dyn ForkHost, config: &'a ForkPrConfig) -> Self {
        Self { host, config }
    }

    /// Requests the merge-upstream for the configured base branch.
    #[instrument(skip_all, fields(fork = %self.config.fork, branch = %self.config.base_branch))]
    pub async fn run(&self) -> StepOutcome<MergeUpstream> {
        let branch = &self.config.base_branch;
        match self.host.merge_upstream(&self.config.fork, branch).await {
            Ok(merge) => {
                match merge.merge_type {
                    MergeType::None => info!("Base branch already up to date with upstream"),
                    _ => info!(merge_type = ?merge.merge_type, "Base branch synced with upstream"),
                }
                StepOutcome::Success(merge)
            }
            Err(e) => step_failed(
                &self.config.policy,
                StepKind::SyncFork,
                format!("failed to sync branch '{branch}' with upstream: {e}"),
            ),
        }
    }
}
