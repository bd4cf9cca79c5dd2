use pipeline::{BranchName, BranchRef, ForkHost, ForkPrConfig, StepKind, StepOutcome, UniqueId};
use tracing::{debug, info, instrument};

use crate::step_failed;

/// Creates `update-<unique_id>` on the fork at the current head of the base branch.
///
/// Two remote calls: a ref lookup for the base head, then a create-ref. Failure
/// of either is fatal to the run; the create-ref is never issued if the lookup
/// fails. An existing branch of the same name is reported by the remote as a
/// conflict and surfaces here as a failure.
pub struct BranchCreator<'a> {
    host: &'a dyn ForkHost,
    config: &'a ForkPrConfig,
}

impl<'a> BranchCreator<'a> {
    /// Creates a node that talks to `host` using the settings in `config`.
    pub fn new(host: &'a dyn ForkHost, config: &'a ForkPrConfig) -> Self {
        Self { host, config }
    }

    /// Resolves the base head and creates the feature branch for `unique_id`.
    ///
    /// Returns the new branch and the commit it points at.
    #[instrument(skip_all, fields(fork = %self.config.fork, unique_id = %unique_id))]
    pub async fn run(&self, unique_id: &UniqueId) -> StepOutcome<BranchRef> {
        let fork = &self.config.fork;
        let base = &self.config.base_branch;
        let policy = &self.config.policy;

        let sha = match self.host.branch_head(fork, base).await {
            Ok(sha) => sha,
            Err(e) => {
                return step_failed(
                    policy,
                    StepKind::CreateBranch,
                    format!("failed to resolve head of '{base}': {e}"),
                )
            }
        };
        debug!(base = %base, sha = %sha, "Resolved base branch head");

        let name = BranchName::for_push(unique_id);
        match self.host.create_branch(fork, &name, &sha).await {
            Ok(branch) => {
                info!(branch = %branch.name, sha = %branch.head_sha, "Branch created");
                StepOutcome::Success(branch)
            }
            Err(e) => step_failed(
                policy,
                StepKind::CreateBranch,
                format!("failed to create branch '{name}': {e}"),
            ),
        }
    }
}
