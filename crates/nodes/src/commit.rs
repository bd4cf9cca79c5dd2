use pipeline::{
    BranchRef, FileCommit, FileCommitPlan, ForkHost, ForkPrConfig, PushEvent, StepKind,
    StepOutcome,
};
use tracing::{info, instrument};

use crate::step_failed;

/// Commits the push event's payload as `<unique_id>.json` on the feature branch.
///
/// A successful response is taken as proof the file exists; nothing is read
/// back.
pub struct FileCommitter<'a> {
    host: &'a dyn ForkHost,
    config: &'a ForkPrConfig,
}

impl<'a> FileCommitter<'a> {
    /// Creates a node that talks to `host` using the settings in `config`.
    pub fn new(host: &'a dyn ForkHost, config: &'a ForkPrConfig) -> Self {
        Self { host, config }
    }

    /// Writes the rendered payload of `event` to `branch`.
    #[instrument(skip_all, fields(branch = %branch.name, unique_id = %event.unique_id()))]
    pub async fn run(&self, event: &PushEvent, branch: &BranchRef) -> StepOutcome<FileCommit> {
        let policy = &self.config.policy;
        let plan = match FileCommitPlan::for_push(event, branch) {
            Ok(plan) => plan,
            Err(e) => return step_failed(policy, StepKind::CommitFile, e.to_string()),
        };

        match self.host.create_file(&self.config.fork, &plan).await {
            Ok(commit) => {
                info!(path = %commit.path, "File added to branch");
                StepOutcome::Success(commit)
            }
            Err(e) => step_failed(
                policy,
                StepKind::CommitFile,
                format!("failed to add file '{}': {e}", plan.path),
            ),
        }
    }
}
