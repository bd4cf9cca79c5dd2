use pipeline::{
    BranchRef, ForkHost, ForkPrConfig, PullRequest, PullRequestRequest, StepKind, StepOutcome,
};
use tracing::{info, instrument};

use crate::step_failed;

/// Opens a pull request from `<fork_owner>:<branch>` to upstream's base branch.
///
/// No check is made for an already-open pull request with the same head.
pub struct PullRequestOpener<'a> {
    host: &'a dyn ForkHost,
    config: &'a ForkPrConfig,
}

impl<'a> PullRequestOpener<'a> {
    /// Creates a node that talks to `host` using the settings in `config`.
    pub fn new(host: &'a dyn ForkHost, config: &'a ForkPrConfig) -> Self {
        Self { host, config }
    }

    /// Opens the pull request for `branch`; the URL is in the returned value.
    #[instrument(skip_all, fields(upstream = %self.config.upstream, branch = %branch.name))]
    pub async fn run(&self, branch: &BranchRef) -> StepOutcome<PullRequest> {
        let request =
            PullRequestRequest::for_branch(&self.config.fork, branch, &self.config.base_branch);
        match self
            .host
            .open_pull_request(&self.config.upstream, &request)
            .await
        {
            Ok(pr) => {
                info!(number = %pr.number, url = %pr.html_url, "Pull request created");
                StepOutcome::Success(pr)
            }
            Err(e) => step_failed(
                &self.config.policy,
                StepKind::OpenPullRequest,
                format!("failed to create pull request from '{}': {e}", request.head),
            ),
        }
    }
}
