//! The pipeline executor: runs the four step nodes in order for one push event.

use std::ops::ControlFlow;
use std::sync::Arc;

use pipeline::{
    ForkHost, ForkPrConfig, PipelineOutcome, PipelineReport, PipelineRunId, PipelineState,
    PushEvent, StepKind, StepOutcome, StepRecord,
};
use tracing::{error, info, instrument};

use crate::{BranchCreator, BranchSyncer, FileCommitter, PullRequestOpener};

/// Runs push events through sync → branch → commit → pull request.
///
/// Each step runs at most once per event and only after the previous one has
/// returned. A fatal step outcome ends the run in [`PipelineState::Aborted`];
/// soft failures are recorded and the next step runs.
pub struct PipelineExecutor {
    host: Arc<dyn ForkHost>,
    config: ForkPrConfig,
}

impl PipelineExecutor {
    /// Creates an executor over `host` with an injected configuration.
    pub fn new(host: Arc<dyn ForkHost>, config: ForkPrConfig) -> Self {
        Self { host, config }
    }

    /// Publishes one push event as a branch, a commit, and a pull request.
    ///
    /// Never returns an error: every step failure is logged and recorded in the
    /// returned [`PipelineReport`].
    pub async fn handle_push_event(&self, event: &PushEvent) -> PipelineReport {
        self.run(PipelineRunId::new_random(), event).await
    }

    #[instrument(name = "pipeline_run", skip_all, fields(run_id = %run_id, unique_id = %event.unique_id()))]
    async fn run(&self, run_id: PipelineRunId, event: &PushEvent) -> PipelineReport {
        let host = self.host.as_ref();
        let config = &self.config;
        let mut run = RunLog::new(run_id);

        let synced = BranchSyncer::new(host, config).run().await;
        if let ControlFlow::Break(reason) = run.advance(StepKind::SyncFork, synced) {
            return run.abort(StepKind::SyncFork, reason);
        }

        let created = BranchCreator::new(host, config).run(event.unique_id()).await;
        let branch = match run.advance(StepKind::CreateBranch, created) {
            ControlFlow::Continue(Some(branch)) => branch,
            ControlFlow::Continue(None) => {
                return run.abort(StepKind::CreateBranch, "branch was not created".to_string())
            }
            ControlFlow::Break(reason) => return run.abort(StepKind::CreateBranch, reason),
        };

        let committed = FileCommitter::new(host, config).run(event, &branch).await;
        if let ControlFlow::Break(reason) = run.advance(StepKind::CommitFile, committed) {
            return run.abort(StepKind::CommitFile, reason);
        }

        let opened = PullRequestOpener::new(host, config).run(&branch).await;
        let outcome = match opened {
            StepOutcome::Success(ref pr) => PipelineOutcome::PullRequestOpened {
                url: pr.html_url.clone(),
            },
            StepOutcome::SoftFailure(ref reason) | StepOutcome::FatalFailure(ref reason) => {
                PipelineOutcome::Failed {
                    step: StepKind::OpenPullRequest,
                    reason: reason.clone(),
                }
            }
        };
        if let ControlFlow::Break(reason) = run.advance(StepKind::OpenPullRequest, opened) {
            return run.abort(StepKind::OpenPullRequest, reason);
        }
        run.finish(outcome)
    }
}

/// Accumulates step records and the state-machine position for one run.
struct RunLog {
    run_id: PipelineRunId,
    steps: Vec<StepRecord>,
    state: PipelineState,
}

impl RunLog {
    fn new(run_id: PipelineRunId) -> Self {
        Self {
            run_id,
            steps: Vec::with_capacity(StepKind::ORDER.len()),
            state: PipelineState::Start,
        }
    }

    /// Records `outcome` for `step` and moves the state machine.
    ///
    /// `Break` carries the failure reason of a fatal outcome. `Continue` carries
    /// the success value, or `None` after a soft failure.
    fn advance<T>(&mut self, step: StepKind, outcome: StepOutcome<T>) -> ControlFlow<String, Option<T>> {
        self.steps.push(StepRecord {
            step,
            status: outcome.status(),
        });
        match outcome {
            StepOutcome::FatalFailure(reason) => {
                self.state = PipelineState::Aborted;
                ControlFlow::Break(reason)
            }
            other => {
                self.state = PipelineState::after(step);
                ControlFlow::Continue(other.success())
            }
        }
    }

    fn abort(mut self, step: StepKind, reason: String) -> PipelineReport {
        self.state = PipelineState::Aborted;
        error!(step = %step, %reason, "Pipeline aborted");
        self.into_report(PipelineOutcome::Failed { step, reason })
    }

    fn finish(mut self, outcome: PipelineOutcome) -> PipelineReport {
        self.state = PipelineState::End;
        match &outcome {
            PipelineOutcome::PullRequestOpened { url } => info!(%url, "Pipeline completed"),
            PipelineOutcome::Failed { step, reason } => {
                error!(step = %step, %reason, "Pipeline completed without a pull request")
            }
        }
        self.into_report(outcome)
    }

    fn into_report(self, outcome: PipelineOutcome) -> PipelineReport {
        PipelineReport {
            run_id: self.run_id,
            steps: self.steps,
            state: self.state,
            outcome,
        }
    }
}
