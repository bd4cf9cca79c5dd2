//! Step results and the per-run report.

use serde::{Deserialize, Serialize};

use crate::{PipelineRunId, StepKind};

/// Tagged result of one pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome<T> {
    /// The step succeeded and produced `T`.
    Success(T),
    /// The step failed; the run continues.
    SoftFailure(String),
    /// The step failed; no further steps run.
    FatalFailure(String),
}

impl<T> StepOutcome<T> {
    /// Returns the success value, if any.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` if the run must halt after this step.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalFailure(_))
    }

    /// Converts to the value-free [`StepStatus`] kept in the report.
    pub fn status(&self) -> StepStatus {
        match self {
            Self::Success(_) => StepStatus::Succeeded,
            Self::SoftFailure(reason) => StepStatus::SoftFailed {
                reason: reason.clone(),
            },
            Self::FatalFailure(reason) => StepStatus::FatalFailed {
                reason: reason.clone(),
            },
        }
    }
}

/// Recorded result of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    /// The step succeeded.
    Succeeded,
    /// The step failed and the run continued.
    SoftFailed {
        /// Failure description (including the response body when there was one).
        reason: String,
    },
    /// The step failed and the run halted.
    FatalFailed {
        /// Failure description (including the response body when there was one).
        reason: String,
    },
}

/// One entry in [`PipelineReport::steps`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Which step ran.
    pub step: StepKind,
    /// How it ended.
    pub status: StepStatus,
}

/// Position of a run in the pipeline state machine.
///
/// `Start → Synced → BranchCreated → FileCommitted → PullRequestAttempted → End`,
/// with `Aborted` reachable from any step whose failure is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Start,
    Synced,
    BranchCreated,
    FileCommitted,
    PullRequestAttempted,
    End,
    Aborted,
}

impl PipelineState {
    /// Returns the state a run moves into after `step` completes without halting.
    pub fn after(step: StepKind) -> Self {
        match step {
            StepKind::SyncFork => Self::Synced,
            StepKind::CreateBranch => Self::BranchCreated,
            StepKind::CommitFile => Self::FileCommitted,
            StepKind::OpenPullRequest => Self::PullRequestAttempted,
        }
    }
}

/// The observable result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// The pull request was opened.
    PullRequestOpened {
        /// Browser URL of the pull request.
        url: String,
    },
    /// No pull request was opened.
    Failed {
        /// The step whose failure ended the run.
        step: StepKind,
        /// Failure description.
        reason: String,
    },
}

/// Everything that happened during one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Run identifier.
    pub run_id: PipelineRunId,
    /// Steps that ran, in order. Steps skipped after a fatal failure are absent.
    pub steps: Vec<StepRecord>,
    /// Terminal state (`End` or `Aborted`).
    pub state: PipelineState,
    /// Observable result.
    pub outcome: PipelineOutcome,
}

impl PipelineReport {
    /// Returns the pull request URL if one was opened.
    pub fn pull_request_url(&self) -> Option<&str> {
        match &self.outcome {
            PipelineOutcome::PullRequestOpened { url } => Some(url),
            PipelineOutcome::Failed { .. } => None,
        }
    }

    /// Returns the recorded status of `step`, if it ran.
    pub fn status_of(&self, step: StepKind) -> Option<&StepStatus> {
        self.steps.iter().find(|r| r.step == step).map(|r| &r.status)
    }
}
