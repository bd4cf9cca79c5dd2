//! Per-step failure policy.
//!
//! Each step's failure is classified as soft (log and continue) or fatal (halt
//! the run) by a single lookup into [`PipelinePolicy`]. Branch creation is
//! always fatal because every later step needs the branch. The pull request is
//! the last step, so its classification only affects how the failure is
//! recorded.

use serde::{Deserialize, Serialize};

use crate::StepOutcome;

/// The four pipeline steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Merge upstream's base branch into the fork's base branch.
    SyncFork,
    /// Create the feature branch at the fork's base head.
    CreateBranch,
    /// Commit the push-event artefact to the feature branch.
    CommitFile,
    /// Open the pull request from the feature branch to upstream.
    OpenPullRequest,
}

impl StepKind {
    /// All steps in the order the executor runs them.
    pub const ORDER: [StepKind; 4] = [
        StepKind::SyncFork,
        StepKind::CreateBranch,
        StepKind::CommitFile,
        StepKind::OpenPullRequest,
    ];

    /// Returns a stable snake_case label for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SyncFork => "sync_fork",
            Self::CreateBranch => "create_branch",
            Self::CommitFile => "commit_file",
            Self::OpenPullRequest => "open_pull_request",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure handling for one configurable step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPolicy {
    /// When `true`, a failure of this step is logged and the run continues.
    pub continue_on_soft_failure: bool,
}

impl StepPolicy {
    /// Log the failure and move on.
    pub const CONTINUE: Self = Self {
        continue_on_soft_failure: true,
    };

    /// Halt the run on failure.
    pub const HALT: Self = Self {
        continue_on_soft_failure: false,
    };
}

/// Failure handling for the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelinePolicy {
    /// Policy for [`StepKind::SyncFork`].
    pub sync_fork: StepPolicy,
    /// Policy for [`StepKind::CommitFile`].
    pub commit_file: StepPolicy,
}

impl PipelinePolicy {
    /// Sync and commit failures are logged and the run continues.
    ///
    /// A pull request may therefore be opened against a stale base or without
    /// the artefact committed.
    pub const fn forgiving() -> Self {
        Self {
            sync_fork: StepPolicy::CONTINUE,
            commit_file: StepPolicy::CONTINUE,
        }
    }

    /// Every failure halts the run.
    pub const fn strict() -> Self {
        Self {
            sync_fork: StepPolicy::HALT,
            commit_file: StepPolicy::HALT,
        }
    }

    /// Returns whether a failure of `step` lets the run continue.
    pub fn continues_after_failure(&self, step: StepKind) -> bool {
        match step {
            StepKind::SyncFork => self.sync_fork.continue_on_soft_failure,
            StepKind::CreateBranch => false,
            StepKind::CommitFile => self.commit_file.continue_on_soft_failure,
            StepKind::OpenPullRequest => true,
        }
    }

    /// Classifies a failure of `step` as soft or fatal.
    pub fn classify<T>(&self, step: StepKind, reason: impl Into<String>) -> StepOutcome<T> {
        if self.continues_after_failure(step) {
            StepOutcome::SoftFailure(reason.into())
        } else {
            StepOutcome::FatalFailure(reason.into())
        }
    }
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self::forgiving()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forgiving_policy_is_default() {
        assert_eq!(PipelinePolicy::default(), PipelinePolicy::forgiving());
    }

    #[test]
    fn test_forgiving_policy_continues_after_sync_and_commit() {
        let policy = PipelinePolicy::forgiving();
        assert!(policy.continues_after_failure(StepKind::SyncFork));
        assert!(policy.continues_after_failure(StepKind::CommitFile));
        assert!(!policy.continues_after_failure(StepKind::CreateBranch));
    }

    #[test]
    fn test_strict_policy_halts_after_sync_and_commit() {
        let policy = PipelinePolicy::strict();
        assert!(!policy.continues_after_failure(StepKind::SyncFork));
        assert!(!policy.continues_after_failure(StepKind::CommitFile));
    }

    #[test]
    fn test_branch_creation_is_always_fatal() {
        let policy = PipelinePolicy {
            sync_fork: StepPolicy::CONTINUE,
            commit_file: StepPolicy::CONTINUE,
        };
        let outcome: StepOutcome<()> = policy.classify(StepKind::CreateBranch, "422");
        assert_eq!(outcome, StepOutcome::FatalFailure("422".to_string()));
    }

    #[test]
    fn test_classify_maps_policy_to_outcome() {
        let soft: StepOutcome<()> = PipelinePolicy::forgiving().classify(StepKind::SyncFork, "x");
        let fatal: StepOutcome<()> = PipelinePolicy::strict().classify(StepKind::SyncFork, "x");
        assert!(matches!(soft, StepOutcome::SoftFailure(_)));
        assert!(matches!(fatal, StepOutcome::FatalFailure(_)));
    }

    #[test]
    fn test_step_order() {
        let labels: Vec<_> = StepKind::ORDER.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            labels,
            ["sync_fork", "create_branch", "commit_file", "open_pull_request"]
        );
    }
}
