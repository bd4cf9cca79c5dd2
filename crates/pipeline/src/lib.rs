//! Core domain for forkpr.
//!
//! forkpr turns a push event (an identifier plus a JSON payload) into a pull
//! request: sync the fork's base branch with upstream, branch off it, commit
//! the payload as `<unique_id>.json`, and open a pull request back to
//! upstream. This crate holds every domain concept used along the way.
//! Infrastructure crates implement the traits defined here; they never add
//! domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers and naming rules (`BranchName::for_push`, etc.) |
//! | [`types`] | Value types flowing between steps (`PushEvent`, `FileCommitPlan`, etc.) |
//! | [`config`] | Injected run configuration (`ForkPrConfig`) |
//! | [`policy`] | Per-step soft/fatal failure policy |
//! | [`outcome`] | Step outcomes, pipeline state machine, run report |
//! | [`github`] | The `ForkHost` port and its error type |
//! | [`errors`] | Pre-flight error type |

pub mod config;
pub mod errors;
pub mod github;
pub mod identifiers;
pub mod outcome;
pub mod policy;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{ApiToken, ForkPrConfig, DEFAULT_API_BASE_URL, DEFAULT_BASE_BRANCH};
pub use errors::ForkPrError;
pub use github::{ForkHost, GitHubError};
pub use identifiers::{
    ArtifactPath, BranchName, CommitSha, PipelineRunId, PullRequestNumber, RepositoryId, UniqueId,
    ARTIFACT_EXTENSION, BRANCH_PREFIX,
};
pub use outcome::{
    PipelineOutcome, PipelineReport, PipelineState, StepOutcome, StepRecord, StepStatus,
};
pub use policy::{PipelinePolicy, StepKind, StepPolicy};
pub use types::{
    BranchRef, ContentEncoding, FileCommit, FileCommitPlan, MergeType, MergeUpstream, PullRequest,
    PullRequestRequest, PushEvent, Timestamp,
};
