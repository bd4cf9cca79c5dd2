//! GitHub port: the remote operations the pipeline needs from the fork host.
//!
//! The [`ForkHost`] trait is implemented by the `github` infrastructure crate
//! over the REST API and by in-memory fakes in tests. Every method maps to
//! exactly one HTTP call; none of them retry.

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    BranchName, BranchRef, CommitSha, FileCommit, FileCommitPlan, MergeUpstream, PullRequest,
    PullRequestRequest, RepositoryId,
};

/// Failure of a single remote call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GitHubError {
    /// The service answered with a status other than the one the call expects.
    ///
    /// `body` holds the raw response body so it can be logged verbatim.
    #[error("GitHub returned HTTP {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// No response was received (connection, TLS, or request-building failure).
    #[error("Transport error: {message}")]
    Transport {
        /// Description from the HTTP client.
        message: String,
    },

    /// The expected status arrived but the body could not be interpreted.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// What was missing or malformed.
        message: String,
    },

    /// A path component would be rewritten by URL normalisation (`.` or `..`).
    #[error("Invalid request path '{path}'")]
    InvalidPath {
        /// The path as given by the caller.
        path: String,
    },
}

impl GitHubError {
    /// Returns the HTTP status for [`GitHubError::UnexpectedStatus`], otherwise `None`.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Remote operations against a fork and its upstream.
#[async_trait]
pub trait ForkHost: Send + Sync {
    /// Merges the upstream counterpart of `branch` into `branch` on `fork`.
    async fn merge_upstream(
        &self,
        fork: &RepositoryId,
        branch: &BranchName,
    ) -> Result<MergeUpstream, GitHubError>;

    /// Resolves the head commit of `branch` on `repo`.
    async fn branch_head(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
    ) -> Result<CommitSha, GitHubError>;

    /// Creates `branch` on `repo` pointing at `sha`.
    ///
    /// An existing branch with the same name is a conflict, never overwritten.
    async fn create_branch(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
        sha: &CommitSha,
    ) -> Result<BranchRef, GitHubError>;

    /// Creates the file described by `plan` on `repo`.
    async fn create_file(
        &self,
        repo: &RepositoryId,
        plan: &FileCommitPlan,
    ) -> Result<FileCommit, GitHubError>;

    /// Opens a pull request on `repo`.
    async fn open_pull_request(
        &self,
        repo: &RepositoryId,
        request: &PullRequestRequest,
    ) -> Result<PullRequest, GitHubError>;
}
