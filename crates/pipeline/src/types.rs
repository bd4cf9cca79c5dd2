//! Shared value types for the forkpr pipeline domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! the data that flows between steps: the push event coming in, the branch
//! created for it, the file committed to that branch, and the pull request
//! opened from it. Every value here is transient and lives for one run.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ArtifactPath, BranchName, CommitSha, ForkPrError, PullRequestNumber, RepositoryId, UniqueId};

// ---------------------------------------------------------------------------
// Push event
// ---------------------------------------------------------------------------

/// One unit of work to publish: an identifier plus a JSON object payload.
///
/// Created by the caller and consumed once by the executor. The payload keeps
/// key insertion order so the committed artefact mirrors what was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEvent {
    unique_id: UniqueId,
    payload: Map<String, Value>,
}

/// Indentation used for the committed JSON artefact.
const ARTIFACT_INDENT: &[u8] = b"    ";

impl PushEvent {
    /// Creates a push event from an already-validated object payload.
    pub fn new(unique_id: UniqueId, payload: Map<String, Value>) -> Self {
        Self { unique_id, payload }
    }

    /// Creates a push event from an arbitrary JSON value.
    ///
    /// Returns [`ForkPrError::InvalidPushEvent`] unless `payload` is an object.
    pub fn from_value(unique_id: UniqueId, payload: Value) -> Result<Self, ForkPrError> {
        match payload {
            Value::Object(map) => Ok(Self::new(unique_id, map)),
            other => Err(ForkPrError::InvalidPushEvent {
                reason: format!("payload must be a JSON object, got {}", json_kind(&other)),
            }),
        }
    }

    /// Returns the caller-supplied identifier.
    pub fn unique_id(&self) -> &UniqueId {
        &self.unique_id
    }

    /// Returns the payload mapping.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Inserts (or replaces) a `timestamp` key holding `at` in RFC 3339 form.
    pub fn with_timestamp(mut self, at: Timestamp) -> Self {
        self.payload
            .insert("timestamp".to_string(), Value::String(at.to_string()));
        self
    }

    /// Renders the payload as the artefact text: JSON with 4-space indentation.
    pub fn render_artifact(&self) -> Result<String, ForkPrError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(ARTIFACT_INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.payload
            .serialize(&mut ser)
            .map_err(|e| ForkPrError::Serialization {
                message: e.to_string(),
            })?;
        String::from_utf8(buf).map_err(|e| ForkPrError::Serialization {
            message: e.to_string(),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Branch
// ---------------------------------------------------------------------------

/// A branch that exists on the fork, created by this run.
///
/// Only the branch-creation step produces one, so holding a [`BranchRef`] is
/// proof that the branch is present remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    /// Branch name (`update-<unique_id>`).
    pub name: BranchName,
    /// Commit the branch was created at (head of the base branch at the time).
    pub head_sha: CommitSha,
}

// ---------------------------------------------------------------------------
// Merge-upstream
// ---------------------------------------------------------------------------

/// How GitHub reconciled the fork's branch with upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeType {
    /// Already up to date; nothing changed.
    None,
    /// The fork branch was fast-forwarded.
    FastForward,
    /// A merge commit was created.
    Merge,
    /// A value this crate does not recognise.
    #[serde(other)]
    Unknown,
}

/// Result of a successful merge-upstream request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeUpstream {
    /// Reconciliation kind reported by GitHub.
    pub merge_type: MergeType,
    /// Human-readable message reported by GitHub, if any.
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// File commit
// ---------------------------------------------------------------------------

/// The artefact to write onto the feature branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCommitPlan {
    /// Repository-relative file path (`<unique_id>.json`).
    pub path: ArtifactPath,
    /// Full file content as UTF-8 JSON text (before any transport encoding).
    pub content: String,
    /// Branch the commit lands on.
    pub target_branch: BranchName,
    /// Commit message.
    pub message: String,
}

impl FileCommitPlan {
    /// Builds the commit plan for `event` on `branch`.
    pub fn for_push(event: &PushEvent, branch: &BranchRef) -> Result<Self, ForkPrError> {
        let path = ArtifactPath::for_push(event.unique_id());
        Ok(Self {
            message: format!("Add file {path}"),
            content: event.render_artifact()?,
            target_branch: branch.name.clone(),
            path,
        })
    }
}

/// A file created on the remote by a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCommit {
    /// Path of the created file.
    pub path: ArtifactPath,
    /// SHA of the commit that created it, when the response carried one.
    pub commit_sha: Option<CommitSha>,
}

/// Transport encoding applied to file content before it is submitted.
///
/// The GitHub contents endpoint documents base64 content. The pipeline has
/// historically submitted plain UTF-8 text; that stays the default until the
/// owner confirms which one the live API accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentEncoding {
    /// Submit the JSON text verbatim.
    #[default]
    Plain,
    /// Submit standard-alphabet base64 of the JSON text.
    Base64,
}

impl std::fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Base64 => write!(f, "base64"),
        }
    }
}

impl std::str::FromStr for ContentEncoding {
    type Err = ForkPrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "base64" => Ok(Self::Base64),
            other => Err(ForkPrError::ConfigurationError {
                message: format!("unknown content encoding '{other}' (expected plain or base64)"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Pull request
// ---------------------------------------------------------------------------

/// Description of the pull request to open on upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRequest {
    /// Pull request title.
    pub title: String,
    /// Source in `<fork_owner>:<branch>` form.
    pub head: String,
    /// Destination branch on upstream.
    pub base: BranchName,
    /// Pull request description.
    pub body: String,
}

impl PullRequestRequest {
    /// Builds the request for `branch` on `fork`, targeting `base` upstream.
    pub fn for_branch(fork: &RepositoryId, branch: &BranchRef, base: &BranchName) -> Self {
        let name = &branch.name;
        Self {
            title: format!("Update from branch {name}"),
            head: format!("{}:{name}", fork.owner()),
            base: base.clone(),
            body: format!("This PR adds updates from branch '{name}'."),
        }
    }
}

/// A pull request created on upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Number assigned by GitHub.
    pub number: PullRequestNumber,
    /// Browser URL of the pull request.
    pub html_url: String,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Micros, true))
    }
}
