//! Newtype domain identifiers.
//!
//! Every domain concept that has an identity is represented as a distinct newtype
//! wrapping a primitive. This prevents accidentally interchanging, for example,
//! a [`BranchName`] with a [`CommitSha`] even though both are strings under the
//! hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: GitHub-integer-backed
// ---------------------------------------------------------------------------

/// Identifies a GitHub Pull Request by the number GitHub assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Creates a new identifier from a raw integer.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PullRequestNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single pipeline execution run (one push event, start to finish).
///
/// Generated fresh for every run; recorded on the executor span so all activity
/// from a single run can be correlated in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipelineRunId(Uuid);

impl PipelineRunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for PipelineRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: String-backed (caller / Git names)
// ---------------------------------------------------------------------------

/// The caller-supplied identifier of a push event (e.g. `"push-12345"`).
///
/// Drives both the feature branch name and the committed file path, so two
/// runs with the same id collide on the remote by construction. `.` and `..`
/// path components are refused because the committed path would not match the
/// requested one after URL normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UniqueId(String);

impl UniqueId {
    /// Creates a new identifier, returning `None` if the value is empty or has
    /// a `.` or `..` path component.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        let dotted = v.split('/').any(|part| matches!(part, "." | ".."));
        if v.is_empty() || dotted {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UniqueId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value.clone()).ok_or_else(|| format!("invalid unique id '{value}'"))
    }
}

impl From<UniqueId> for String {
    fn from(id: UniqueId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UniqueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

string_id! {
    /// A Git branch name (e.g. `"master"`, `"update-push-12345"`).
    BranchName
}

string_id! {
    /// A Git commit SHA as reported by the GitHub API.
    CommitSha
}

string_id! {
    /// A file-system path relative to the repository root.
    ArtifactPath
}

/// Prefix of every feature branch created by the pipeline.
pub const BRANCH_PREFIX: &str = "update-";

/// Extension of every committed push-event artefact.
pub const ARTIFACT_EXTENSION: &str = ".json";

impl BranchName {
    /// Derives the feature branch name for a push event: `update-<unique_id>`.
    pub fn for_push(id: &UniqueId) -> Self {
        Self(format!("{BRANCH_PREFIX}{id}"))
    }

    /// Returns the fully-qualified ref (`refs/heads/<name>`).
    pub fn to_ref(&self) -> String {
        format!("refs/heads/{}", self.0)
    }
}

impl ArtifactPath {
    /// Derives the artefact path for a push event: `<unique_id>.json`.
    pub fn for_push(id: &UniqueId) -> Self {
        Self(format!("{id}{ARTIFACT_EXTENSION}"))
    }
}

// ---------------------------------------------------------------------------
// Repository coordinates
// ---------------------------------------------------------------------------

/// Identifies a GitHub repository in `"owner/repo"` format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryId {
    owner: String,
    name: String,
}

impl RepositoryId {
    /// Creates a [`RepositoryId`] from its parts, returning `None` if either is
    /// empty or contains a `/`.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Option<Self> {
        let owner = owner.into();
        let name = name.into();
        let valid = |s: &str| !s.is_empty() && !s.contains('/');
        if valid(&owner) && valid(&name) {
            Some(Self { owner, name })
        } else {
            None
        }
    }

    /// Parses `"owner/repo"`. Exactly one `/` with non-empty parts is accepted.
    pub fn parse(value: &str) -> Option<Self> {
        let (owner, name) = value.split_once('/')?;
        Self::new(owner, name)
    }

    /// Returns the owning user or organisation.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the repository name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
