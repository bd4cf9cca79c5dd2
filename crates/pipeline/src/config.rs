//! Run configuration, injected into the executor and the GitHub client.
//!
//! Everything that used to be a process-wide constant (repositories, base
//! branch, credential, API location) lives in [`ForkPrConfig`] so several
//! configurations can coexist in one process.

use url::Url;

use crate::{BranchName, ContentEncoding, ForkPrError, PipelinePolicy, RepositoryId};

/// Public GitHub REST API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Base branch used when none is configured.
pub const DEFAULT_BASE_BRANCH: &str = "master";

/// Bearer credential for the GitHub API.
///
/// `Debug` and `Display` never reveal the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wraps a token, returning `None` if it is blank or cannot be sent in an
    /// HTTP header (control characters or non-ASCII).
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.trim().is_empty() || !v.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b)) {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the raw token for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiToken(<redacted>)")
    }
}

/// Complete configuration for one pipeline.
#[derive(Debug, Clone)]
pub struct ForkPrConfig {
    /// Root URL of the GitHub REST API.
    pub api_base_url: Url,
    /// Credential sent as `Authorization: Bearer <token>`.
    pub token: ApiToken,
    /// The fork that receives the branch and commit.
    pub fork: RepositoryId,
    /// The repository the pull request is opened against.
    pub upstream: RepositoryId,
    /// Integration branch, shared by fork and upstream.
    pub base_branch: BranchName,
    /// Encoding applied to file content on submission.
    pub content_encoding: ContentEncoding,
    /// Soft/fatal failure classification per step.
    pub policy: PipelinePolicy,
}

impl ForkPrConfig {
    /// Builds a configuration from raw values, validating each one.
    pub fn from_parts(
        api_base_url: &str,
        token: &str,
        fork: &str,
        upstream: &str,
        base_branch: &str,
    ) -> Result<Self, ForkPrError> {
        let api_base_url = Url::parse(api_base_url).map_err(|e| config_error(format!(
            "invalid API base URL '{api_base_url}': {e}"
        )))?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(config_error(format!(
                "API base URL must be http or https, got '{}'",
                api_base_url.scheme()
            )));
        }
        let token = ApiToken::new(token)
            .ok_or_else(|| config_error("API token is empty or not valid in an HTTP header"))?;
        let fork = RepositoryId::parse(fork)
            .ok_or_else(|| config_error(format!("fork '{fork}' is not in owner/name form")))?;
        let upstream = RepositoryId::parse(upstream).ok_or_else(|| {
            config_error(format!("upstream '{upstream}' is not in owner/name form"))
        })?;
        let base_branch =
            BranchName::new(base_branch).ok_or_else(|| config_error("base branch is empty"))?;

        Ok(Self {
            api_base_url,
            token,
            fork,
            upstream,
            base_branch,
            content_encoding: ContentEncoding::default(),
            policy: PipelinePolicy::default(),
        })
    }

    /// Sets the content encoding.
    pub fn with_content_encoding(mut self, encoding: ContentEncoding) -> Self {
        self.content_encoding = encoding;
        self
    }

    /// Sets the failure policy.
    pub fn with_policy(mut self, policy: PipelinePolicy) -> Self {
        self.policy = policy;
        self
    }
}

fn config_error(message: impl Into<String>) -> ForkPrError {
    ForkPrError::ConfigurationError {
        message: message.into(),
    }
}
