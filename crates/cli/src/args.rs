use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use pipeline::{
    ContentEncoding, ForkPrConfig, ForkPrError, PipelinePolicy, PushEvent, Timestamp, UniqueId,
    DEFAULT_API_BASE_URL, DEFAULT_BASE_BRANCH,
};
use serde_json::Value;

/// Publish a push event to GitHub as a branch, a commit, and a pull request.
#[derive(Parser)]
#[command(name = "forkpr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Identifier of the push event; names the branch and the committed file
    #[arg(long)]
    pub unique_id: String,

    /// Payload as an inline JSON object
    #[arg(long, conflicts_with = "payload_file", required_unless_present = "payload_file")]
    pub payload: Option<String>,

    /// Path to a file holding the payload JSON object
    #[arg(long)]
    pub payload_file: Option<PathBuf>,

    /// Add a `timestamp` key (current UTC time) to the payload
    #[arg(long)]
    pub add_timestamp: bool,

    /// Fork repository (owner/name)
    #[arg(long, env = "FORKPR_FORK")]
    pub fork: String,

    /// Upstream repository (owner/name)
    #[arg(long, env = "FORKPR_UPSTREAM")]
    pub upstream: String,

    /// Base branch shared by fork and upstream
    #[arg(long, env = "FORKPR_BASE_BRANCH", default_value = DEFAULT_BASE_BRANCH)]
    pub base_branch: String,

    /// GitHub REST API root
    #[arg(long, env = "FORKPR_API_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_url: String,

    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Encoding of the committed file content (plain or base64)
    #[arg(long, default_value = "plain")]
    pub encoding: ContentEncoding,

    /// Halt on sync or commit failure instead of continuing
    #[arg(long)]
    pub strict: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    pub json: bool,

    /// OTLP collector endpoint for trace export
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Cli {
    /// Validates the repository, credential, and policy flags.
    pub fn to_config(&self) -> Result<ForkPrConfig, ForkPrError> {
        let policy = if self.strict {
            PipelinePolicy::strict()
        } else {
            PipelinePolicy::forgiving()
        };
        Ok(ForkPrConfig::from_parts(
            &self.api_url,
            &self.token,
            &self.fork,
            &self.upstream,
            &self.base_branch,
        )?
        .with_content_encoding(self.encoding)
        .with_policy(policy))
    }

    /// Reads and validates the push event.
    pub fn load_event(&self) -> anyhow::Result<PushEvent> {
        let raw = match (&self.payload, &self.payload_file) {
            (Some(inline), _) => inline.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("reading payload file {}", path.display()))?,
            (None, None) => bail!("either --payload or --payload-file is required"),
        };
        let payload: Value = serde_json::from_str(&raw).context("payload is not valid JSON")?;
        let id = UniqueId::new(self.unique_id.as_str())
            .context("--unique-id must be non-empty with no '.' or '..' path components")?;

        let event = PushEvent::from_value(id, payload)?;
        Ok(if self.add_timestamp {
            event.with_timestamp(Timestamp::now())
        } else {
            event
        })
    }
}
