//! In-memory [`ForkHost`] fake that records every call and replays scripted
//! responses.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use pipeline::{
    ArtifactPath, BranchName, BranchRef, CommitSha, FileCommit, FileCommitPlan, ForkHost,
    ForkPrConfig, GitHubError, MergeType, MergeUpstream, PullRequest, PullRequestNumber,
    PullRequestRequest, PushEvent, RepositoryId, UniqueId,
};

/// One recorded call against the fake.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    MergeUpstream {
        fork: String,
        branch: String,
    },
    BranchHead {
        repo: String,
        branch: String,
    },
    CreateBranch {
        repo: String,
        branch: String,
        sha: String,
    },
    CreateFile {
        repo: String,
        plan: FileCommitPlan,
    },
    OpenPullRequest {
        repo: String,
        request: PullRequestRequest,
    },
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::MergeUpstream { .. } => "merge_upstream",
            Call::BranchHead { .. } => "branch_head",
            Call::CreateBranch { .. } => "create_branch",
            Call::CreateFile { .. } => "create_file",
            Call::OpenPullRequest { .. } => "open_pull_request",
        }
    }
}

/// Scripted status codes for each remote call. `None` means success.
#[derive(Debug, Default, Clone)]
pub struct Script {
    pub merge_upstream: Option<u16>,
    pub branch_head: Option<u16>,
    pub create_branch: Option<u16>,
    pub create_file: Option<u16>,
    pub open_pull_request: Option<u16>,
    pub head_sha: Option<String>,
    pub already_up_to_date: bool,
}

#[derive(Debug, Default)]
pub struct RecordingForkHost {
    script: Script,
    calls: Mutex<Vec<Call>>,
}

impl RecordingForkHost {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls().iter().map(Call::name).collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn failure(status: u16) -> GitHubError {
    GitHubError::UnexpectedStatus {
        status,
        body: format!("{{\"message\":\"scripted {status}\"}}"),
    }
}

fn scripted<T>(status: Option<u16>, ok: impl FnOnce() -> T) -> Result<T, GitHubError> {
    match status {
        Some(status) => Err(failure(status)),
        None => Ok(ok()),
    }
}

#[async_trait]
impl ForkHost for RecordingForkHost {
    async fn merge_upstream(
        &self,
        fork: &RepositoryId,
        branch: &BranchName,
    ) -> Result<MergeUpstream, GitHubError> {
        self.record(Call::MergeUpstream {
            fork: fork.to_string(),
            branch: branch.to_string(),
        });
        let merge_type = if self.script.already_up_to_date {
            MergeType::None
        } else {
            MergeType::FastForward
        };
        scripted(self.script.merge_upstream, || MergeUpstream {
            merge_type,
            message: None,
        })
    }

    async fn branch_head(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
    ) -> Result<CommitSha, GitHubError> {
        self.record(Call::BranchHead {
            repo: repo.to_string(),
            branch: branch.to_string(),
        });
        let sha = self.script.head_sha.clone().unwrap_or_else(|| "abc123".to_string());
        scripted(self.script.branch_head, || CommitSha::new(sha).unwrap())
    }

    async fn create_branch(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
        sha: &CommitSha,
    ) -> Result<BranchRef, GitHubError> {
        self.record(Call::CreateBranch {
            repo: repo.to_string(),
            branch: branch.to_string(),
            sha: sha.to_string(),
        });
        scripted(self.script.create_branch, || BranchRef {
            name: branch.clone(),
            head_sha: sha.clone(),
        })
    }

    async fn create_file(
        &self,
        repo: &RepositoryId,
        plan: &FileCommitPlan,
    ) -> Result<FileCommit, GitHubError> {
        self.record(Call::CreateFile {
            repo: repo.to_string(),
            plan: plan.clone(),
        });
        scripted(self.script.create_file, || FileCommit {
            path: plan.path.clone(),
            commit_sha: CommitSha::new("def456"),
        })
    }

    async fn open_pull_request(
        &self,
        repo: &RepositoryId,
        request: &PullRequestRequest,
    ) -> Result<PullRequest, GitHubError> {
        self.record(Call::OpenPullRequest {
            repo: repo.to_string(),
            request: request.clone(),
        });
        let html_url = format!("https://github.com/{repo}/pull/7");
        scripted(self.script.open_pull_request, || PullRequest {
            number: PullRequestNumber::new(7),
            html_url,
        })
    }
}

pub fn config() -> ForkPrConfig {
    ForkPrConfig::from_parts(
        "https://api.github.com",
        "test-token",
        "forker/storage",
        "origin-org/storage",
        "master",
    )
    .unwrap()
}

pub fn push_event(id: &str) -> PushEvent {
    PushEvent::from_value(
        UniqueId::new(id).unwrap(),
        serde_json::json!({"example_key": "example_value", "count": 3}),
    )
    .unwrap()
}

pub fn artifact_path(id: &str) -> ArtifactPath {
    ArtifactPath::for_push(&UniqueId::new(id).unwrap())
}
