use async_trait::async_trait;
use pipeline::{
    BranchName, BranchRef, CommitSha, ContentEncoding, FileCommit, FileCommitPlan,
    ForkHost, ForkPrConfig, GitHubError, MergeType, MergeUpstream, PullRequest, PullRequestNumber,
    ForkPrError, PullRequestRequest, RepositoryId,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::encoding::encode_content;
use crate::wire::{
    CreateFileBody, CreateFileResponse, CreatePullBody, CreateRefBody, MergeUpstreamBody,
    MergeUpstreamResponse, PullResponse, RefResponse,
};

/// Media type requested on every call.
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// `User-Agent` sent on every call; GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("forkpr/", env!("CARGO_PKG_VERSION"));

/// [`ForkHost`] over the GitHub REST API.
///
/// Holds no state between calls beyond the configured HTTP client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_base_url: Url,
    encoding: ContentEncoding,
}

impl GithubClient {
    /// Builds a client authenticated with `config.token`.
    pub fn new(config: &ForkPrConfig) -> Result<Self, ForkPrError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token.expose()))
            .map_err(|_| ForkPrError::ConfigurationError {
                message: "API token contains characters not allowed in a header".to_string(),
            })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ForkPrError::ConfigurationError {
                message: format!("cannot build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            api_base_url: config.api_base_url.clone(),
            encoding: config.content_encoding,
        })
    }

    /// Returns the encoding applied to file content.
    pub fn content_encoding(&self) -> ContentEncoding {
        self.encoding
    }

    /// Builds `<base>/repos/<owner>/<repo>/<tail...>`.
    ///
    /// Each tail element may contain `/`; the pieces between slashes are
    /// percent-encoded as individual path segments. `.` and `..` pieces are
    /// rejected since the URL parser would silently collapse them.
    fn repo_url(&self, repo: &RepositoryId, tail: &[&str]) -> Result<Url, GitHubError> {
        if let Some(part) = tail
            .iter()
            .find(|part| part.split('/').any(|piece| matches!(piece, "." | "..")))
        {
            return Err(GitHubError::InvalidPath {
                path: part.to_string(),
            });
        }
        let mut url = self.api_base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| GitHubError::Transport {
                message: format!("API base URL '{}' cannot carry a path", self.api_base_url),
            })?;
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner(), repo.name()])
                .extend(tail.iter().flat_map(|part| part.split('/')));
        }
        Ok(url)
    }

    /// Sends `request`, requires `expected`, and decodes the JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
    ) -> Result<T, GitHubError> {
        let body = self.send_expecting(request, expected).await?;
        serde_json::from_str(&body).map_err(|e| GitHubError::InvalidResponse {
            message: format!("{e}; body: {body}"),
        })
    }

    /// Sends `request` and requires `expected`, returning the raw body.
    async fn send_expecting(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
    ) -> Result<String, GitHubError> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        debug!(status = status.as_u16(), "GitHub response received");

        if status != expected {
            return Err(GitHubError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// Decodes the body of a call whose status already confirmed success.
///
/// A body of another shape is logged and yields `None`.
fn decode_lenient<T: DeserializeOwned>(body: &str) -> Option<T> {
    match serde_json::from_str(body) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, %body, "Ignoring unexpected response body");
            None
        }
    }
}

fn transport(e: reqwest::Error) -> GitHubError {
    GitHubError::Transport {
        message: e.to_string(),
    }
}

#[async_trait]
impl ForkHost for GithubClient {
    async fn merge_upstream(
        &self,
        fork: &RepositoryId,
        branch: &BranchName,
    ) -> Result<MergeUpstream, GitHubError> {
        let url = self.repo_url(fork, &["merge-upstream"])?;
        debug!(%url, "POST merge-upstream");
        let body = MergeUpstreamBody {
            branch: branch.as_str(),
        };
        let raw = self
            .send_expecting(self.http.post(url).json(&body), StatusCode::OK)
            .await?;
        let response: MergeUpstreamResponse = decode_lenient(&raw).unwrap_or_default();
        Ok(MergeUpstream {
            merge_type: response.merge_type.unwrap_or(MergeType::Unknown),
            message: response.message,
        })
    }

    async fn branch_head(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
    ) -> Result<CommitSha, GitHubError> {
        let url = self.repo_url(repo, &["git", "ref", "heads", branch.as_str()])?;
        debug!(%url, "GET ref");
        let response: RefResponse = self.send(self.http.get(url), StatusCode::OK).await?;
        CommitSha::new(response.object.sha).ok_or_else(|| GitHubError::InvalidResponse {
            message: "ref response carried an empty object.sha".to_string(),
        })
    }

    async fn create_branch(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
        sha: &CommitSha,
    ) -> Result<BranchRef, GitHubError> {
        let url = self.repo_url(repo, &["git", "refs"])?;
        debug!(%url, branch = %branch, "POST ref");
        let git_ref = branch.to_ref();
        let body = CreateRefBody {
            git_ref: &git_ref,
            sha: sha.as_str(),
        };
        let raw = self
            .send_expecting(self.http.post(url).json(&body), StatusCode::CREATED)
            .await?;
        let head_sha = decode_lenient::<RefResponse>(&raw)
            .and_then(|response| CommitSha::new(response.object.sha))
            .unwrap_or_else(|| sha.clone());
        Ok(BranchRef {
            name: branch.clone(),
            head_sha,
        })
    }

    async fn create_file(
        &self,
        repo: &RepositoryId,
        plan: &FileCommitPlan,
    ) -> Result<FileCommit, GitHubError> {
        let url = self.repo_url(repo, &["contents", plan.path.as_str()])?;
        debug!(%url, branch = %plan.target_branch, encoding = %self.encoding, "PUT contents");
        let content = encode_content(self.encoding, &plan.content);
        let body = CreateFileBody {
            message: &plan.message,
            content: &content,
            branch: plan.target_branch.as_str(),
        };
        let raw = self
            .send_expecting(self.http.put(url).json(&body), StatusCode::CREATED)
            .await?;
        let response: CreateFileResponse = decode_lenient(&raw).unwrap_or_default();
        Ok(FileCommit {
            path: plan.path.clone(),
            commit_sha: response.commit.and_then(|c| CommitSha::new(c.sha)),
        })
    }

    async fn open_pull_request(
        &self,
        repo: &RepositoryId,
        request: &PullRequestRequest,
    ) -> Result<PullRequest, GitHubError> {
        let url = self.repo_url(repo, &["pulls"])?;
        debug!(%url, head = %request.head, "POST pulls");
        let body = CreatePullBody {
            title: &request.title,
            head: &request.head,
            base: request.base.as_str(),
            body: &request.body,
        };
        let response: PullResponse = self
            .send(self.http.post(url).json(&body), StatusCode::CREATED)
            .await?;
        Ok(PullRequest {
            number: PullRequestNumber::new(response.number),
            html_url: response.html_url,
        })
    }
}
