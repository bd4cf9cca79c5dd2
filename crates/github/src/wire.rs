//! Request and response bodies exchanged with the GitHub REST API.
//!
//! Only the fields the pipeline consumes are modelled; everything else in the
//! responses is ignored.

use pipeline::MergeType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct MergeUpstreamBody<'a> {
    pub branch: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MergeUpstreamResponse {
    #[serde(default)]
    pub merge_type: Option<MergeType>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    pub git_ref: &'a str,
    pub sha: &'a str,
}

/// Shape shared by the get-ref and create-ref responses.
#[derive(Debug, Deserialize)]
pub(crate) struct RefResponse {
    pub object: RefObject,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefObject {
    pub sha: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateFileBody<'a> {
    pub message: &'a str,
    pub content: &'a str,
    pub branch: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CreateFileResponse {
    #[serde(default)]
    pub commit: Option<CommitInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitInfo {
    pub sha: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePullBody<'a> {
    pub title: &'a str,
    pub head: &'a str,
    pub base: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PullResponse {
    pub number: u64,
    pub html_url: String,
}
