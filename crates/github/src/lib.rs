//! forkpr GitHub infrastructure adapter.
//!
//! Implements the [`pipeline::ForkHost`] port over the GitHub REST API with
//! [`reqwest`]. One trait method is one HTTP call; nothing is retried.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! URL construction, headers, wire shapes, status checks, and the content
//! encoding for the contents endpoint live here; the [`pipeline`] crate never
//! sees them.
//!
//! ## Endpoints
//!
//! | Operation | Request | Expected status |
//! |-----------|---------|-----------------|
//! | `merge_upstream` | `POST /repos/{owner}/{repo}/merge-upstream` | 200 |
//! | `branch_head` | `GET /repos/{owner}/{repo}/git/ref/heads/{branch}` | 200 |
//! | `create_branch` | `POST /repos/{owner}/{repo}/git/refs` | 201 |
//! | `create_file` | `PUT /repos/{owner}/{repo}/contents/{path}` | 201 |
//! | `open_pull_request` | `POST /repos/{owner}/{repo}/pulls` | 201 |

mod client;
mod encoding;
mod wire;

pub use client::{GithubClient, GITHUB_ACCEPT, USER_AGENT};
pub use encoding::encode_content;
