//! Top-level error type for the forkpr pipeline domain.
//!
//! [`ForkPrError`] covers conditions detected before any remote call is made:
//! invalid configuration and malformed push events. Failures reported by the
//! remote service are [`crate::github::GitHubError`]s and never escape the
//! executor; the step nodes turn them into [`crate::StepOutcome`]s.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that prevent a pipeline run from starting.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForkPrError {
    /// The runtime configuration is invalid.
    ///
    /// Produced at load time; the pipeline never starts with an invalid config.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },

    /// The push event supplied by the caller cannot be published.
    #[error("Invalid push event: {reason}")]
    InvalidPushEvent {
        /// Why the event was rejected.
        reason: String,
    },

    /// The payload could not be rendered as JSON text.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Serializer error message.
        message: String,
    },
}
