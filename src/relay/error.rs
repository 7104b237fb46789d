//! Relay error types

use crate::assistant::AssistantError;
use thiserror::Error;

/// Why a relay turn did not produce a reply
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing credentials; raised before any network call
    #[error("{0}")]
    Config(String),

    /// The remote service returned a non-success response
    #[error("Failed to {step}: {source}")]
    Upstream {
        step: &'static str,
        #[source]
        source: AssistantError,
    },

    /// The run reached the `failed` status
    #[error("Assistant run failed")]
    RunFailed { detail: Option<String> },

    /// The run did not complete within the polling ceiling
    #[error("Assistant response timeout")]
    Timeout { attempts: u32 },

    /// The run completed but the thread held no text to return
    #[error("Assistant returned no reply")]
    EmptyReply,
}

impl RelayError {
    pub fn upstream(step: &'static str) -> impl FnOnce(AssistantError) -> Self {
        move |source| Self::Upstream { step, source }
    }

    /// Short label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Upstream { .. } => "upstream",
            Self::RunFailed { .. } => "run_failed",
            Self::Timeout { .. } => "timeout",
            Self::EmptyReply => "empty_reply",
        }
    }
}
