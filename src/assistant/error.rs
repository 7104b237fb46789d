//! Assistants API error types

use reqwest::StatusCode;
use thiserror::Error;

/// Error from a single Assistants API call, with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AssistantError {
    pub kind: AssistantErrorKind,
    pub message: String,
}

impl AssistantError {
    pub fn new(kind: AssistantErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Network, message)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::RateLimit, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::ServerError, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Auth, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::InvalidRequest, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Unknown, message)
    }

    /// Classify a non-success HTTP status.
    ///
    /// `detail` is the remote error message when the body carried one.
    pub fn from_status(status: StatusCode, detail: Option<&str>) -> Self {
        let reason = status.canonical_reason().unwrap_or("Unknown Status");
        let message = match detail {
            Some(detail) => format!("{reason}: {detail}"),
            None => reason.to_string(),
        };

        match status.as_u16() {
            401 | 403 => Self::auth(message),
            429 => Self::rate_limit(message),
            400 | 404 => Self::invalid_request(message),
            500..=599 => Self::server_error(message),
            _ => Self::unknown(format!("HTTP {}: {message}", status.as_u16())),
        }
    }
}

/// Error classification, used for logging only since the relay never retries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantErrorKind {
    /// Connection failures, timeouts, unreadable bodies
    Network,
    /// Rate limited (429)
    RateLimit,
    /// Server error (5xx)
    ServerError,
    /// Authentication failed (401, 403)
    Auth,
    /// Bad request or unknown thread/run (400, 404)
    InvalidRequest,
    /// Anything else, including unparseable responses
    Unknown,
}

impl AssistantErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::RateLimit => "rate_limit",
            Self::ServerError => "server_error",
            Self::Auth => "auth",
            Self::InvalidRequest => "invalid_request",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            AssistantError::from_status(StatusCode::UNAUTHORIZED, None).kind,
            AssistantErrorKind::Auth
        );
        assert_eq!(
            AssistantError::from_status(StatusCode::TOO_MANY_REQUESTS, None).kind,
            AssistantErrorKind::RateLimit
        );
        assert_eq!(
            AssistantError::from_status(StatusCode::NOT_FOUND, None).kind,
            AssistantErrorKind::InvalidRequest
        );
        assert_eq!(
            AssistantError::from_status(StatusCode::BAD_GATEWAY, None).kind,
            AssistantErrorKind::ServerError
        );
        assert_eq!(
            AssistantError::from_status(StatusCode::IM_A_TEAPOT, None).kind,
            AssistantErrorKind::Unknown
        );
    }

    #[test]
    fn test_status_message_includes_remote_detail() {
        let err = AssistantError::from_status(StatusCode::UNAUTHORIZED, Some("Incorrect API key"));
        assert_eq!(err.to_string(), "Unauthorized: Incorrect API key");

        let err = AssistantError::from_status(StatusCode::INTERNAL_SERVER_ERROR, None);
        assert_eq!(err.to_string(), "Internal Server Error");
    }
}
