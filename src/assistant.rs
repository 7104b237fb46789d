//! Hosted assistant API abstraction
//!
//! The relay talks to the remote service only through [`AssistantsApi`], so
//! tests can substitute a scripted implementation.

mod error;
mod openai;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use error::{AssistantError, AssistantErrorKind};
pub use openai::OpenAIAssistants;
pub use types::{MessageContent, Run, RunError, RunStatus, TextContent, Thread, ThreadMessage};

use crate::config::Credentials;
use async_trait::async_trait;
use std::sync::Arc;

/// The five remote calls one relay turn is built from
#[async_trait]
pub trait AssistantsApi: Send + Sync {
    /// Create an empty thread
    async fn create_thread(&self, creds: &Credentials) -> Result<Thread, AssistantError>;

    /// Append a user-authored text message to a thread
    async fn add_message(
        &self,
        creds: &Credentials,
        thread_id: &str,
        text: &str,
    ) -> Result<(), AssistantError>;

    /// Start a run of the configured assistant on a thread
    async fn create_run(&self, creds: &Credentials, thread_id: &str) -> Result<Run, AssistantError>;

    /// Fetch the current state of a run
    async fn get_run(
        &self,
        creds: &Credentials,
        thread_id: &str,
        run_id: &str,
    ) -> Result<Run, AssistantError>;

    /// List a thread's messages, newest first
    async fn list_messages(
        &self,
        creds: &Credentials,
        thread_id: &str,
    ) -> Result<Vec<ThreadMessage>, AssistantError>;
}

#[async_trait]
impl<T: AssistantsApi + ?Sized> AssistantsApi for Arc<T> {
    async fn create_thread(&self, creds: &Credentials) -> Result<Thread, AssistantError> {
        (**self).create_thread(creds).await
    }

    async fn add_message(
        &self,
        creds: &Credentials,
        thread_id: &str,
        text: &str,
    ) -> Result<(), AssistantError> {
        (**self).add_message(creds, thread_id, text).await
    }

    async fn create_run(&self, creds: &Credentials, thread_id: &str) -> Result<Run, AssistantError> {
        (**self).create_run(creds, thread_id).await
    }

    async fn get_run(
        &self,
        creds: &Credentials,
        thread_id: &str,
        run_id: &str,
    ) -> Result<Run, AssistantError> {
        (**self).get_run(creds, thread_id, run_id).await
    }

    async fn list_messages(
        &self,
        creds: &Credentials,
        thread_id: &str,
    ) -> Result<Vec<ThreadMessage>, AssistantError> {
        (**self).list_messages(creds, thread_id).await
    }
}

/// Logging wrapper for assistant API implementations
pub struct LoggingAssistants {
    inner: Arc<dyn AssistantsApi>,
}

impl LoggingAssistants {
    pub fn new(inner: Arc<dyn AssistantsApi>) -> Self {
        Self { inner }
    }

    fn record<T>(op: &'static str, start: std::time::Instant, result: &Result<T, AssistantError>) {
        let duration = start.elapsed();
        match result {
            Ok(_) => {
                tracing::debug!(
                    op,
                    duration_ms = %duration.as_millis(),
                    "Assistant API call completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    op,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Assistant API call failed"
                );
            }
        }
    }
}

#[async_trait]
impl AssistantsApi for LoggingAssistants {
    async fn create_thread(&self, creds: &Credentials) -> Result<Thread, AssistantError> {
        let start = std::time::Instant::now();
        let result = self.inner.create_thread(creds).await;
        Self::record("create_thread", start, &result);
        result
    }

    async fn add_message(
        &self,
        creds: &Credentials,
        thread_id: &str,
        text: &str,
    ) -> Result<(), AssistantError> {
        let start = std::time::Instant::now();
        let result = self.inner.add_message(creds, thread_id, text).await;
        Self::record("add_message", start, &result);
        result
    }

    async fn create_run(&self, creds: &Credentials, thread_id: &str) -> Result<Run, AssistantError> {
        let start = std::time::Instant::now();
        let result = self.inner.create_run(creds, thread_id).await;
        Self::record("create_run", start, &result);
        result
    }

    async fn get_run(
        &self,
        creds: &Credentials,
        thread_id: &str,
        run_id: &str,
    ) -> Result<Run, AssistantError> {
        let start = std::time::Instant::now();
        let result = self.inner.get_run(creds, thread_id, run_id).await;
        Self::record("get_run", start, &result);
        result
    }

    async fn list_messages(
        &self,
        creds: &Credentials,
        thread_id: &str,
    ) -> Result<Vec<ThreadMessage>, AssistantError> {
        let start = std::time::Instant::now();
        let result = self.inner.list_messages(creds, thread_id).await;
        Self::record("list_messages", start, &result);
        result
    }
}
