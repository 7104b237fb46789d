//! Conversation relay
//!
//! One call to [`Relay::respond`] is one chat turn: ensure a thread exists,
//! post the user's message, start a run, poll it to a terminal status, then
//! read the newest message on the thread as the reply.

mod error;

pub use error::RelayError;

use crate::assistant::{AssistantsApi, RunStatus};
use crate::config::{AssistantConfig, Credentials, PollPolicy};
use std::sync::Arc;

/// Posted in place of an empty message
pub const FALLBACK_MESSAGE: &str = "Hello, I need help with babysitting services";

/// Reply text and the thread it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub reply: String,
    pub thread_id: String,
}

pub struct Relay {
    config: AssistantConfig,
    api: Arc<dyn AssistantsApi>,
}

impl Relay {
    pub fn new(config: AssistantConfig, api: Arc<dyn AssistantsApi>) -> Self {
        Self { config, api }
    }

    /// Run one chat turn against the remote assistant.
    ///
    /// Every step is attempted once; the first failure ends the turn.
    pub async fn respond(
        &self,
        message: Option<&str>,
        thread_id: Option<&str>,
    ) -> Result<RelayReply, RelayError> {
        let creds = self
            .config
            .credentials()
            .map_err(|e| RelayError::Config(e.to_string()))?;

        tracing::info!(assistant_id = %creds.assistant_id, "Generating response");

        let thread_id = match thread_id.filter(|id| !id.is_empty()) {
            Some(id) => {
                tracing::info!(thread_id = %id, "Using existing thread");
                id.to_string()
            }
            None => {
                let thread = self
                    .api
                    .create_thread(&creds)
                    .await
                    .map_err(RelayError::upstream("create thread"))?;
                tracing::info!(thread_id = %thread.id, "Created new thread");
                thread.id
            }
        };

        let text = message.filter(|m| !m.is_empty()).unwrap_or(FALLBACK_MESSAGE);
        self.api
            .add_message(&creds, &thread_id, text)
            .await
            .map_err(RelayError::upstream("add message"))?;
        tracing::debug!(thread_id = %thread_id, "Message added to thread");

        let run = self
            .api
            .create_run(&creds, &thread_id)
            .await
            .map_err(RelayError::upstream("create run"))?;
        tracing::info!(thread_id = %thread_id, run_id = %run.id, "Created run");

        self.wait_for_completion(&creds, &thread_id, &run.id).await?;

        let reply = self.latest_reply(&creds, &thread_id).await?;
        tracing::info!(thread_id = %thread_id, reply_len = reply.len(), "Generated response");

        Ok(RelayReply { reply, thread_id })
    }

    /// Poll the run until it completes, fails, or the attempt ceiling is hit
    async fn wait_for_completion(
        &self,
        creds: &Credentials,
        thread_id: &str,
        run_id: &str,
    ) -> Result<(), RelayError> {
        let PollPolicy {
            interval,
            max_attempts,
        } = self.config.poll;

        for attempt in 1..=max_attempts {
            let run = self
                .api
                .get_run(creds, thread_id, run_id)
                .await
                .map_err(RelayError::upstream("check run status"))?;

            tracing::debug!(run_id, attempt, status = run.status.as_str(), "Run status");

            match run.status {
                RunStatus::Completed => return Ok(()),
                RunStatus::Failed => {
                    let detail = run.failure_detail();
                    tracing::warn!(run_id, detail = ?detail, "Run failed");
                    return Err(RelayError::RunFailed { detail });
                }
                _ if attempt < max_attempts => tokio::time::sleep(interval).await,
                _ => {}
            }
        }

        tracing::warn!(run_id, attempts = max_attempts, "Run did not complete in time");
        Err(RelayError::Timeout {
            attempts: max_attempts,
        })
    }

    async fn latest_reply(&self, creds: &Credentials, thread_id: &str) -> Result<String, RelayError> {
        let messages = self
            .api
            .list_messages(creds, thread_id)
            .await
            .map_err(RelayError::upstream("get messages"))?;

        messages
            .first()
            .and_then(|m| m.first_text())
            .map(str::to_string)
            .ok_or(RelayError::EmptyReply)
    }
}
