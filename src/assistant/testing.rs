//! Scripted assistant API for testing the relay without network I/O

use super::types::{MessageContent, TextContent};
use super::{AssistantError, AssistantsApi, Run, RunStatus, Thread, ThreadMessage};
use crate::config::Credentials;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A recorded call against the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateThread,
    AddMessage { thread_id: String, text: String },
    CreateRun { thread_id: String, assistant_id: String },
    GetRun { thread_id: String, run_id: String },
    ListMessages { thread_id: String },
}

/// Which call should fail with a server error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    CreateThread,
    AddMessage,
    CreateRun,
    GetRun,
    ListMessages,
}

/// Mock assistant service with queued run statuses and recorded calls
pub struct MockAssistants {
    thread_id: String,
    run_id: String,
    statuses: Mutex<VecDeque<RunStatus>>,
    /// Status reported once the queue is exhausted
    fallback_status: RunStatus,
    messages: Vec<ThreadMessage>,
    fail_at: Option<FailAt>,
    calls: Mutex<Vec<Call>>,
}

impl MockAssistants {
    pub fn new(thread_id: &str, reply: &str) -> Self {
        Self {
            thread_id: thread_id.to_string(),
            run_id: "run_1".to_string(),
            statuses: Mutex::new(VecDeque::from([RunStatus::Completed])),
            fallback_status: RunStatus::Completed,
            messages: vec![
                assistant_message("msg_2", reply),
                ThreadMessage {
                    id: "msg_1".to_string(),
                    role: "user".to_string(),
                    content: vec![text_segment("earlier")],
                },
            ],
            fail_at: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Report these statuses in order, then `fallback` forever
    pub fn with_statuses(mut self, statuses: &[RunStatus], fallback: RunStatus) -> Self {
        self.statuses = Mutex::new(statuses.iter().copied().collect());
        self.fallback_status = fallback;
        self
    }

    pub fn with_messages(mut self, messages: Vec<ThreadMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn failing_at(mut self, step: FailAt) -> Self {
        self.fail_at = Some(step);
        self
    }

    pub fn recorded_calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, step: FailAt) -> Result<(), AssistantError> {
        if self.fail_at == Some(step) {
            Err(AssistantError::server_error("Internal Server Error"))
        } else {
            Ok(())
        }
    }

    fn run(&self, status: RunStatus) -> Run {
        Run {
            id: self.run_id.clone(),
            status,
            last_error: None,
        }
    }
}

pub fn text_segment(value: &str) -> MessageContent {
    MessageContent::Text {
        text: TextContent {
            value: value.to_string(),
        },
    }
}

pub fn assistant_message(id: &str, text: &str) -> ThreadMessage {
    ThreadMessage {
        id: id.to_string(),
        role: "assistant".to_string(),
        content: vec![text_segment(text)],
    }
}

#[async_trait]
impl AssistantsApi for MockAssistants {
    async fn create_thread(&self, _creds: &Credentials) -> Result<Thread, AssistantError> {
        self.record(Call::CreateThread);
        self.check(FailAt::CreateThread)?;
        Ok(Thread {
            id: self.thread_id.clone(),
        })
    }

    async fn add_message(
        &self,
        _creds: &Credentials,
        thread_id: &str,
        text: &str,
    ) -> Result<(), AssistantError> {
        self.record(Call::AddMessage {
            thread_id: thread_id.to_string(),
            text: text.to_string(),
        });
        self.check(FailAt::AddMessage)
    }

    async fn create_run(&self, creds: &Credentials, thread_id: &str) -> Result<Run, AssistantError> {
        self.record(Call::CreateRun {
            thread_id: thread_id.to_string(),
            assistant_id: creds.assistant_id.clone(),
        });
        self.check(FailAt::CreateRun)?;
        Ok(self.run(RunStatus::Queued))
    }

    async fn get_run(
        &self,
        _creds: &Credentials,
        thread_id: &str,
        run_id: &str,
    ) -> Result<Run, AssistantError> {
        self.record(Call::GetRun {
            thread_id: thread_id.to_string(),
            run_id: run_id.to_string(),
        });
        self.check(FailAt::GetRun)?;
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback_status);
        Ok(self.run(status))
    }

    async fn list_messages(
        &self,
        _creds: &Credentials,
        thread_id: &str,
    ) -> Result<Vec<ThreadMessage>, AssistantError> {
        self.record(Call::ListMessages {
            thread_id: thread_id.to_string(),
        });
        self.check(FailAt::ListMessages)?;
        Ok(self.messages.clone())
    }
}
