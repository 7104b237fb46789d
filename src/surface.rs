//! Chat surface state
//!
//! Holds the ordered message history, the conversation handle issued by the
//! relay, and the loading/typing flags a front-end renders from. Rendering
//! itself lives in the front-end.
//!
//! A turn has three steps so the flags stay readable while the relay call is
//! in flight: [`ChatSurface::submit`] records the user message and returns a
//! [`PendingTurn`], [`PendingTurn::send`] talks to the relay without borrowing
//! the surface, and [`ChatSurface::finish`] applies the result.

mod client;

pub use client::{HttpRelayClient, RelayClient, SurfaceError};

use crate::api::{ChatRequest, ChatResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Suggested first questions shown before the chat starts
pub const STARTER_MESSAGES: [&str; 4] = [
    "Where's the incident report form?",
    "Can I use my phone when kids are asleep?",
    "What's the rule for trampoline use?",
    "What do I do if a parent doesn't come home?",
];

/// Shown in place of a reply whenever a turn fails
pub const ERROR_REPLY: &str =
    "I'm sorry, I'm having trouble responding right now. Please try again.";

pub const DEFAULT_TYPING_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the chat history; never modified once appended
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            role,
            timestamp: Utc::now(),
        }
    }
}

/// A submitted turn waiting for the relay's answer
#[derive(Debug)]
pub struct PendingTurn {
    request: ChatRequest,
    typing_delay: Duration,
}

impl PendingTurn {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// Call the relay. A successful reply is held back for the typing delay.
    pub async fn send<C: RelayClient + ?Sized>(
        self,
        client: &C,
    ) -> Result<ChatResponse, SurfaceError> {
        let response = client.send(&self.request).await?;
        tokio::time::sleep(self.typing_delay).await;
        Ok(response)
    }
}

pub struct ChatSurface {
    typing_delay: Duration,
    messages: Vec<ChatMessage>,
    thread_id: Option<String>,
    is_loading: bool,
    is_typing: bool,
    has_started_chat: bool,
}

impl Default for ChatSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSurface {
    pub fn new() -> Self {
        Self {
            typing_delay: DEFAULT_TYPING_DELAY,
            messages: Vec::new(),
            thread_id: None,
            is_loading: false,
            is_typing: false,
            has_started_chat: false,
        }
    }

    /// Minimum time the typing indicator stays up before a reply appears
    pub fn with_typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = delay;
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn has_started_chat(&self) -> bool {
        self.has_started_chat
    }

    /// Start a turn with typed input. Returns `None` when the input is ignored.
    ///
    /// Blank input and input arriving while a turn is in flight are ignored.
    pub fn submit(&mut self, input: &str) -> Option<PendingTurn> {
        if input.trim().is_empty() || self.is_loading {
            return None;
        }
        self.has_started_chat = true;
        Some(self.begin_turn(input))
    }

    /// Start a turn with one of [`STARTER_MESSAGES`] by index
    pub fn choose_starter(&mut self, index: usize) -> Option<PendingTurn> {
        let starter = STARTER_MESSAGES.get(index)?;
        if self.is_loading {
            return None;
        }
        self.has_started_chat = true;
        Some(self.begin_turn(starter))
    }

    fn begin_turn(&mut self, text: &str) -> PendingTurn {
        self.messages.push(ChatMessage::new(Role::User, text));
        self.is_loading = true;
        self.is_typing = true;

        PendingTurn {
            request: ChatRequest {
                message: Some(text.to_string()),
                thread_id: self.thread_id.clone(),
            },
            typing_delay: self.typing_delay,
        }
    }

    /// Apply the relay's answer to the turn in flight
    pub fn finish(&mut self, result: Result<ChatResponse, SurfaceError>) {
        match result {
            Ok(response) => {
                if self.thread_id.is_none() && !response.thread_id.is_empty() {
                    tracing::debug!(thread_id = %response.thread_id, "Thread ID set");
                    self.thread_id = Some(response.thread_id);
                }
                self.messages
                    .push(ChatMessage::new(Role::Assistant, response.response));
            }
            Err(e) => {
                tracing::error!(error = %e, "Chat turn failed");
                self.messages.push(ChatMessage::new(Role::Assistant, ERROR_REPLY));
            }
        }

        self.is_typing = false;
        self.is_loading = false;
    }
}
