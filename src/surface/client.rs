//! Client side of the relay endpoint

use crate::api::{ChatRequest, ChatResponse, ErrorResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The relay could not be reached or answered with garbage
    #[error("transport error: {0}")]
    Transport(String),

    /// The relay answered with an error status
    #[error("{0}")]
    Relay(String),
}

/// Sends one chat turn to the relay
#[async_trait]
pub trait RelayClient: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, SurfaceError>;
}

#[async_trait]
impl<T: RelayClient + ?Sized> RelayClient for Arc<T> {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, SurfaceError> {
        (**self).send(request).await
    }
}

/// Relay client posting JSON to `{base}/api/chat`
pub struct HttpRelayClient {
    client: Client,
    endpoint: String,
}

impl HttpRelayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, SurfaceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| SurfaceError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SurfaceError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| "Failed to get response".to_string());
            return Err(SurfaceError::Relay(message));
        }

        serde_json::from_str(&body).map_err(|e| SurfaceError::Transport(e.to_string()))
    }
}
