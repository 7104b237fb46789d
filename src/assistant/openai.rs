//! `OpenAI` Assistants v2 implementation over HTTP

use super::types::{
    CreateMessageRequest, CreateRunRequest, ErrorResponse, InputContent, ListResponse, Run,
    Thread, ThreadMessage,
};
use super::{AssistantError, AssistantsApi};
use crate::config::Credentials;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

const BETA_HEADER: &str = "OpenAI-Beta";
const BETA_VALUE: &str = "assistants=v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Assistants API client using a shared connection pool
pub struct OpenAIAssistants {
    client: Client,
    base_url: String,
}

impl OpenAIAssistants {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, creds: &Credentials, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .bearer_auth(&creds.api_key)
            .header(BETA_HEADER, BETA_VALUE)
    }

    fn post(&self, creds: &Credentials, path: &str) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .bearer_auth(&creds.api_key)
            .header(BETA_HEADER, BETA_VALUE)
            .header("Content-Type", "application/json")
    }

    /// Send a request and return the raw body of a successful response
    async fn send(request: RequestBuilder) -> Result<String, AssistantError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AssistantError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                AssistantError::network(format!("Connection failed: {e}"))
            } else {
                AssistantError::unknown(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AssistantError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .map(|resp| resp.error.message);
            return Err(AssistantError::from_status(status, detail.as_deref()));
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, AssistantError> {
        let body = Self::send(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            AssistantError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })
    }
}

#[async_trait]
impl AssistantsApi for OpenAIAssistants {
    async fn create_thread(&self, creds: &Credentials) -> Result<Thread, AssistantError> {
        Self::send_json(self.post(creds, "/threads")).await
    }

    async fn add_message(
        &self,
        creds: &Credentials,
        thread_id: &str,
        text: &str,
    ) -> Result<(), AssistantError> {
        let body = CreateMessageRequest {
            role: "user",
            content: vec![InputContent::Text { text }],
        };
        let request = self
            .post(creds, &format!("/threads/{thread_id}/messages"))
            .json(&body);

        Self::send(request).await.map(|_| ())
    }

    async fn create_run(&self, creds: &Credentials, thread_id: &str) -> Result<Run, AssistantError> {
        let body = CreateRunRequest {
            assistant_id: &creds.assistant_id,
        };
        let request = self
            .post(creds, &format!("/threads/{thread_id}/runs"))
            .json(&body);

        Self::send_json(request).await
    }

    async fn get_run(
        &self,
        creds: &Credentials,
        thread_id: &str,
        run_id: &str,
    ) -> Result<Run, AssistantError> {
        Self::send_json(self.get(creds, &format!("/threads/{thread_id}/runs/{run_id}"))).await
    }

    async fn list_messages(
        &self,
        creds: &Credentials,
        thread_id: &str,
    ) -> Result<Vec<ThreadMessage>, AssistantError> {
        let list: ListResponse<ThreadMessage> =
            Self::send_json(self.get(creds, &format!("/threads/{thread_id}/messages"))).await?;
        Ok(list.data)
    }
}
