//! Remote chat-completions provider
//!
//! Credentialed HTTP API in the OpenRouter/OpenAI chat-completions shape.
//! There is no process to manage: `start` is a no-op, and construction
//! fails fast when no usable credential is supplied.

use crate::{LlmError, Provider, QUERY_TIMEOUT};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Default remote endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1";

/// Default remote model.
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";

/// Output-token cap for a value-extraction reply.
const MAX_OUTPUT_TOKENS: u32 = 500;

/// Provider backed by a remote chat-completions API.
pub struct RemoteProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Deserialize)]
struct ChatContent {
    content: String,
}

impl RemoteProvider {
    /// Create a provider. Fails with [`LlmError::ApiKeyMissing`] when the
    /// credential is empty after trimming.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(LlmError::ApiKeyMissing);
        }
        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            client: reqwest::Client::new(),
        })
    }

    /// Create a provider reading the credential from a plain-text file.
    pub fn from_key_file(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        key_file: &Path,
    ) -> Result<Self, LlmError> {
        let api_key = fs::read_to_string(key_file).map_err(|source| LlmError::KeyFile {
            path: key_file.to_path_buf(),
            source,
        })?;
        Self::new(endpoint, model, api_key)
    }
}

#[async_trait]
impl Provider for RemoteProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn start(&mut self) -> Result<(), LlmError> {
        // Nothing to bring up; the credential was validated at construction.
        Ok(())
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.1,
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        debug!("sending chat-completions request to {url}");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "http://localhost")
            .header("X-Title", "Gleaner")
            .timeout(QUERY_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(300)
                .collect();
            return Err(LlmError::Status { status, body });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("no choices in reply".to_string()))?;
        Ok(choice.message.content)
    }

    async fn stop(&mut self) {}
}
