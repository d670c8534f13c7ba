//! Chat-completion collaborator for the generative answering backend.
//!
//! Sends a system instruction plus the user's query as a two-turn chat to
//! an OpenAI-compatible `/v1/chat/completions` endpoint, with a bounded
//! output length and a fixed sampling temperature.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::CompletionConfig;
use crate::error::CollaboratorError;

/// A text-generation service consumed as an opaque collaborator.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Generate text for a `(system, user)` turn pair.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, CollaboratorError>;
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat-completion endpoint.
///
/// Requires the `OPENAI_API_KEY` environment variable.
pub struct RemoteCompletion {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl RemoteCompletion {
    pub fn new(config: &CompletionConfig) -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl CompletionModel for RemoteCompletion {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, CollaboratorError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CollaboratorError::from_reqwest("completion", self.timeout_secs, e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Api {
                service: "completion",
                status: status.as_u16(),
                body: body_text,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Malformed {
                service: "completion",
                detail: e.to_string(),
            })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CollaboratorError::Malformed {
                service: "completion",
                detail: "no choices in response".to_string(),
            })?;

        Ok(text.trim().to_string())
    }
}
