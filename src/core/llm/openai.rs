//! OpenAI-compatible chat completion client.
//!
//! Speaks the `/chat/completions` wire format over reqwest. Token
//! counting uses the ~4 characters per token estimate; the exact
//! tokenizer is not linked and the index builder only needs counts
//! that grow monotonically with the text.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::error::{GavelError, Result};
use crate::core::llm::{ChatMessage, ChatReply, SummarizationClient};
use crate::core::types::TokenUsage;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Production client for an OpenAI-compatible completion endpoint
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(base_url: String, api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            max_tokens,
        }
    }

    /// Build a client from config, reading the key from
    /// `GAVEL_OPENAI_API_KEY`
    pub fn from_config(config: &crate::core::config::LlmConfig) -> Self {
        let api_key = std::env::var("GAVEL_OPENAI_API_KEY").unwrap_or_default();
        Self::new(
            config.base_url.clone(),
            api_key,
            config.model.clone(),
            config.max_tokens,
        )
    }
}

#[async_trait]
impl SummarizationClient for OpenAiClient {
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
        json_response: bool,
    ) -> Result<ChatReply> {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": max_tokens,
        });
        if json_response {
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| GavelError::Upstream(format!("Completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GavelError::Upstream(format!(
                "Completion endpoint returned {status}: {detail}"
            )));
        }

        let parsed: ApiResponse = response
            .json()
            .await
            .map_err(|e| GavelError::Upstream(format!("Malformed completion response: {e}")))?;

        let usage = parsed.usage.unwrap_or_default();
        tracing::debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Completion usage"
        );

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(ChatReply { content, usage })
    }

    fn count_tokens(&self, text: &str) -> usize {
        estimate_tokens(text)
    }

    fn max_completion_tokens(&self) -> u32 {
        self.max_tokens
    }
}

/// Rough token estimate: ~4 characters per token, rounded up
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}
