//! Summarization client capability.
//!
//! The completion endpoint is a black box that takes chat messages
//! and returns structured content plus token usage. One trait, one
//! production implementation; the tokenizer capability is exposed as
//! `count_tokens` so index building can size artifacts without a
//! round trip.

pub mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::TokenUsage;

/// One chat message sent to the completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Reply from a chat completion call
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub content: String,
    pub usage: TokenUsage,
}

/// Structured summary of a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub usage: TokenUsage,
    pub response: String,
}

const MINUTES_SYSTEM_PROMPT: &str = "You are a data analyst working for a city \
municipality. The municipality records minutes of its meetings across \
departments such as Planning Commission, Zoning, Land Use, Community \
Development and Urban Planning.";

const MINUTES_USER_PROMPT: &str = "Process the following meeting minutes and \
return a JSON array with one object per item discussed. Each object has the \
keys: index, address, city, state, zipcode, party, status (APPROVED, DENIED \
or PENDING), remarks, and summary. Wrap the array in an object of the form \
{\"columns\": [...], \"response\": [...]} where columns describes each key. \
Respond with strictly a JSON object and no explanation.";

/// Substituted when the model returns empty content
const EMPTY_REPLY_FALLBACK: &str = "I apologize, but I am having difficulty \
providing a detailed description of this document. The document quality or \
content may be challenging to interpret accurately. Please provide additional \
guidance or consider uploading a clearer document.";

/// Capability interface over the LLM completion service
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Raw chat completion call
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
        json_response: bool,
    ) -> Result<ChatReply>;

    /// Tokenizer capability: size of `text` in completion tokens
    fn count_tokens(&self, text: &str) -> usize;

    /// Completion token budget for summarization calls
    fn max_completion_tokens(&self) -> u32 {
        10_000
    }

    /// Summarize meeting minutes into structured rows
    async fn summarize_minutes(&self, text: &str) -> Result<Summary> {
        let messages = [
            ChatMessage::system(MINUTES_SYSTEM_PROMPT),
            ChatMessage::user(MINUTES_USER_PROMPT),
            ChatMessage::user(text),
        ];

        let reply = self
            .chat_completion(&messages, self.max_completion_tokens(), true)
            .await?;

        let response = if reply.content.trim().is_empty() {
            EMPTY_REPLY_FALLBACK.to_string()
        } else {
            reply.content.trim().to_string()
        };

        Ok(Summary {
            usage: reply.usage,
            response,
        })
    }
}
