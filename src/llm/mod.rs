//! LLM client module for the chat assistant.
//!
//! Trait-based abstraction over chat-completion providers, with the OpenAI
//! API as the primary implementation. The proxy is a plain request/response
//! pass-through: no retry, no backoff, no streaming.

mod error;
mod openai;

pub use error::{classify_http_status, LlmError, LlmErrorKind};
pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        ChatMessage {
            role,
            content: content.into(),
        }
    }
}

/// Per-request options forwarded to the provider.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Completed chat turn from the provider.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Assistant reply text
    pub content: String,
    /// Model that actually served the request
    pub model: String,
    /// Token usage, when the provider reports it
    pub usage: Option<TokenUsage>,
}

/// A chat-completion provider.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a conversation and return the assistant's reply.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatResponse, LlmError>;

    /// Probe whether the upstream API is reachable with the configured key.
    async fn available(&self) -> bool;
}
