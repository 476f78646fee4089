//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::llm::{ChatMessage, TokenUsage};
use crate::store::TaskPatch;

/// Machine-readable error body returned by every 4xx/5xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Request to create a new task.
///
/// Unrecognized fields are ignored; a missing title is treated the same as
/// an empty one.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
}

/// Request to update an existing task.
///
/// `title` and `completed` are each optional and applied independently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(req: UpdateTaskRequest) -> Self {
        TaskPatch {
            title: req.title,
            completed: req.completed,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Service version
    pub version: String,

    /// Deployment environment
    pub environment: String,
}

/// Upstream API status response.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Whether the chat completion API is reachable
    pub api_available: bool,

    /// Deployment environment
    pub environment: String,

    /// Configured completion token ceiling
    pub max_tokens: u32,
}

/// Request to the chat assistant.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,

    /// Optional model override (falls back to the configured default)
    pub model: Option<String>,

    /// Completion token cap for this request
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 - 2.0)
    pub temperature: Option<f32>,
}

/// Reply from the chat assistant.
#[derive(Debug, Clone, Serialize)]
pub struct ChatApiResponse {
    /// Assistant reply text
    pub response: String,

    /// Model that served the request
    pub model: String,

    /// Token usage, when the provider reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}
