//! Chat assistant endpoint.
//!
//! Proxies validated conversations to the configured completion API. One
//! request upstream per request in, no retry or backoff.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    Json,
};

use crate::llm::ChatOptions;

use super::routes::AppState;
use super::types::{ChatApiResponse, ChatRequest, ErrorResponse};

const MAX_MESSAGES: usize = 50;
const MAX_CONTENT_CHARS: usize = 10_000;

/// Models accepted from clients; anything else falls back to the default.
const KNOWN_MODELS: &[&str] = &[
    "gpt-3.5-turbo",
    "gpt-4",
    "gpt-4-turbo",
    "gpt-4o",
    "gpt-4o-mini",
];

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

/// Validate an incoming chat request against the configured limits.
fn validate(req: &ChatRequest, max_tokens_ceiling: u32) -> Result<(), ApiError> {
    if req.messages.is_empty() {
        return Err(bad_request("At least one message is required"));
    }
    if req.messages.len() > MAX_MESSAGES {
        return Err(bad_request("Too many messages in conversation"));
    }
    for msg in &req.messages {
        if msg.content.is_empty() || msg.content.chars().count() > MAX_CONTENT_CHARS {
            return Err(bad_request("Message content must be 1-10000 characters"));
        }
    }
    if let Some(max_tokens) = req.max_tokens {
        if max_tokens == 0 || max_tokens > max_tokens_ceiling {
            return Err(bad_request("max_tokens is out of range"));
        }
    }
    if let Some(temperature) = req.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(bad_request("temperature must be between 0 and 2"));
        }
    }
    Ok(())
}

/// Resolve the model to send upstream, falling back to the default for
/// anything not on the allowlist.
fn resolve_model(requested: Option<&str>, default_model: &str) -> String {
    match requested {
        Some(model) if KNOWN_MODELS.contains(&model) => model.to_string(),
        Some(model) => {
            tracing::warn!("Unknown model requested: {}, using default", model);
            default_model.to_string()
        }
        None => default_model.to_string(),
    }
}

/// Forward a conversation to the completion API.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatApiResponse>, ApiError> {
    let Some(llm) = state.llm.as_ref() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Chat is not configured on this server")),
        ));
    };

    if !state.rate_limiter.check(addr.ip()).await {
        tracing::warn!("Rate limit exceeded for {}", addr.ip());
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::new(
                "Rate limit exceeded. Please try again later.",
            )),
        ));
    }

    validate(&req, state.config.max_tokens)?;

    let options = ChatOptions {
        model: resolve_model(req.model.as_deref(), &state.config.default_model),
        max_tokens: req.max_tokens.unwrap_or(1024),
        temperature: req.temperature.unwrap_or(1.0),
    };

    tracing::info!("Chat request from {} using model {}", addr.ip(), options.model);

    match llm.chat(&req.messages, &options).await {
        Ok(reply) => Ok(Json(ChatApiResponse {
            response: reply.content,
            model: reply.model,
            usage: reply.usage,
        })),
        Err(e) => {
            tracing::error!("Chat completion failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "An error occurred while processing your request. Please try again.",
                )),
            ))
        }
    }
}
