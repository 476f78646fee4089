//! # taskhub
//!
//! Self-hosted task list with a chat assistant sidecar.
//!
//! This library provides:
//! - An in-memory task store with CRUD semantics
//! - HTTP APIs for tasks, health/status, and the chat assistant
//! - A client-side mirror for building front ends on top of the task API
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────┐      HTTP       ┌────────────────┐
//!   │  TaskMirror    │ ──────────────▶ │  api (axum)    │
//!   │  (client)      │ ◀────────────── │                │
//!   └────────────────┘                 └───────┬────────┘
//!                                              │
//!                                      ┌───────▼────────┐
//!                                      │   TaskStore    │
//!                                      │  (in memory)   │
//!                                      └────────────────┘
//! ```
//!
//! The chat endpoint proxies to an OpenAI-compatible completion API behind
//! the [`llm::LlmClient`] trait; it shares the server but not the store.
//!
//! ## Modules
//! - `store`: authoritative in-memory task collection
//! - `api`: HTTP boundary (routing, validation, status mapping)
//! - `client`: client-side mirror and HTTP transport
//! - `llm`: chat-completion client
//! - `rate_limit`: per-client throttle for the chat endpoint

pub mod api;
pub mod client;
pub mod config;
pub mod llm;
pub mod rate_limit;
pub mod store;

pub use config::Config;
pub use store::{StoreError, Task, TaskPatch, TaskStore};
