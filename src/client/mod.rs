//! Client-side mirror of the task collection.
//!
//! The server owns the authoritative collection; this module keeps a local
//! copy for display. The mirror is refreshed wholesale on load and patched
//! incrementally on each successful mutation, and a display filter selects
//! which tasks are visible.

mod controller;
mod http;

pub use controller::{EmptyState, Filter, TaskCounts, TaskMirror};
pub use http::HttpTaskApi;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::store::{Task, TaskPatch};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error status.
    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never completed.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Transport seam for the task API.
///
/// The HTTP implementation talks to a running server; tests substitute an
/// in-process fake.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>, ClientError>;
    async fn create(&self, title: &str) -> Result<Task, ClientError>;
    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task, ClientError>;
    async fn delete(&self, id: Uuid) -> Result<(), ClientError>;
}
