//! HTTP API for taskhub.
//!
//! ## Endpoints
//!
//! - `GET /api/tasks` - List all tasks
//! - `POST /api/tasks` - Create a task
//! - `PUT /api/tasks/{id}` - Update a task's title and/or completed flag
//! - `DELETE /api/tasks/{id}` - Delete a task
//! - `GET /api/health` - Health check
//! - `GET /api/status` - Upstream completion-API status
//! - `POST /api/chat` - Chat with the assistant
//! - Any other path serves the static client shell

mod chat;
mod routes;
mod static_assets;
mod tasks;
pub mod types;

pub use routes::{app, serve, AppState};
