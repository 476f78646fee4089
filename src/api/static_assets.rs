//! Static client shell.
//!
//! Fallback handler for every path outside `/api`: serves files from the
//! configured static directory and falls back to `index.html`, so client-side
//! routes load the application shell.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use super::routes::AppState;

pub fn content_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Resolve a request path to a file under the static directory.
///
/// Rejects any path with non-normal components so requests cannot escape the
/// static root.
fn resolve(static_dir: &Path, uri_path: &str) -> Option<PathBuf> {
    let relative = uri_path.trim_start_matches('/');
    if relative.is_empty() {
        return Some(static_dir.join("index.html"));
    }

    let relative = Path::new(relative);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }

    Some(static_dir.join(relative))
}

/// Serve a file from the static directory, or the `index.html` shell for
/// paths that do not name one.
pub async fn serve_shell(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let Some(path) = resolve(&state.config.static_dir, uri.path()) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let target = if tokio::fs::metadata(&path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
    {
        path
    } else {
        state.config.static_dir.join("index.html")
    };

    match tokio::fs::read(&target).await {
        Ok(contents) => (
            [(header::CONTENT_TYPE, content_type_for_path(&target))],
            Body::from(contents),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to serve {}: {}", target.display(), e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}
