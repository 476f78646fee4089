//! HTTP server assembly and shared state.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::{Json, Response},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, Environment};
use crate::llm::{LlmClient, OpenAiClient};
use crate::rate_limit::RateLimiter;
use crate::store::TaskStore;

use super::chat;
use super::static_assets;
use super::tasks;
use super::types::{HealthResponse, StatusResponse};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Authoritative task collection
    pub store: TaskStore,
    /// Per-client throttle for the chat endpoint
    pub rate_limiter: RateLimiter,
    /// Upstream completion client, absent when no API key is configured
    pub llm: Option<Arc<dyn LlmClient>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let rate_limiter = RateLimiter::new(
            config.rate_limit_requests,
            Duration::from_secs(config.rate_limit_period),
        );
        let llm: Option<Arc<dyn LlmClient>> = config
            .openai_api_key
            .clone()
            .map(|key| Arc::new(OpenAiClient::new(key)) as Arc<dyn LlmClient>);

        if llm.is_none() {
            tracing::warn!("OPENAI_API_KEY not set, chat endpoint disabled");
        }

        Self {
            config,
            store: TaskStore::new(),
            rate_limiter,
            llm,
        }
    }
}

/// Build the application router.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/status", get(api_status))
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/api/tasks/:id",
            put(tasks::update_task).delete(tasks::delete_task),
        )
        .route("/api/chat", post(chat::chat))
        .fallback(static_assets::serve_shell)
        .layer(middleware::from_fn(security_headers))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));
    let app = app(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// CORS policy by environment: permissive in development, restricted to the
/// configured origin list in production.
fn cors_layer(config: &Config) -> CorsLayer {
    match config.environment {
        Environment::Development => CorsLayer::permissive(),
        Environment::Production => {
            let origins: Vec<HeaderValue> = config
                .allowed_origins
                .iter()
                .filter(|o| o.as_str() != "*")
                .filter_map(|o| o.parse().ok())
                .collect();

            if origins.is_empty() {
                tracing::warn!("No ALLOWED_ORIGINS configured, cross-origin requests disabled");
                CorsLayer::new()
            } else {
                CorsLayer::new()
                    .allow_origin(origins)
                    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                    .allow_credentials(true)
            }
        }
    }
}

/// Attach browser hardening headers to every response.
async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-XSS-Protection",
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        "Strict-Transport-Security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    response
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.as_str().to_string(),
    })
}

/// Upstream API status endpoint.
async fn api_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let api_available = match state.llm.as_ref() {
        Some(llm) => llm.available().await,
        None => false,
    };

    Json(StatusResponse {
        api_available,
        environment: state.config.environment.as_str().to_string(),
        max_tokens: state.config.max_tokens,
    })
}
