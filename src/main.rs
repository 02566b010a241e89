//! japp web gateway
//!
//! Serves a step-based conversation from a remote session backend as plain
//! HTML pages. Session identity lives in an encrypted cookie; the gateway
//! itself keeps no per-client state.

mod api;
mod backend;
mod config;
mod render;
mod session;

use api::{create_router, AppState};
use backend::{HttpRpcClient, LoggingBackend};
use config::GatewayConfig;
use render::Renderer;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "japp_web=debug,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    tracing::debug!("Starting...");
    let config = GatewayConfig::from_env()?;

    // Templates are loaded once; a bad template stops startup here
    tracing::info!(
        message = %config.templates.message.display(),
        prompt = %config.templates.prompt.display(),
        choice = %config.templates.choice.display(),
        "Loading templates"
    );
    let renderer = Renderer::load(&config.templates)?;

    let client = HttpRpcClient::new(&config.backend_url, config.backend_timeout)?;
    let backend = Arc::new(LoggingBackend::new(Arc::new(client)));
    tracing::info!(backend = %config.backend_url, "Session backend configured");

    let state = AppState::new(backend, renderer, config.cookie_key()?);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("japp web gateway listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
