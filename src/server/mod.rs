//! HTTP boundary: router construction and server startup.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use mediamorph_av::Transcoder;
use mediamorph_db::store::SessionStore;
use mediamorph_formats::FormatRegistry;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::convert::ConversionDispatcher;

pub mod error;
pub mod routes;

/// Uploads above this size are rejected outright.
const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// Shared application context.
#[derive(Clone)]
pub struct AppContext {
    pub dispatcher: Arc<ConversionDispatcher>,
    pub config: Arc<Config>,
}

impl AppContext {
    /// Wire the dispatcher from configuration and an initialized store.
    pub fn new(config: Config, store: SessionStore) -> Self {
        let transcoder = Transcoder::new(config.conversion.transcoder.clone()).with_timeout(
            std::time::Duration::from_secs(config.conversion.timeout_secs),
        );
        let dispatcher = ConversionDispatcher::new(
            Arc::new(store),
            Arc::new(FormatRegistry::builtin()),
            transcoder,
        );

        Self {
            dispatcher: Arc::new(dispatcher),
            config: Arc::new(config),
        }
    }
}

/// Create the Axum router with all routes and middleware.
pub fn create_router(ctx: AppContext) -> Router {
    let cors = cors_layer(&ctx.config.server.cors_origin);

    routes::routes()
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([HeaderName::from_static(routes::FILE_NAME_HEADER)]);

    match origin {
        "*" => cors.allow_origin(Any),
        origin => match origin.parse::<HeaderValue>() {
            Ok(value) => cors.allow_origin(value),
            Err(_) => {
                tracing::warn!(origin, "invalid CORS origin, falling back to any");
                cors.allow_origin(Any)
            }
        },
    }
}

/// Start the HTTP server and run until ctrl-c.
pub async fn start_server(ctx: AppContext) -> Result<()> {
    let addr = format!("{}:{}", ctx.config.server.host, ctx.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Listening on {}", addr);

    let app = create_router(ctx);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
