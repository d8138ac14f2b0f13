// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Form Relay Service
//!
//! Accepts contact-form submissions over HTTP, validates and sanitizes
//! them, applies rate limiting and origin checks, and dispatches an
//! email through the configured mail transport.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RATE_LIMIT_MAX`: Max requests per window per client (default: 5)
//! - `RATE_LIMIT_WINDOW_SECS`: Counting window in seconds (default: 60)
//! - `RATE_LIMIT_RETENTION_MULTIPLE`: Sweep retention multiple (default: 2)
//! - `ALLOWED_ORIGIN`: Origin policy, `*`, `*.suffix` or exact (default: `*`)
//! - `MAIL_SENDER`: Verified sender/recipient address (required for dispatch)
//! - `MAIL_REGION`: Mail service region (default: eu-west-2)

use axum::{
    routing::{any, get},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_form_relay::{
    config::Config,
    handlers::{health, submit, AppState},
    mailer::LogTransport,
    pipeline::Pipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = Config::from_env();
    info!(
        bind_addr = %config.bind_addr,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        allowed_origin = %config.cors.allowed_origin,
        mail_region = %config.mail.region,
        "Starting contact form relay"
    );
    if !config.mail.is_configured() {
        warn!("MAIL_SENDER is not set; submissions will fail with a transport error");
    }

    // Create application state
    let transport = Arc::new(LogTransport::new(config.mail.region.clone()));
    let pipeline = Pipeline::new(config.clone(), transport);

    let state = Arc::new(AppState { pipeline, config });

    // Spawn the rate-limit sweep task
    let sweep_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            sweep_state.pipeline.sweep_stale();
        }
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/contact", any(submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Start server
    let addr: SocketAddr = state.config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
