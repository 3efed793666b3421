//! Local proxy for the Ahrefs API.
//!
//! Keeps the API key server-side so a static dashboard can query domain
//! metrics without ever holding the credential.
//!
//! # Routes
//!
//! | Method    | Path                    | Response                                   |
//! |-----------|-------------------------|--------------------------------------------|
//! | `GET`     | `/api/domain-metrics`   | upstream status + body, `400` without `domain` |
//! | `GET`     | `/api/metrics-overview` | upstream status + body, `400` without `domain` |
//! | `OPTIONS` | any                     | `200`, empty body, open CORS               |
//! | any       | anything else           | `404 {"error":"Not found"}`                |
//!
//! Transport failures reaching Ahrefs come back as `500 {"error": <message>}`.
//!
//! # Setup
//!
//! The key is read from `AHREFS_API_KEY`, or from `/run/secrets/AHREFS_API_KEY`.
//! Without it the proxy refuses to start.
//! ```sh
//! AHREFS_API_KEY=... cargo run -p proxy
//! curl 'http://localhost:3001/api/domain-metrics?domain=example.com'
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::Error;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use common::signal::shutdown_signal;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod upstream;

use config::Config;
use routes::{
    domain_metrics_handler, fallback_handler, metrics_overview_handler, preflight_handler,
};
use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(
            "/api/domain-metrics",
            get(domain_metrics_handler).options(preflight_handler),
        )
        .route(
            "/api/metrics-overview",
            get(metrics_overview_handler).options(preflight_handler),
        )
        .fallback(fallback_handler)
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<(), Error> {
    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config);

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("{}:{}", state.config.host, state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Ahrefs proxy running on http://{address}");
    info!("  GET /api/domain-metrics?domain=example.com");
    info!("  GET /api/metrics-overview?domain=example.com");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal("proxy"))
        .await?;

    info!("Server shutting down...");

    Ok(())
}
