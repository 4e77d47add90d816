// src/api/server.rs
// HTTP server for the DDoS alert relay

use crate::api::handlers::*;
use crate::error::{RelayError, Result};
use axum::http::Method;
use axum::{
    routing::{get, post},
    Router,
};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::HeaderValue;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

/// Routes without static assets
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ddos-alert", post(ddos_alert))
        .route("/ip-blocked", post(ip_blocked))
        .route("/status", get(status))
        .route("/ongoing-attacks", get(ongoing_attacks))
        .route("/recent-alerts", get(recent_alerts))
        .route("/blocked-ips", get(blocked_ips))
        .route("/network-stats", get(network_stats))
        .with_state(app_state)
}

pub struct ApiServer {
    address: SocketAddr,
    public_dir: Option<PathBuf>,
}

impl ApiServer {
    pub fn new(address: SocketAddr, public_dir: Option<PathBuf>) -> Self {
        Self {
            address,
            public_dir,
        }
    }

    fn cors(&self) -> CorsLayer {
        let port = self.address.port();
        let origins: Vec<HeaderValue> = [
            format!("http://localhost:{}", port),
            format!("http://127.0.0.1:{}", port),
        ]
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE, ACCEPT])
            .allow_credentials(false)
    }

    pub async fn run(&self, app_state: Arc<AppState>) -> Result<()> {
        let mut app = create_router(app_state);

        if let Some(dir) = &self.public_dir {
            if dir.is_dir() {
                log::info!("Serving dashboard from {}", dir.display());
                app = app.fallback_service(ServeDir::new(dir));
            } else {
                log::warn!("Dashboard directory {} not found; serving API only", dir.display());
            }
        }

        let app = app.layer(self.cors());

        let listener = tokio::net::TcpListener::bind(self.address)
            .await
            .map_err(|e| {
                RelayError::ApiError(format!("Failed to bind to address {}: {}", self.address, e))
            })?;

        log::info!("API server running at http://{}", self.address);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| RelayError::ApiError(format!("Server runtime error: {}", e)))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
