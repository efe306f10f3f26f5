//! Application startup and lifecycle management.

use crate::config::ImagegenConfig;
use crate::handlers::{
    generate::generate_image,
    health::{health_check, readiness_check},
    metrics::metrics,
};
use crate::services::{InferenceProvider, WorkersAiProvider};
use crate::AppState;
use axum::{
    middleware::from_fn,
    routing::{any, get},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any);

    Router::new()
        .route("/", any(generate_image))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .layer(cors)
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application against the Workers AI backend.
    pub async fn build(config: ImagegenConfig) -> Result<Self, AppError> {
        let inference: Arc<dyn InferenceProvider> =
            Arc::new(WorkersAiProvider::new(config.workers_ai()));

        tracing::info!(
            base_url = %config.workers_ai.base_url,
            "Initialized Workers AI inference provider"
        );

        Self::build_with_provider(config, inference).await
    }

    /// Build the application with an explicit inference provider.
    pub async fn build_with_provider(
        config: ImagegenConfig,
        inference: Arc<dyn InferenceProvider>,
    ) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = config.common.bind_address();
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Imagegen service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState::new(inference),
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped or a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
