//! # HTTP Server
//!
//! Combines the car and health routers behind a CORS layer and serves
//! them with axum until ctrl-c.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::car_routes::{car_routes, CarState};
use super::config::HttpServerConfig;
use super::health_routes::health_routes;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::storage::{MemoryCarRepository, SharedRepository};

/// HTTP server for the car API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over a fresh in-memory repository
    pub fn new() -> Self {
        Self::with_repository(
            HttpServerConfig::default(),
            Arc::new(MemoryCarRepository::new()),
        )
    }

    pub fn with_repository(config: HttpServerConfig, repository: SharedRepository) -> Self {
        let router = Self::build_router(&config, repository);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, repository: SharedRepository) -> Router {
        let car_state = Arc::new(CarState::new(repository));

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .nest("/api/cars", car_routes(car_state))
            .layer(cors)
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until ctrl-c
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        log_event_with_fields(Event::Serving, &[("addr", &addr.to_string())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete);
        Ok(())
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    // If the handler cannot be installed, keep serving until killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    log_event(Event::ShutdownStart);
}
