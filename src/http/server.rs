//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Mount legacy handlers on an Axum Router
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve on a listener with peer addresses and graceful shutdown

use std::net::SocketAddr;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::adapter::LegacyAdapter;
use crate::config::BridgeConfig;
use crate::http::handlers;
use crate::http::request::request_id_middleware;
use crate::lifecycle::shutdown_signal;

/// HTTP server hosting adapted legacy handlers.
pub struct BridgeServer {
    router: Router,
}

impl BridgeServer {
    /// Wrap `routes` in the standard middleware stack.
    pub fn new(config: BridgeConfig, routes: Router) -> Self {
        let router = Self::build_router(&config, routes);
        Self { router }
    }

    #[allow(deprecated)]
    fn build_router(config: &BridgeConfig, routes: Router) -> Router {
        routes
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for serving it some other way.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until an OS signal or `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Routes served by the `legacy-bridge` binary.
pub fn demo_routes() -> Router {
    let echo = LegacyAdapter::from_fn(handlers::echo).into_service();

    Router::new()
        .route_service("/hello", LegacyAdapter::from_fn(handlers::hello).into_service())
        .route_service("/echo", echo.clone())
        .route_service("/echo/{*path}", echo)
}
