//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use legacy_bridge::config::BridgeConfig;
use legacy_bridge::http::BridgeServer;
use legacy_bridge::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// A bridge server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

/// Start a bridge server with the standard middleware around `routes`.
pub async fn start_server(routes: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = BridgeServer::new(BridgeConfig::default(), routes);
    let rx = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// A client that never reuses connections or consults proxy settings.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
