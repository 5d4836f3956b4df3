//! Shared utilities for integration tests.

use std::net::SocketAddr;
use tokio::net::TcpListener;
use video_api::{HttpServer, ServiceConfig, Shutdown};

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the API with `config`; the listener is bound before this returns.
pub async fn start_server(mut config: ServiceConfig) -> TestServer {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, shutdown }
}

/// Start the API with the default three versions.
#[allow(dead_code)]
pub async fn start_default_server() -> TestServer {
    start_server(ServiceConfig::default()).await
}
