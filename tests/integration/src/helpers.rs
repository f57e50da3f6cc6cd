//! Test helper utilities for integration tests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use gateway_config::GatewayConfig;
use gateway_core::ProviderDirectory;
use gateway_server::{build_registry, build_state, create_router, AppState};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for tests (only once)
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
});

/// Initialize tracing for tests
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// Gateway assembled from configuration, driven in-process
pub struct TestGateway {
    /// Shared state, for inspecting health and the monitor
    pub state: AppState,
    router: Router,
}

impl TestGateway {
    /// Build the gateway exactly as the binary does
    pub fn from_config(config: &GatewayConfig) -> Self {
        init_tracing();
        let registry = build_registry(config).expect("Failed to build registry");
        let directory: Arc<dyn ProviderDirectory> = Arc::new(registry);
        let state = build_state(config, directory).expect("Failed to build state");
        let router = create_router(state.clone());
        Self { state, router }
    }

    /// Send a request through the router
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    /// POST a JSON body
    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// POST without a body
    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// GET a path
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }
}

/// Gateway served over a real socket
pub struct TestServer {
    /// The server address
    pub addr: SocketAddr,
    /// HTTP client for making requests
    pub client: Client,
    /// Base URL for the server
    pub base_url: String,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Serve the given state on an ephemeral port
    pub async fn start(state: AppState) -> Self {
        init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, create_router(state))
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Server error");
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create client");

        Self {
            addr,
            client,
            base_url: format!("http://{addr}"),
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Absolute URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Stop the server
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// A port that was free a moment ago
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("Failed to find a free port")
}
