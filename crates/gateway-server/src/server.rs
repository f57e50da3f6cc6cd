//! HTTP server lifecycle.

use crate::routes::create_router;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

/// HTTP server bound to one address
#[derive(Debug)]
pub struct Server {
    addr: String,
    state: AppState,
}

impl Server {
    /// Create a server for `host:port`
    #[must_use]
    pub fn new(host: &str, port: u16, state: AppState) -> Self {
        Self {
            addr: format!("{host}:{port}"),
            state,
        }
    }

    /// Address the server binds to
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Serve until Ctrl+C or SIGTERM
    ///
    /// # Errors
    /// Returns error if the address cannot be bound or serving fails
    pub async fn run(self) -> std::io::Result<()> {
        self.run_until(async {
            shutdown_signal().await;
        })
        .await
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    ///
    /// # Errors
    /// Returns error if the address cannot be bound or serving fails
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.addr).await?;
        info!(addr = %listener.local_addr()?, "Gateway listening");

        axum::serve(listener, create_router(self.state))
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}
