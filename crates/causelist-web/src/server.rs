//! Web server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use causelist_scraper::CauseListFetcher;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::error::WebError;
use crate::routes::create_router;
use crate::state::AppState;

/// Listen address.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

impl WebConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Serves the form and the download endpoint.
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebServer {
    pub fn new(config: WebConfig, fetcher: Arc<dyn CauseListFetcher>) -> Self {
        Self {
            config,
            state: Arc::new(AppState::new(fetcher)),
        }
    }

    /// Get the server address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Serve until Ctrl-C.
    pub async fn run(&self) -> Result<(), WebError> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` completes, letting in-flight requests finish.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<(), WebError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self.addr().parse()?;
        let listener = TcpListener::bind(addr).await?;
        let local = listener.local_addr()?;

        info!("Cause list downloader listening on http://{}", local);

        axum::serve(listener, create_router(self.state.clone()))
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl-C, shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::tests::MockFetcher;

    #[test]
    fn test_web_config_default() {
        let config = WebConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_server_addr() {
        let server = WebServer::new(WebConfig::new("0.0.0.0", 8080), Arc::new(MockFetcher::ok()));
        assert_eq!(server.addr(), "0.0.0.0:8080");
    }

    #[tokio::test]
    async fn test_invalid_host() {
        let server = WebServer::new(WebConfig::new("not a host", 5000), Arc::new(MockFetcher::ok()));
        let err = server.run_until(async {}).await.unwrap_err();
        assert!(matches!(err, WebError::InvalidAddress(_)));
    }

    #[tokio::test]
    async fn test_graceful_shutdown() {
        let server = WebServer::new(WebConfig::new("127.0.0.1", 0), Arc::new(MockFetcher::ok()));
        server.run_until(async {}).await.unwrap();
    }
}
