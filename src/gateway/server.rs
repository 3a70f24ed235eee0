//! Gateway server

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use super::router::{AppState, create_router};
use crate::cache::ResponseCache;
use crate::config::Config;
use crate::upstream::ProductClient;
use crate::{Error, Result};

/// Caching proxy server
pub struct Gateway {
    /// Configuration
    config: Config,
    /// Shared handler state (cache, upstream client, TTLs)
    state: Arc<AppState>,
}

impl Gateway {
    /// Create a new gateway.
    ///
    /// The response cache is constructed empty here and lives exactly as
    /// long as the process; it is shared with request handlers by
    /// reference through the router state, never through a global.
    pub fn new(config: Config) -> Result<Self> {
        let upstream = ProductClient::new(&config.upstream)?;
        let state = Arc::new(AppState {
            cache: ResponseCache::new(),
            upstream,
            cache_config: config.cache.clone(),
        });

        Ok(Self { config, state })
    }

    /// Run the gateway until a shutdown signal arrives
    pub async fn run(self) -> Result<()> {
        let addr = SocketAddr::new(
            self.config
                .server
                .host
                .parse()
                .map_err(|e| Error::Config(format!("Invalid host: {e}")))?,
            self.config.server.port,
        );

        let app = create_router(Arc::clone(&self.state), &self.config.cors);
        let listener = TcpListener::bind(addr).await?;

        info!("============================================================");
        info!("PRODUCT GATEWAY v{}", env!("CARGO_PKG_VERSION"));
        info!("============================================================");
        info!(host = %self.config.server.host, port = self.config.server.port, "Listening");
        info!(upstream = %self.config.upstream.base_url, "Proxying product queries");
        info!(
            default_ttl = ?self.config.cache.default_ttl,
            categories_ttl = ?self.config.cache.categories_ttl,
            "Response cache ready"
        );
        info!(
            "Health check: http://{}:{}/health",
            self.config.server.host, self.config.server.port
        );
        info!(
            "Clear cache:  POST http://{}:{}/api/cache/clear",
            self.config.server.host, self.config.server.port
        );
        info!("============================================================");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(())
    }
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, shutting down gracefully");
}
