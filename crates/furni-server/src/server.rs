use std::sync::Arc;

use furni_service::StorageService;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// Furnidata catalog server.
pub struct FurniServer {
    config: ServerConfig,
    service: Arc<StorageService>,
}

impl FurniServer {
    /// Build the configured storage backend and wrap it in a server.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let service = StorageService::from_config(&config.storage)?;
        Ok(Self::with_service(config, Arc::new(service)))
    }

    pub fn with_service(config: ServerConfig, service: Arc<StorageService>) -> Self {
        Self { config, service }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        let state = AppState::new(
            Arc::clone(&self.service),
            self.config.default_filename.as_str(),
        );
        build_router(state, &self.config)
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!(
            addr = %self.config.bind_addr,
            backend = %self.config.storage.backend,
            "furnidata server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
