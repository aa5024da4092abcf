use std::sync::Arc;

use polydoc_library::seed_document;
use polydoc_store::{bootstrap, DocumentStore};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::{Mode, ServerConfig};
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// polydoc HTTP server.
pub struct PolydocServer {
    config: ServerConfig,
    store: Arc<dyn DocumentStore>,
}

impl PolydocServer {
    /// Open the configured store; library mode writes the seed document
    /// when the file does not exist yet.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store: Arc<dyn DocumentStore> = Arc::new(config.open_store()?);
        if config.mode == Mode::Library {
            bootstrap(store.as_ref(), &seed_document())?;
        }
        Ok(Self { config, store })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.config.mode, Arc::clone(&self.store))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!(
            addr = %self.config.bind_addr,
            mode = %self.config.mode,
            location = %self.store.location(),
            "polydoc server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
