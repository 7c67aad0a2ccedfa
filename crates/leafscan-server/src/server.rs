use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use leafscan_core::{Analyzer, AnalyzerConfig, Classifier};
use leafscan_ledger::InMemoryLedger;
use leafscan_records::{JsonlMirror, RecordStore};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Leafscan HTTP server.
pub struct LeafscanServer {
    config: ServerConfig,
    classifier: Arc<dyn Classifier>,
}

impl LeafscanServer {
    pub fn new(config: ServerConfig, classifier: Arc<dyn Classifier>) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Wire the ledger, record store and classifier into handler state.
    ///
    /// A mirror that cannot be opened is logged and skipped; the server
    /// then runs with local records only.
    pub async fn build_state(&self) -> AppState {
        let ledger = match self.config.block_capacity {
            Some(n) => InMemoryLedger::with_capacity_limit(n),
            None => InMemoryLedger::new(),
        };

        let records = match &self.config.mirror {
            Some(mirror) => match JsonlMirror::open(&mirror.path).await {
                Ok(m) => {
                    info!(path = %mirror.path.display(), "record mirror enabled");
                    RecordStore::with_mirror(Arc::new(m), mirror.timeout())
                }
                Err(e) => {
                    warn!(path = %mirror.path.display(), error = %e, "record mirror unavailable, running locally");
                    RecordStore::new()
                }
            },
            None => RecordStore::new(),
        };

        let analyzer = Analyzer::new(
            Arc::new(ledger),
            Arc::new(records),
            Arc::clone(&self.classifier),
            AnalyzerConfig {
                top_predictions: self.config.top_predictions,
                classify_timeout: self.config.classify_timeout(),
                fallback_requester: self.config.default_requester.clone(),
            },
        );
        info!(
            classifier = self.classifier.name(),
            block_capacity = ?self.config.block_capacity,
            "analyzer ready"
        );
        AppState::new(Arc::new(analyzer), &self.config)
    }

    /// Build the router (useful for testing).
    pub async fn router(&self) -> axum::Router {
        build_router(self.build_state().await)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router().await;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("Leafscan server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
