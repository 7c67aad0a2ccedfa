use std::sync::Arc;

use leafscan_core::Analyzer;

use crate::auth::{ApiKeyAuth, AuthProvider};
use crate::config::ServerConfig;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub auth: Arc<dyn AuthProvider>,
    pub default_requester: String,
    pub api_requester: String,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// State for `analyzer`, gated by the configured API key.
    pub fn new(analyzer: Arc<Analyzer>, config: &ServerConfig) -> Self {
        Self {
            analyzer,
            auth: Arc::new(ApiKeyAuth::new(config.api_key.clone())),
            default_requester: config.default_requester.clone(),
            api_requester: config.api_requester.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}
