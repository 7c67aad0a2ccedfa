use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server settings, loaded from TOML. Every field has a default, so a
/// partial file (or none at all) is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Shared secret expected in `X-API-Key` on gated endpoints.
    pub api_key: String,
    /// Requester recorded by `/v1/predict` when `X-User-ID` is absent.
    pub default_requester: String,
    /// Requester recorded by `/v1/api/predict` when `X-User-ID` is absent.
    pub api_requester: String,
    pub top_predictions: usize,
    pub classify_timeout_ms: u64,
    pub max_upload_bytes: usize,
    /// Seal the tail block once it holds this many transactions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_capacity: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror: Option<MirrorConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            api_key: "demo_api_key".into(),
            default_requester: "anonymous".into(),
            api_requester: "api_user".into(),
            top_predictions: 3,
            classify_timeout_ms: 10_000,
            max_upload_bytes: 10 * 1024 * 1024,
            block_capacity: None,
            mirror: None,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn classify_timeout(&self) -> Duration {
        Duration::from_millis(self.classify_timeout_ms)
    }
}

/// File-backed record mirror.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// JSON-lines file receiving one document per analysis.
    pub path: PathBuf,
    #[serde(default = "MirrorConfig::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl MirrorConfig {
    fn default_timeout_ms() -> u64 {
        5_000
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
