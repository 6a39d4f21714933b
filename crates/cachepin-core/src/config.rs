use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration shared by the resolver and the store adapters.
///
/// Every field has a default, so an empty or partial TOML file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CachePinConfig {
    /// Token-data key holding the session id
    pub session_id_claim: String,
    /// Collection (or sub-directory) session records are stored under
    pub session_collection: String,
    /// Base directory of the JSON directory session store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
    /// JSON document holding the cache's version histories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,
    /// Also export the reference time alongside the version map
    pub export_now: bool,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for CachePinConfig {
    fn default() -> Self {
        Self {
            session_id_claim: "sessionId".to_string(),
            session_collection: "sessions".to_string(),
            store_dir: None,
            history_file: None,
            export_now: true,
            log_filter: "info".to_string(),
        }
    }
}
