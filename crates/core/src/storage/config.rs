//! Configuration for the storage module.

use serde::{Deserialize, Serialize};

/// S3 client configuration. Credentials come from the standard AWS chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// AWS region; falls back to the environment's region when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible providers (e.g. "http://localhost:9000" for MinIO).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,

    /// Use path-style addressing, required by most S3-compatible providers.
    #[serde(default)]
    pub force_path_style: bool,
}
