//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all runtime data.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Root path for stored file payloads.
    #[serde(default = "default_blob_root")]
    pub blob_root: String,
    /// Maximum upload size in bytes (default 50 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

fn default_data_root() -> String {
    "./data".to_string()
}

fn default_blob_root() -> String {
    "./data/blobs".to_string()
}

fn default_max_upload() -> u64 {
    52_428_800 // 50 MB
}
