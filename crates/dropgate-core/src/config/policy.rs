//! Upload and share-window policy.

use serde::{Deserialize, Serialize};

/// Limits applied to new uploads and their availability windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePolicy {
    /// Shortest allowed availability window in hours.
    #[serde(default = "default_min_validity_hours")]
    pub min_validity_hours: u64,
    /// Longest allowed availability window in days.
    #[serde(default = "default_max_validity_days")]
    pub max_validity_days: u64,
    /// Window applied when the uploader does not supply one, in days.
    #[serde(default = "default_validity_days")]
    pub default_validity_days: u64,
    /// Minimum length for a file password, when one is set.
    #[serde(default = "default_file_password_min")]
    pub file_password_min_length: usize,
}

impl Default for SharePolicy {
    fn default() -> Self {
        Self {
            min_validity_hours: default_min_validity_hours(),
            max_validity_days: default_max_validity_days(),
            default_validity_days: default_validity_days(),
            file_password_min_length: default_file_password_min(),
        }
    }
}

fn default_min_validity_hours() -> u64 {
    1
}

fn default_max_validity_days() -> u64 {
    30
}

fn default_validity_days() -> u64 {
    7
}

fn default_file_password_min() -> usize {
    6
}
