//! Security data store configuration.

use serde::{Deserialize, Serialize};

/// Where the in-memory store is seeded from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to a JSON seed file with roles, permissions, and users.
    #[serde(default)]
    pub seed_file: Option<String>,
}
