use std::sync::Arc;

use pipeline_core::{EngineConfig, TerrainOracle};

/// Process-wide shared state: one terrain oracle, constructed once at
/// startup (§5 concurrency model — the oracle's caches are append-only and
/// not `Sync`, so requests are handled serially against it).
#[derive(Clone)]
pub struct AppState {
    pub oracle: Arc<TerrainOracle>,
    pub config: Arc<EngineConfig>,
}

impl AppState {
    pub fn new() -> Self {
        let config = EngineConfig::default();
        Self {
            oracle: Arc::new(TerrainOracle::new(config.oracle_seed)),
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
