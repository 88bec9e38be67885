//! Tunable constants for the search and terrain oracle.
//!
//! These are the numbers `spec.md` names as "configurable" — grid step,
//! iteration caps, the oracle's RNG seed — gathered into one struct rather
//! than scattered as magic numbers through `search` and `terrain`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Angular spacing between neighbor candidates, degrees. ~50 m at the default.
    pub grid_step_deg: f64,
    /// Iterations after which the grid step doubles, if it hasn't already.
    pub step_doubling_threshold: u32,
    /// Hard iteration cap for standard-mode A*.
    pub max_iterations: u32,
    /// Great-circle distance below which the engine short-circuits to a direct path, km.
    pub short_circuit_distance_km: f64,
    /// Great-circle distance above which the engine switches to adaptive mode, km.
    pub adaptive_distance_km: f64,
    /// Seed for the terrain oracle's elevation/soil noise RNG. Fixed by
    /// default so that two oracle instances are bit-for-bit reproducible.
    pub oracle_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_step_deg: 0.0005,
            step_doubling_threshold: 5000,
            max_iterations: 20_000,
            short_circuit_distance_km: 0.5,
            adaptive_distance_km: 2.0,
            oracle_seed: 0x5EED_5EED_5EED_5EED,
        }
    }
}
