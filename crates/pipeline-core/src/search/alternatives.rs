//! Alternative-route generation (§4.2.5): deterministic weight perturbation
//! followed by a full re-run of the strategy selector.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::geodesy::GeoPoint;
use crate::model::{CriteriaWeights, PipeParams, RouteResult};
use crate::terrain::TerrainOracle;

use super::find_path;

/// Perturbs `weights` per the fixed per-index recipe, then renormalizes.
/// Only indices 1 and 2 are defined by the spec; any other index is an
/// identity perturbation (renormalization only).
fn perturb(weights: &CriteriaWeights, alternative_index: u32) -> CriteriaWeights {
    let mut w = *weights;
    match alternative_index {
        1 => {
            w.terrain_difficulty = (2.0 * weights.terrain_difficulty).min(0.8);
            w.environmental_impact = (2.0 * weights.environmental_impact).min(0.8);
            w.distance = (0.5 * weights.distance).max(0.1);
        }
        2 => {
            w.distance = (2.0 * weights.distance).min(0.8);
            w.construction_cost = (2.0 * weights.construction_cost).min(0.8);
            w.environmental_impact = (0.5 * weights.environmental_impact).max(0.1);
        }
        _ => {}
    }
    w.normalized()
}

/// Runs the primary search plus up to `num_alternatives` perturbed re-runs.
/// A failed alternative (search exhaustion) is skipped rather than aborting
/// the whole request — the primary route's presence is all §7 requires.
pub fn find_paths(
    start: GeoPoint,
    goal: GeoPoint,
    weights: &CriteriaWeights,
    pipe: &PipeParams,
    oracle: &TerrainOracle,
    config: &EngineConfig,
    num_alternatives: u32,
) -> Result<Vec<RouteResult>> {
    let primary_weights = weights.normalized();
    let mut routes = Vec::with_capacity(1 + num_alternatives as usize);

    let primary = find_path(start, goal, &primary_weights, pipe, oracle, config)?;
    routes.push(primary);

    for i in 1..=num_alternatives {
        let alt_weights = perturb(&primary_weights, i);
        if let Ok(mut result) = find_path(start, goal, &alt_weights, pipe, oracle, config) {
            result.metrics.alternative_num = Some(i);
            routes.push(result);
        }
    }

    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perturbation_preserves_normalization() {
        let w = CriteriaWeights::default_weights().normalized();
        for i in [1, 2] {
            let p = perturb(&w, i);
            assert!((p.sum() - 1.0).abs() < 1e-9, "alt {i} sum = {}", p.sum());
        }
    }

    #[test]
    fn alternatives_produce_distinct_weight_vectors() {
        let w = CriteriaWeights::default_weights().normalized();
        let a1 = perturb(&w, 1);
        let a2 = perturb(&w, 2);
        assert!(a1 != w);
        assert!(a2 != w);
        assert!(a1 != a2);
    }

    #[test]
    fn find_paths_includes_primary_plus_alternatives() {
        let oracle = TerrainOracle::new(1);
        let config = EngineConfig::default();
        let weights = CriteriaWeights::default_weights();
        let pipe = PipeParams {
            pipe_type: crate::model::PipeType::Gas,
            diameter_mm: 700.0,
            material: crate::model::PipeMaterial::Steel,
            max_pressure: 50.0,
        };
        let start = GeoPoint::new(52.30, 104.40);
        let goal = GeoPoint::new(52.32, 104.42);

        let routes = find_paths(start, goal, &weights, &pipe, &oracle, &config, 2).expect("routes");
        assert_eq!(routes.len(), 3);
        assert_eq!(routes[0].metrics.alternative_num, Some(0));
        assert_eq!(routes[1].metrics.alternative_num, Some(1));
        assert_eq!(routes[2].metrics.alternative_num, Some(2));
    }
}
