//! Adaptive long-distance mode (§4.2.3): chord waypoint seeding, local
//! terrain-aware optimization, then the same per-segment edge-cost
//! accumulation and smoothing as standard mode.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::geodesy::{haversine, polyline_length, GeoPoint};
use crate::model::{CriteriaMap, CriteriaWeights, PipeParams, RouteMetrics, RouteResult};
use crate::terrain::TerrainOracle;

use super::{edge_cost, estimated_construction_time, smoothing::smooth_path};

const OFFSET_RADIUS_DEG: f64 = 0.002;
const OFFSET_COUNT: usize = 8;

/// Evenly spaced waypoints on the chord from `start` to `goal`, linearly
/// interpolated in lat/lng — `num_segments + 1` points including both ends.
fn seed_waypoints(start: GeoPoint, goal: GeoPoint, num_segments: u32) -> Vec<GeoPoint> {
    (0..=num_segments)
        .map(|i| {
            let t = i as f64 / num_segments as f64;
            GeoPoint::new(start.lat + (goal.lat - start.lat) * t, start.lng + (goal.lng - start.lng) * t)
        })
        .collect()
}

/// Scalar fitness of `p` as a waypoint, combining validity, road proximity,
/// water crossings, terrain difficulty and environmental/settlement
/// penalties, clamped to `[0.01, 1.0]`.
fn evaluate_point_suitability(p: GeoPoint, weights: &CriteriaWeights, oracle: &TerrainOracle) -> f64 {
    if !oracle.is_valid_position(p.lat, p.lng) {
        return 0.01;
    }

    let road_w = 3.0 * weights.maintenance_access;
    let water_w = 3.0 * weights.terrain_difficulty;
    let env_w = 3.0 * weights.environmental_impact;
    let cost_w = 3.0 * weights.construction_cost;

    let mut score = 0.7;

    let (near_road, road_bonus) = oracle.near_road(p.lat, p.lng);
    if near_road {
        score += road_bonus * road_w;
    }

    let (is_water, water_difficulty) = oracle.is_water_crossing(p.lat, p.lng);
    if is_water {
        score -= water_difficulty * water_w;
    }

    let difficulty = oracle.terrain_difficulty(p.lat, p.lng);
    score -= difficulty * (water_w + cost_w) / 2.0;

    let (is_protected, impact) = oracle.is_protected_area(p.lat, p.lng);
    if is_protected {
        score -= impact * env_w;
    }

    let (is_settlement, restriction) = oracle.near_settlement(p.lat, p.lng);
    if is_settlement {
        score -= restriction * env_w;
    }

    score.clamp(0.01, 1.0)
}

/// Eight offsets of `p` at `OFFSET_RADIUS_DEG`, 45 degrees apart.
fn offsets(p: GeoPoint) -> Vec<GeoPoint> {
    (0..OFFSET_COUNT)
        .map(|i| {
            let angle = (i as f64) * std::f64::consts::FRAC_PI_4;
            GeoPoint::new(p.lat + OFFSET_RADIUS_DEG * angle.cos(), p.lng + OFFSET_RADIUS_DEG * angle.sin())
        })
        .collect()
}

/// Replaces each interior waypoint with whichever of itself or its eight
/// offsets scores highest under `evaluate_point_suitability`. Start and goal
/// (indices 0 and last) are never moved.
fn optimize_waypoints_for_terrain(waypoints: &mut [GeoPoint], weights: &CriteriaWeights, oracle: &TerrainOracle) {
    let last = waypoints.len() - 1;
    for i in 1..last {
        let current = waypoints[i];
        let mut best = current;
        let mut best_score = evaluate_point_suitability(current, weights, oracle);

        for candidate in offsets(current) {
            let score = evaluate_point_suitability(candidate, weights, oracle);
            if score > best_score {
                best = candidate;
                best_score = score;
            }
        }

        waypoints[i] = best;
    }
}

pub fn search(
    start: GeoPoint,
    goal: GeoPoint,
    weights: &CriteriaWeights,
    pipe: &PipeParams,
    oracle: &TerrainOracle,
    _config: &EngineConfig,
) -> Result<RouteResult> {
    let direct_distance = haversine(start, goal);
    let num_segments = ((direct_distance / 0.3).round() as i64).clamp(5, 40) as u32;

    let mut waypoints = seed_waypoints(start, goal, num_segments);
    optimize_waypoints_for_terrain(&mut waypoints, weights, oracle);

    let mut path = Vec::with_capacity(waypoints.len());
    for p in waypoints {
        if path.last() != Some(&p) {
            path.push(p);
        }
    }
    if path.last() != Some(&goal) {
        path.push(goal);
    }

    let path = if path.len() > 10 { smooth_path(&path, oracle) } else { path };

    let mut accumulated = CriteriaMap::ZERO;
    for pair in path.windows(2) {
        let edge = edge_cost(pair[0], pair[1], oracle, pipe);
        accumulated = accumulated.add(&edge);
    }

    let total_distance = polyline_length(&path);
    let terrain_difficulty_score = if total_distance > 0.0 {
        accumulated.terrain_difficulty / total_distance
    } else {
        0.0
    };
    let construction_time = estimated_construction_time(total_distance, goal, oracle);

    Ok(RouteResult {
        polyline: path,
        metrics: RouteMetrics {
            total_distance,
            estimated_cost: accumulated.construction_cost,
            terrain_difficulty_score,
            environmental_impact_score: accumulated.environmental_impact,
            estimated_construction_time: construction_time,
            alternative_num: Some(0),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::model::{PipeMaterial, PipeType};

    fn pipe() -> PipeParams {
        PipeParams {
            pipe_type: PipeType::Water,
            diameter_mm: 300.0,
            material: PipeMaterial::Plastic,
            max_pressure: 20.0,
        }
    }

    #[test]
    fn long_path_seeds_at_least_five_waypoints() {
        let start = GeoPoint::new(52.10, 104.00);
        let goal = GeoPoint::new(52.80, 104.80);
        let direct = haversine(start, goal);
        let num_segments = ((direct / 0.3).round() as i64).clamp(5, 40) as u32;
        assert!(num_segments >= 5);
    }

    #[test]
    fn adaptive_search_reaches_goal() {
        let oracle = TerrainOracle::new(1);
        let config = EngineConfig::default();
        let weights = CriteriaWeights::default_weights().normalized();
        let start = GeoPoint::new(52.10, 104.00);
        let goal = GeoPoint::new(52.80, 104.80);

        let result = search(start, goal, &weights, &pipe(), &oracle, &config).expect("adaptive result");
        assert_eq!(result.polyline.first(), Some(&start));
        assert_eq!(result.polyline.last(), Some(&goal));
        assert!(result.metrics.total_distance > 0.0);
    }

    #[test]
    fn suitability_is_clamped() {
        let oracle = TerrainOracle::new(1);
        let weights = CriteriaWeights::default_weights().normalized();
        for (lat, lng) in [(52.3, 104.3), (10.0, 10.0), (53.5, 107.8)] {
            let s = evaluate_point_suitability(GeoPoint::new(lat, lng), &weights, &oracle);
            assert!((0.01..=1.0).contains(&s), "got {s}");
        }
    }
}
