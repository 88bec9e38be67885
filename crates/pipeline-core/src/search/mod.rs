//! Multi-criteria A* route search: standard grid search for short/medium
//! distances, adaptive waypoint seeding for long ones, shared by path
//! smoothing and the alternative-route generator.

pub mod adaptive;
pub mod alternatives;
pub mod astar;
pub mod smoothing;

use std::cmp::Ordering;

use crate::config::EngineConfig;
use crate::costs;
use crate::error::Result;
use crate::geodesy::{haversine, GeoPoint};
use crate::model::{CriteriaMap, CriteriaWeights, PipeParams, RouteMetrics, RouteResult};
use crate::terrain::TerrainOracle;

/// Coordinate key for open/closed sets, rounded to the same 5-decimal grid
/// as the terrain oracle's cache keys. Two floating-point positions that
/// would collapse to the same rounded key are treated as the same search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey(i64, i64);

impl PositionKey {
    pub fn from_point(p: GeoPoint) -> Self {
        Self((p.lat * 1e5).round() as i64, (p.lng * 1e5).round() as i64)
    }
}

/// Total-order wrapper over `f64` for use as a `BinaryHeap` key.
#[derive(Debug, Clone, Copy)]
pub struct FloatOrd(pub f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A node on the open/closed set. `g_score` is the full per-criterion cost
/// breakdown (so alternative-route edge costs can be recombined without
/// re-evaluating the oracle); `combined_g`/`f_score` are the scalar values
/// the heap orders on.
#[derive(Debug, Clone, Copy)]
pub struct SearchNode {
    pub position: GeoPoint,
    pub g_score: CriteriaMap,
    pub combined_g: f64,
    pub f_score: f64,
}

/// Min-heap entry: ordered by `f_score`, tie-broken by `combined_g`, then by
/// `seq` — the push order — so that equal-`f` nodes pop in insertion order
/// rather than by incidental coordinate values.
#[derive(Debug, Clone, Copy)]
pub struct OpenEntry {
    pub f_score: FloatOrd,
    pub combined_g: FloatOrd,
    pub position: GeoPoint,
    pub seq: u64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score && self.combined_g == other.combined_g && self.seq == other.seq
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| self.combined_g.cmp(&other.combined_g))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A single search step: the edge cost breakdown into goal plus the parent
/// pointer it was relaxed from, for path reconstruction.
#[derive(Debug, Clone)]
pub struct Visited {
    pub position: GeoPoint,
    pub g_score: CriteriaMap,
    pub combined_g: f64,
    pub f_score: f64,
    pub parent: Option<PositionKey>,
}

/// Per-criterion cost of the edge `u -> v`, per spec.md §4.2.2.
pub fn edge_cost(u: GeoPoint, v: GeoPoint, oracle: &TerrainOracle, pipe: &PipeParams) -> CriteriaMap {
    let d = haversine(u, v);
    let t = oracle.terrain_difficulty(v.lat, v.lng);

    CriteriaMap {
        distance: d,
        terrain_difficulty: d * (1.0 + t),
        environmental_impact: costs::environmental_impact(pipe.pipe_type, pipe.diameter_mm, t),
        construction_cost: costs::construction_cost(d, pipe.diameter_mm, pipe.material, t, pipe.pipe_type),
        maintenance_access: d * (2.0 - oracle.accessibility(v.lat, v.lng)),
    }
}

/// `h(p) = haversine(p, goal) * (1 + 0.3 * terrain_difficulty(p))`.
/// Over-estimates the weighted sum (admissible only w.r.t. `distance` alone) —
/// preserved as specified, trading optimality for speed.
pub fn heuristic(p: GeoPoint, goal: GeoPoint, oracle: &TerrainOracle) -> f64 {
    haversine(p, goal) * (1.0 + 0.3 * oracle.terrain_difficulty(p.lat, p.lng))
}

fn estimated_construction_time(total_distance: f64, goal: GeoPoint, oracle: &TerrainOracle) -> f64 {
    if total_distance <= 0.0 {
        return 0.0;
    }
    let t_goal = oracle.terrain_difficulty(goal.lat, goal.lng);
    ((total_distance / 1000.0) * (1.0 + 0.5 * t_goal) * 10.0).round() / 10.0
}

/// Two-point direct path for `haversine(start, goal) < 0.5 km` (§4.2.1):
/// per-criterion costs evaluated once, at `goal`.
fn direct_path(start: GeoPoint, goal: GeoPoint, weights: &CriteriaWeights, pipe: &PipeParams, oracle: &TerrainOracle) -> RouteResult {
    let g = edge_cost(start, goal, oracle, pipe);
    let total_distance = haversine(start, goal);
    let terrain_difficulty_score = if total_distance > 0.0 {
        g.terrain_difficulty / total_distance
    } else {
        0.0
    };
    let _ = weights; // costs are not weight-dependent for the direct short-circuit

    RouteResult {
        polyline: vec![start, goal],
        metrics: RouteMetrics {
            total_distance,
            estimated_cost: g.construction_cost,
            terrain_difficulty_score,
            environmental_impact_score: g.environmental_impact,
            estimated_construction_time: estimated_construction_time(total_distance, goal, oracle),
            alternative_num: Some(0),
        },
    }
}

/// Strategy selector (§4.2.1): short-circuit below 0.5 km, adaptive mode
/// above 2 km, standard grid A* in between.
pub fn find_path(
    start: GeoPoint,
    goal: GeoPoint,
    weights: &CriteriaWeights,
    pipe: &PipeParams,
    oracle: &TerrainOracle,
    config: &EngineConfig,
) -> Result<RouteResult> {
    let distance = haversine(start, goal);
    if distance < config.short_circuit_distance_km {
        Ok(direct_path(start, goal, weights, pipe, oracle))
    } else if distance > config.adaptive_distance_km {
        adaptive::search(start, goal, weights, pipe, oracle, config)
    } else {
        astar::search(start, goal, weights, pipe, oracle, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_key_rounds_nearby_points_together() {
        let a = PositionKey::from_point(GeoPoint::new(52.300001, 104.300001));
        let b = PositionKey::from_point(GeoPoint::new(52.3000012, 104.3000013));
        assert_eq!(a, b);
    }

    #[test]
    fn float_ord_orders_like_floats() {
        let a = FloatOrd(1.0);
        let b = FloatOrd(2.0);
        assert!(a < b);
    }

    #[test]
    fn open_entry_orders_by_f_score_first() {
        let lo = OpenEntry {
            f_score: FloatOrd(1.0),
            combined_g: FloatOrd(5.0),
            position: GeoPoint::new(0.0, 0.0),
            seq: 0,
        };
        let hi = OpenEntry {
            f_score: FloatOrd(2.0),
            combined_g: FloatOrd(0.0),
            position: GeoPoint::new(0.0, 0.0),
            seq: 1,
        };
        assert!(lo < hi);
    }

    #[test]
    fn open_entry_ties_break_on_insertion_order() {
        let first = OpenEntry {
            f_score: FloatOrd(1.0),
            combined_g: FloatOrd(1.0),
            position: GeoPoint::new(1.0, 1.0),
            seq: 0,
        };
        let second = OpenEntry {
            f_score: FloatOrd(1.0),
            combined_g: FloatOrd(1.0),
            position: GeoPoint::new(0.0, 0.0),
            seq: 1,
        };
        assert!(first < second);
    }
}
