//! Standard-mode grid A*: best-first search over the implicit lat/lng grid.
//! Used when `0.5 km <= haversine(start, goal) <= 2 km` (§4.2.1).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::config::EngineConfig;
use crate::error::{Result, RouteError};
use crate::geodesy::{haversine, polyline_length, GeoPoint};
use crate::model::{CriteriaMap, CriteriaWeights, PipeParams, RouteMetrics, RouteResult};
use crate::terrain::TerrainOracle;

use super::{edge_cost, estimated_construction_time, heuristic, FloatOrd, OpenEntry, PositionKey, Visited};

/// Eight grid neighbors of `current` at `±step`, in the fixed iteration
/// order `dlat ∈ {-step, 0, step}` nested over `dlng` (skipping `(0,0)`),
/// with the two relaxations from §4.2.2: invalid positions survive if close
/// enough to the goal, and the exact goal is injected once nearby.
fn neighbors(current: GeoPoint, goal: GeoPoint, step: f64, oracle: &TerrainOracle) -> Vec<GeoPoint> {
    let mut out = Vec::with_capacity(9);
    for dlat in [-step, 0.0, step] {
        for dlng in [-step, 0.0, step] {
            if dlat == 0.0 && dlng == 0.0 {
                continue;
            }
            let candidate = GeoPoint::new(current.lat + dlat, current.lng + dlng);
            let valid = oracle.is_valid_position(candidate.lat, candidate.lng);
            if valid || haversine(candidate, goal) < 3.0 * step {
                out.push(candidate);
            }
        }
    }

    if haversine(current, goal) < 4.0 * step {
        let goal_key = PositionKey::from_point(goal);
        if !out.iter().any(|p| PositionKey::from_point(*p) == goal_key) {
            out.push(goal);
        }
    }

    out
}

/// Runs the standard A* loop and returns the reconstructed primary path.
pub fn search(
    start: GeoPoint,
    goal: GeoPoint,
    weights: &CriteriaWeights,
    pipe: &PipeParams,
    oracle: &TerrainOracle,
    config: &EngineConfig,
) -> Result<RouteResult> {
    let mut step = config.grid_step_deg;
    let mut step_doubled = false;

    let mut open: BinaryHeap<Reverse<OpenEntry>> = BinaryHeap::new();
    let mut closed: HashSet<PositionKey> = HashSet::new();
    let mut nodes: HashMap<PositionKey, Visited> = HashMap::new();
    // Monotonic push counter: the open set ties-break on this so that
    // equal-`f` nodes pop in the order they were queued, not by coordinate.
    let mut next_seq: u64 = 0;

    let start_key = PositionKey::from_point(start);
    let start_h = heuristic(start, goal, oracle);
    nodes.insert(
        start_key,
        Visited {
            position: start,
            g_score: CriteriaMap::ZERO,
            combined_g: 0.0,
            f_score: start_h,
            parent: None,
        },
    );
    open.push(Reverse(OpenEntry {
        f_score: FloatOrd(start_h),
        combined_g: FloatOrd(0.0),
        position: start,
        seq: next_seq,
    }));
    next_seq += 1;

    let mut iterations: u32 = 0;

    while let Some(Reverse(entry)) = open.pop() {
        let key = PositionKey::from_point(entry.position);
        if closed.contains(&key) {
            continue;
        }

        let current = match nodes.get(&key) {
            Some(n) => n.clone(),
            None => continue,
        };
        // Stale entry: a cheaper path to this position was found after this
        // one was queued. Discard rather than revisit (§9 "pick one discipline").
        if current.f_score.to_bits() != entry.f_score.0.to_bits() {
            continue;
        }

        if haversine(current.position, goal) < 2.0 * step {
            let edge = edge_cost(current.position, goal, oracle, pipe);
            let goal_g = current.g_score.add(&edge);
            let goal_key = PositionKey::from_point(goal);
            nodes.insert(
                goal_key,
                Visited {
                    position: goal,
                    g_score: goal_g,
                    combined_g: weights.dot(&goal_g),
                    f_score: 0.0,
                    parent: Some(key),
                },
            );
            return Ok(reconstruct(start, goal, &nodes, goal_key, oracle));
        }

        closed.insert(key);

        for neighbor in neighbors(current.position, goal, step, oracle) {
            let nkey = PositionKey::from_point(neighbor);
            if closed.contains(&nkey) {
                continue;
            }

            let edge = edge_cost(current.position, neighbor, oracle, pipe);
            let tentative_g = current.g_score.add(&edge);
            let tentative_combined = weights.dot(&tentative_g);

            let improves = match nodes.get(&nkey) {
                Some(existing) => tentative_combined < existing.combined_g,
                None => true,
            };
            if !improves {
                continue;
            }

            let h = heuristic(neighbor, goal, oracle);
            let f = tentative_combined + h;
            nodes.insert(
                nkey,
                Visited {
                    position: neighbor,
                    g_score: tentative_g,
                    combined_g: tentative_combined,
                    f_score: f,
                    parent: Some(key),
                },
            );
            open.push(Reverse(OpenEntry {
                f_score: FloatOrd(f),
                combined_g: FloatOrd(tentative_combined),
                position: neighbor,
                seq: next_seq,
            }));
            next_seq += 1;
        }

        iterations += 1;
        if iterations > config.step_doubling_threshold && !step_doubled {
            step *= 2.0;
            step_doubled = true;
        }
        if iterations >= config.max_iterations {
            return Err(RouteError::SearchExhausted);
        }
    }

    Err(RouteError::SearchExhausted)
}

/// Walks parent pointers from `terminal_key` back to `start` and computes metrics.
pub(crate) fn reconstruct(
    start: GeoPoint,
    goal: GeoPoint,
    nodes: &HashMap<PositionKey, Visited>,
    terminal_key: PositionKey,
    oracle: &TerrainOracle,
) -> RouteResult {
    let mut polyline = Vec::new();
    let mut key = Some(terminal_key);
    while let Some(k) = key {
        let node = &nodes[&k];
        polyline.push(node.position);
        key = node.parent;
    }
    polyline.reverse();
    if polyline.first() != Some(&start) {
        polyline.insert(0, start);
    }

    let terminal = &nodes[&terminal_key];
    let total_distance = polyline_length(&polyline);

    let terrain_difficulty_score = if total_distance > 0.0 {
        terminal.g_score.terrain_difficulty / total_distance
    } else {
        0.0
    };

    let construction_time = estimated_construction_time(total_distance, goal, oracle);

    RouteResult {
        polyline,
        metrics: RouteMetrics {
            total_distance,
            estimated_cost: terminal.g_score.construction_cost,
            terrain_difficulty_score,
            environmental_impact_score: terminal.g_score.environmental_impact,
            estimated_construction_time: construction_time,
            alternative_num: Some(0),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::model::{PipeMaterial, PipeType};

    fn pipe() -> PipeParams {
        PipeParams {
            pipe_type: PipeType::Gas,
            diameter_mm: 700.0,
            material: PipeMaterial::Steel,
            max_pressure: 50.0,
        }
    }

    #[test]
    fn medium_path_reaches_goal_and_has_multiple_points() {
        let oracle = TerrainOracle::new(1);
        let config = EngineConfig::default();
        let weights = CriteriaWeights::default_weights().normalized();
        let start = GeoPoint::new(52.30, 104.40);
        let goal = GeoPoint::new(52.32, 104.42);

        let result = search(start, goal, &weights, &pipe(), &oracle, &config).expect("path found");
        assert_eq!(result.polyline.first(), Some(&start));
        assert_eq!(result.polyline.last(), Some(&goal));
        assert!(result.polyline.len() >= 2);
        assert!(result.metrics.total_distance > 0.0);
    }

    #[test]
    fn neighbors_excludes_zero_offset() {
        let oracle = TerrainOracle::new(1);
        let current = GeoPoint::new(52.3, 104.3);
        let goal = GeoPoint::new(60.0, 110.0);
        let ns = neighbors(current, goal, 0.0005, &oracle);
        assert!(ns.iter().all(|p| *p != current));
    }
}
