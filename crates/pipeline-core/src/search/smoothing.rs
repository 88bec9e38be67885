//! Feature-preserving path smoothing (§4.2.4): collapses interior waypoints
//! that carry no geometric or terrain significance while keeping every
//! point a careful route actually needs (sharp turns, crossings, road
//! proximity, difficult terrain, long segments).

use crate::geodesy::{haversine, GeoPoint};
use crate::terrain::TerrainOracle;

const TURN_ANGLE_THRESHOLD_RAD: f64 = 0.2;
const DIFFICULTY_THRESHOLD: f64 = 0.6;
const LONG_SEGMENT_KM: f64 = 0.8;
const MIN_KEPT_SPACING_KM: f64 = 0.05;

fn bearing_rad(a: GeoPoint, b: GeoPoint) -> f64 {
    (b.lng - a.lng).atan2(b.lat - a.lat)
}

fn turn_angle(prev: GeoPoint, curr: GeoPoint, next: GeoPoint) -> f64 {
    let in_bearing = bearing_rad(prev, curr);
    let out_bearing = bearing_rad(curr, next);
    let mut diff = out_bearing - in_bearing;
    while diff > std::f64::consts::PI {
        diff -= 2.0 * std::f64::consts::PI;
    }
    while diff < -std::f64::consts::PI {
        diff += 2.0 * std::f64::consts::PI;
    }
    diff.abs()
}

/// Smooths `path`, always keeping the first and last point.
pub fn smooth_path(path: &[GeoPoint], oracle: &TerrainOracle) -> Vec<GeoPoint> {
    if path.len() <= 2 {
        return path.to_vec();
    }

    let mut kept = vec![path[0]];

    for i in 1..path.len() - 1 {
        let (prev, curr, next) = (path[i - 1], path[i], path[i + 1]);

        let angle = turn_angle(prev, curr, next);
        let (is_water, _) = oracle.is_water_crossing(curr.lat, curr.lng);
        let (is_near_road, _) = oracle.near_road(curr.lat, curr.lng);
        let difficulty = oracle.terrain_difficulty(curr.lat, curr.lng);
        let long_segment = haversine(prev, curr) > LONG_SEGMENT_KM;

        let significant = angle > TURN_ANGLE_THRESHOLD_RAD
            || is_water
            || is_near_road
            || difficulty > DIFFICULTY_THRESHOLD
            || long_segment;

        if significant {
            let last_kept = *kept.last().unwrap();
            if haversine(last_kept, curr) > MIN_KEPT_SPACING_KM {
                kept.push(curr);
            }
        }
    }

    kept.push(*path.last().unwrap());
    kept
}
