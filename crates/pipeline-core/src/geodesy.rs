//! Great-circle distance, polyline length, and point-to-segment distance.
//! All coordinate math uses f64.

use serde::{Deserialize, Serialize};

/// Earth radius in kilometres, used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the sphere in geographic coordinates.
/// Equality is bitwise on the two floats, matching the engine's grid-key semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True if both coordinates fall within Earth's valid range.
    pub fn in_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Great-circle distance between two points, in kilometres.
pub fn haversine(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlng = (b.lng - a.lng).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Total length of a polyline, summing haversine distance between consecutive points.
pub fn polyline_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine(pair[0], pair[1]))
        .sum()
}

/// Euclidean angular distance between two points (used for catalog containment
/// checks, which operate in degree-space rather than great-circle space —
/// matches `original_source/route_planner/terrain.py`'s `sqrt(dlat^2 + dlng^2)`).
pub fn angular_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = a.lat - b.lat;
    let dlng = a.lng - b.lng;
    (dlat * dlat + dlng * dlng).sqrt()
}

/// Distance from point `p` to the segment `(seg_start, seg_end)`, in degree-space.
/// Symmetric in the segment endpoints' order and zero iff `p` lies on the segment.
pub fn point_to_segment_distance(p: GeoPoint, seg_start: GeoPoint, seg_end: GeoPoint) -> f64 {
    let dx = seg_end.lat - seg_start.lat;
    let dy = seg_end.lng - seg_start.lng;

    if dx == 0.0 && dy == 0.0 {
        return angular_distance(p, seg_start);
    }

    let t = ((p.lat - seg_start.lat) * dx + (p.lng - seg_start.lng) * dy) / (dx * dx + dy * dy);

    if t < 0.0 {
        angular_distance(p, seg_start)
    } else if t > 1.0 {
        angular_distance(p, seg_end)
    } else {
        let closest = GeoPoint::new(seg_start.lat + t * dx, seg_start.lng + t * dy);
        angular_distance(p, closest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn haversine_of_point_with_itself_is_zero() {
        let p = GeoPoint::new(52.3, 104.3);
        assert_relative_eq!(haversine(p, p), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = GeoPoint::new(52.3, 104.3);
        let b = GeoPoint::new(52.9, 103.8);
        assert_relative_eq!(haversine(a, b), haversine(b, a), epsilon = 1e-9);
    }

    #[test]
    fn haversine_satisfies_triangle_inequality() {
        let a = GeoPoint::new(52.3, 104.3);
        let b = GeoPoint::new(52.9, 103.8);
        let c = GeoPoint::new(53.5, 105.9);
        assert!(haversine(a, c) <= haversine(a, b) + haversine(b, c) + 1e-9);
    }

    #[test]
    fn haversine_known_distance_moscow_to_spb() {
        // Roughly 635 km, within a few km of tolerance for a spherical-Earth model.
        let moscow = GeoPoint::new(55.7558, 37.6173);
        let spb = GeoPoint::new(59.9343, 30.3351);
        let d = haversine(moscow, spb);
        assert!((600.0..670.0).contains(&d), "got {d}");
    }

    #[test]
    fn point_to_segment_is_symmetric_in_endpoints() {
        let p = GeoPoint::new(0.5, 0.5);
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        assert_relative_eq!(
            point_to_segment_distance(p, a, b),
            point_to_segment_distance(p, b, a),
            epsilon = 1e-12
        );
    }

    #[test]
    fn point_to_segment_zero_on_segment() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 1.0);
        let midpoint = GeoPoint::new(0.5, 0.5);
        assert_relative_eq!(point_to_segment_distance(midpoint, a, b), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn point_to_segment_nonzero_off_segment() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let p = GeoPoint::new(0.5, 1.0);
        assert!(point_to_segment_distance(p, a, b) > 0.0);
    }

    #[test]
    fn point_to_segment_degenerate_segment_is_point_distance() {
        let a = GeoPoint::new(1.0, 1.0);
        let p = GeoPoint::new(4.0, 5.0);
        assert_relative_eq!(
            point_to_segment_distance(p, a, a),
            angular_distance(p, a),
            epsilon = 1e-12
        );
    }

    #[test]
    fn polyline_length_sums_segments() {
        let a = GeoPoint::new(52.3, 104.3);
        let b = GeoPoint::new(52.5, 104.2);
        let c = GeoPoint::new(52.7, 104.0);
        let total = polyline_length(&[a, b, c]);
        assert_relative_eq!(total, haversine(a, b) + haversine(b, c), epsilon = 1e-9);
    }

    #[test]
    fn polyline_length_empty_and_single_point_is_zero() {
        assert_eq!(polyline_length(&[]), 0.0);
        assert_eq!(polyline_length(&[GeoPoint::new(0.0, 0.0)]), 0.0);
    }
}
