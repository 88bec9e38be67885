//! Deterministic, cached terrain oracle.
//!
//! All queries are pure given the static feature catalog plus the oracle's
//! seeded noise. Every answer is memoized keyed on coordinates rounded to 5
//! decimal places (`CacheKey`) — never on raw floats, per the "cache keys as
//! floats" design note.

pub mod features;

use std::collections::HashMap;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::geodesy::{angular_distance, point_to_segment_distance, GeoPoint};
use features::{forbidden_zones, protected_areas, rivers, roads, settlements, TerrainFeature};

/// Coordinate cache key, rounded to 5 decimal places (~1.1 m resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey(i64, i64);

impl CacheKey {
    fn new(lat: f64, lng: f64) -> Self {
        Self((lat * 1e5).round() as i64, (lng * 1e5).round() as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoilType {
    Clay,
    Loam,
    Sand,
    Rock,
    Peat,
}

impl SoilType {
    /// Difficulty contribution of this soil type to `terrain_difficulty`.
    pub fn difficulty_factor(self) -> f64 {
        match self {
            SoilType::Clay => 0.4,
            SoilType::Loam => 0.2,
            SoilType::Sand => 0.3,
            SoilType::Rock => 0.8,
            SoilType::Peat => 0.6,
        }
    }
}

/// Grid cell in a [`TerrainDataResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainCell {
    pub position: GeoPoint,
    pub elevation: f64,
    pub difficulty: f64,
    pub accessibility: f64,
}

/// A feature summary entry for the `/api/terrain` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TerrainFeatureSummary {
    River { name: String, points: Vec<GeoPoint>, half_width_deg: f64 },
    Road { name: String, points: Vec<GeoPoint> },
    Settlement { name: String, center: GeoPoint, radius_deg: f64 },
    ProtectedArea { name: String, center: GeoPoint, radius_deg: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainDataResponse {
    pub grid: Vec<Vec<TerrainCell>>,
    pub features: Vec<TerrainFeatureSummary>,
    pub bounds: BoundingBox,
}

/// Deterministic spatial query engine backed by a static feature catalog.
///
/// Constructed once per process (or once per test) and shared behind an
/// `Arc` across request handlers; caches grow monotonically and are never
/// invalidated. Interior mutability goes through `Mutex` rather than
/// `RefCell` so the oracle stays `Sync` and can live in an `axum` `State`.
pub struct TerrainOracle {
    protected_areas: Vec<TerrainFeature>,
    rivers: Vec<TerrainFeature>,
    roads: Vec<TerrainFeature>,
    settlements: Vec<TerrainFeature>,

    rng: Mutex<StdRng>,

    elevation_cache: Mutex<HashMap<CacheKey, f64>>,
    slope_cache: Mutex<HashMap<CacheKey, f64>>,
    soil_cache: Mutex<HashMap<CacheKey, SoilType>>,
    protected_cache: Mutex<HashMap<CacheKey, (bool, f64)>>,
    water_cache: Mutex<HashMap<CacheKey, (bool, f64)>>,
    road_cache: Mutex<HashMap<CacheKey, (bool, f64)>>,
    settlement_cache: Mutex<HashMap<CacheKey, (bool, f64)>>,
    difficulty_cache: Mutex<HashMap<CacheKey, f64>>,
    accessibility_cache: Mutex<HashMap<CacheKey, f64>>,
}

impl TerrainOracle {
    pub fn new(seed: u64) -> Self {
        Self {
            protected_areas: protected_areas(),
            rivers: rivers(),
            roads: roads(),
            settlements: settlements(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            elevation_cache: Mutex::new(HashMap::new()),
            slope_cache: Mutex::new(HashMap::new()),
            soil_cache: Mutex::new(HashMap::new()),
            protected_cache: Mutex::new(HashMap::new()),
            water_cache: Mutex::new(HashMap::new()),
            road_cache: Mutex::new(HashMap::new()),
            settlement_cache: Mutex::new(HashMap::new()),
            difficulty_cache: Mutex::new(HashMap::new()),
            accessibility_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Synthetic elevation in metres: a smooth analytic surface plus noise
    /// sampled once per unique rounded coordinate.
    pub fn elevation(&self, lat: f64, lng: f64) -> f64 {
        let key = CacheKey::new(lat, lng);
        let mut cache = self.elevation_cache.lock().unwrap();
        if let Some(&v) = cache.get(&key) {
            return v;
        }

        const BASE: f64 = 500.0;
        const A: f64 = 200.0;
        const B: f64 = 150.0;

        let x_factor = (lat * 10.0).sin() * (lng * 8.0).cos() * A;
        let y_factor = (lng * 12.0).sin() * (lat * 9.0).cos() * B;
        let noise = self.rng.lock().unwrap().gen_range(-50.0..=50.0);

        let elevation = BASE + x_factor + y_factor + noise;
        cache.insert(key, elevation);
        elevation
    }

    /// Slope in [0, 1]: max elevation delta to the north/east neighbor at
    /// +0.001°, scaled by 1/100 and clamped.
    pub fn slope(&self, lat: f64, lng: f64) -> f64 {
        let key = CacheKey::new(lat, lng);
        let mut cache = self.slope_cache.lock().unwrap();
        if let Some(&v) = cache.get(&key) {
            return v;
        }

        const GRID: f64 = 0.001;
        let center = self.elevation(lat, lng);
        let north = self.elevation(lat + GRID, lng);
        let east = self.elevation(lat, lng + GRID);

        let slope_north = ((north - center).abs() / 100.0).min(1.0);
        let slope_east = ((east - center).abs() / 100.0).min(1.0);
        let slope = slope_north.max(slope_east);

        cache.insert(key, slope);
        slope
    }

    /// Coordinate-derived soil classification.
    pub fn soil_type(&self, lat: f64, lng: f64) -> SoilType {
        let key = CacheKey::new(lat, lng);
        let mut cache = self.soil_cache.lock().unwrap();
        if let Some(&v) = cache.get(&key) {
            return v;
        }

        let value = ((lat * 100.0).sin() + 1.0) / 2.0 + ((lng * 100.0).cos() + 1.0) / 2.0;
        let value = value / 2.0;

        let index = ((value * 5.0).floor() as usize).min(4);
        let soil = match index {
            0 => SoilType::Clay,
            1 => SoilType::Loam,
            2 => SoilType::Sand,
            3 => SoilType::Rock,
            _ => SoilType::Peat,
        };

        cache.insert(key, soil);
        soil
    }

    /// `(is_protected, impact_factor)`.
    pub fn is_protected_area(&self, lat: f64, lng: f64) -> (bool, f64) {
        let key = CacheKey::new(lat, lng);
        let mut cache = self.protected_cache.lock().unwrap();
        if let Some(&v) = cache.get(&key) {
            return v;
        }

        let p = GeoPoint::new(lat, lng);
        let result = self
            .protected_areas
            .iter()
            .find_map(|f| match f {
                TerrainFeature::ProtectedArea { center, radius_deg, impact_factor, .. } => {
                    if angular_distance(p, *center) <= *radius_deg {
                        Some((true, *impact_factor))
                    } else {
                        None
                    }
                }
                _ => None,
            })
            .unwrap_or((false, 0.0));

        cache.insert(key, result);
        result
    }

    /// `(is_water_crossing, crossing_difficulty)`.
    pub fn is_water_crossing(&self, lat: f64, lng: f64) -> (bool, f64) {
        let key = CacheKey::new(lat, lng);
        let mut cache = self.water_cache.lock().unwrap();
        if let Some(&v) = cache.get(&key) {
            return v;
        }

        let p = GeoPoint::new(lat, lng);
        let result = self
            .rivers
            .iter()
            .find_map(|f| match f {
                TerrainFeature::River { points, half_width_deg, crossing_difficulty, .. } => {
                    points.windows(2).find_map(|seg| {
                        if point_to_segment_distance(p, seg[0], seg[1]) <= *half_width_deg {
                            Some((true, *crossing_difficulty))
                        } else {
                            None
                        }
                    })
                }
                _ => None,
            })
            .unwrap_or((false, 0.0));

        cache.insert(key, result);
        result
    }

    /// `(is_near_road, bonus)`. Directly on-road is penalized (negative
    /// bonus); the sweet spot is between 1x and 5x the road half-width,
    /// peaking at 2x.
    pub fn near_road(&self, lat: f64, lng: f64) -> (bool, f64) {
        let key = CacheKey::new(lat, lng);
        let mut cache = self.road_cache.lock().unwrap();
        if let Some(&v) = cache.get(&key) {
            return v;
        }

        let p = GeoPoint::new(lat, lng);
        let mut result = (false, 0.0);

        'roads: for f in &self.roads {
            if let TerrainFeature::Road { points, half_width_deg, accessibility_bonus, .. } = f {
                for seg in points.windows(2) {
                    let dist = point_to_segment_distance(p, seg[0], seg[1]);
                    if dist <= *half_width_deg {
                        result = (true, -0.2);
                        break 'roads;
                    } else if dist <= *half_width_deg * 5.0 {
                        let optimal_dist = *half_width_deg * 2.0;
                        let proximity_factor =
                            1.0 - (dist - optimal_dist).abs() / (*half_width_deg * 3.0);
                        result = (true, accessibility_bonus * proximity_factor);
                        break 'roads;
                    }
                }
            }
        }

        cache.insert(key, result);
        result
    }

    /// `(is_near_settlement, restriction_factor)`.
    pub fn near_settlement(&self, lat: f64, lng: f64) -> (bool, f64) {
        let key = CacheKey::new(lat, lng);
        let mut cache = self.settlement_cache.lock().unwrap();
        if let Some(&v) = cache.get(&key) {
            return v;
        }

        let p = GeoPoint::new(lat, lng);
        let result = self
            .settlements
            .iter()
            .find_map(|f| match f {
                TerrainFeature::Settlement { center, radius_deg, restriction_factor, .. } => {
                    if angular_distance(p, *center) <= *radius_deg {
                        Some((true, *restriction_factor))
                    } else {
                        None
                    }
                }
                _ => None,
            })
            .unwrap_or((false, 0.0));

        cache.insert(key, result);
        result
    }

    /// Aggregate terrain difficulty in [0, 1].
    pub fn terrain_difficulty(&self, lat: f64, lng: f64) -> f64 {
        let key = CacheKey::new(lat, lng);
        {
            let cache = self.difficulty_cache.lock().unwrap();
            if let Some(&v) = cache.get(&key) {
                return v;
            }
        }

        let slope = self.slope(lat, lng);
        let soil = self.soil_type(lat, lng);
        let (is_water, water_difficulty) = self.is_water_crossing(lat, lng);
        let (is_protected, protection_factor) = self.is_protected_area(lat, lng);
        let (is_settlement, settlement_restriction) = self.near_settlement(lat, lng);

        let mut difficulty = 0.3 * slope + 0.2 * soil.difficulty_factor();
        if is_water {
            difficulty += 0.25 * water_difficulty;
        }
        if is_protected {
            difficulty += 0.15 * protection_factor;
        }
        if is_settlement {
            difficulty += 0.1 * settlement_restriction;
        }
        let difficulty = difficulty.clamp(0.0, 1.0);

        self.difficulty_cache.lock().unwrap().insert(key, difficulty);
        difficulty
    }

    /// Accessibility in [0, 1]: inverse of terrain difficulty, adjusted by
    /// road proximity. Note the road bonus can itself be negative (directly
    /// on-road), which can push accessibility below the base — preserved as
    /// specified; see DESIGN.md.
    pub fn accessibility(&self, lat: f64, lng: f64) -> f64 {
        let key = CacheKey::new(lat, lng);
        {
            let cache = self.accessibility_cache.lock().unwrap();
            if let Some(&v) = cache.get(&key) {
                return v;
            }
        }

        let difficulty = self.terrain_difficulty(lat, lng);
        let mut access = 1.0 - difficulty * 0.6;

        let (is_near_road, road_bonus) = self.near_road(lat, lng);
        if is_near_road {
            access += road_bonus * 0.4;
        }
        let access = access.clamp(0.0, 1.0);

        self.accessibility_cache.lock().unwrap().insert(key, access);
        access
    }

    /// False outside Earth bounds, inside a hard-forbidden zone, or inside a
    /// catalog protected area/settlement with an extreme factor (> 0.95).
    /// The hard list overrides the soft catalog.
    pub fn is_valid_position(&self, lat: f64, lng: f64) -> bool {
        let p = GeoPoint::new(lat, lng);
        if !p.in_bounds() {
            return false;
        }

        for zone in forbidden_zones() {
            if angular_distance(p, zone.center) <= zone.radius_deg {
                return false;
            }
        }

        let (is_protected, impact_factor) = self.is_protected_area(lat, lng);
        if is_protected && impact_factor > 0.95 {
            return false;
        }

        let (is_settlement, restriction_factor) = self.near_settlement(lat, lng);
        if is_settlement && restriction_factor > 0.95 {
            return false;
        }

        true
    }

    /// Grid-sampled terrain data plus intersecting catalog features, for the
    /// `/api/terrain` read endpoint.
    pub fn get_terrain_data(&self, north: f64, south: f64, east: f64, west: f64) -> TerrainDataResponse {
        const RESOLUTION: f64 = 0.01;

        let mut grid = Vec::new();
        let mut lat = south;
        while lat <= north {
            let mut row = Vec::new();
            let mut lng = west;
            while lng <= east {
                row.push(TerrainCell {
                    position: GeoPoint::new(lat, lng),
                    elevation: self.elevation(lat, lng),
                    difficulty: self.terrain_difficulty(lat, lng),
                    accessibility: self.accessibility(lat, lng),
                });
                lng += RESOLUTION;
            }
            grid.push(row);
            lat += RESOLUTION;
        }

        let mut features = Vec::new();
        for f in &self.rivers {
            if let TerrainFeature::River { name, points, half_width_deg, .. } = f {
                if points.iter().any(|p| south <= p.lat && p.lat <= north && west <= p.lng && p.lng <= east) {
                    features.push(TerrainFeatureSummary::River {
                        name: (*name).to_string(),
                        points: points.clone(),
                        half_width_deg: *half_width_deg,
                    });
                }
            }
        }
        for f in &self.roads {
            if let TerrainFeature::Road { name, points, .. } = f {
                if points.iter().any(|p| south <= p.lat && p.lat <= north && west <= p.lng && p.lng <= east) {
                    features.push(TerrainFeatureSummary::Road {
                        name: (*name).to_string(),
                        points: points.clone(),
                    });
                }
            }
        }
        for f in &self.settlements {
            if let TerrainFeature::Settlement { name, center, radius_deg, .. } = f {
                if south - radius_deg <= center.lat
                    && center.lat <= north + radius_deg
                    && west - radius_deg <= center.lng
                    && center.lng <= east + radius_deg
                {
                    features.push(TerrainFeatureSummary::Settlement {
                        name: (*name).to_string(),
                        center: *center,
                        radius_deg: *radius_deg,
                    });
                }
            }
        }
        for f in &self.protected_areas {
            if let TerrainFeature::ProtectedArea { name, center, radius_deg, .. } = f {
                if south - radius_deg <= center.lat
                    && center.lat <= north + radius_deg
                    && west - radius_deg <= center.lng
                    && center.lng <= east + radius_deg
                {
                    features.push(TerrainFeatureSummary::ProtectedArea {
                        name: (*name).to_string(),
                        center: *center,
                        radius_deg: *radius_deg,
                    });
                }
            }
        }

        TerrainDataResponse {
            grid,
            features,
            bounds: BoundingBox { north, south, east, west },
        }
    }
}

impl Default for TerrainOracle {
    fn default() -> Self {
        Self::new(crate::config::EngineConfig::default().oracle_seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevation_is_idempotent() {
        let oracle = TerrainOracle::new(1);
        let a = oracle.elevation(52.3, 104.3);
        let b = oracle.elevation(52.3, 104.3);
        assert_eq!(a, b);
    }

    #[test]
    fn elevation_idempotent_under_rounding() {
        let oracle = TerrainOracle::new(1);
        // These round to the same 5-decimal cache key.
        let a = oracle.elevation(52.300001, 104.300001);
        let b = oracle.elevation(52.3000012, 104.3000013);
        assert_eq!(a, b);
    }

    #[test]
    fn two_oracles_same_seed_agree() {
        let a = TerrainOracle::new(42);
        let b = TerrainOracle::new(42);
        assert_eq!(a.elevation(52.1, 104.1), b.elevation(52.1, 104.1));
        assert_eq!(a.terrain_difficulty(52.1, 104.1), b.terrain_difficulty(52.1, 104.1));
    }

    #[test]
    fn slope_is_clamped_to_unit_range() {
        let oracle = TerrainOracle::new(7);
        for _ in 0..50 {
            let s = oracle.slope(52.3, 104.3);
            assert!((0.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn soil_type_is_one_of_five_and_idempotent() {
        let oracle = TerrainOracle::new(3);
        let a = oracle.soil_type(52.33, 104.21);
        let b = oracle.soil_type(52.33, 104.21);
        assert_eq!(a, b);
    }

    #[test]
    fn is_valid_position_false_outside_earth_bounds() {
        let oracle = TerrainOracle::new(1);
        assert!(!oracle.is_valid_position(91.0, 0.0));
        assert!(!oracle.is_valid_position(0.0, 200.0));
    }

    #[test]
    fn is_valid_position_false_inside_irkutsk() {
        let oracle = TerrainOracle::new(1);
        assert!(!oracle.is_valid_position(52.3, 104.3));
    }

    #[test]
    fn is_valid_position_true_far_from_any_zone() {
        let oracle = TerrainOracle::new(1);
        assert!(oracle.is_valid_position(10.0, 10.0));
    }

    #[test]
    fn near_road_on_road_is_penalized() {
        let oracle = TerrainOracle::new(1);
        let (near, bonus) = oracle.near_road(52.3, 104.3);
        assert!(near);
        assert_eq!(bonus, -0.2);
    }

    #[test]
    fn near_road_false_far_away() {
        let oracle = TerrainOracle::new(1);
        let (near, bonus) = oracle.near_road(10.0, 10.0);
        assert!(!near);
        assert_eq!(bonus, 0.0);
    }

    #[test]
    fn is_water_crossing_detects_angara() {
        let oracle = TerrainOracle::new(1);
        let (is_water, difficulty) = oracle.is_water_crossing(52.4, 104.25);
        assert!(is_water);
        assert_eq!(difficulty, 0.8);
    }

    #[test]
    fn terrain_difficulty_in_unit_range() {
        let oracle = TerrainOracle::new(9);
        for (lat, lng) in [(52.3, 104.3), (10.0, 10.0), (53.5, 107.8)] {
            let d = oracle.terrain_difficulty(lat, lng);
            assert!((0.0..=1.0).contains(&d), "got {d}");
        }
    }

    #[test]
    fn accessibility_in_unit_range() {
        let oracle = TerrainOracle::new(9);
        for (lat, lng) in [(52.3, 104.3), (10.0, 10.0), (53.5, 107.8)] {
            let a = oracle.accessibility(lat, lng);
            assert!((0.0..=1.0).contains(&a), "got {a}");
        }
    }

    #[test]
    fn get_terrain_data_includes_angara_in_bbox() {
        let oracle = TerrainOracle::new(1);
        let data = oracle.get_terrain_data(53.0, 52.0, 105.0, 104.0);
        assert!(!data.grid.is_empty());
        assert!(data
            .features
            .iter()
            .any(|f| matches!(f, TerrainFeatureSummary::River { name, .. } if name == "Angara")));
    }
}
