//! The static terrain feature catalog and the hard forbidden-zone list.
//!
//! Values are ported verbatim from
//! `original_source/route_planner/terrain.py` (`_load_protected_areas`,
//! `_load_rivers`, `_load_roads`, `_load_settlements`, and the
//! `restricted_cities` / `protected_areas` lists inside `is_valid_position`).

use crate::geodesy::GeoPoint;

/// One entry in the terrain feature catalog. A closed, tagged set —
/// no open polymorphism, per the containment predicates each variant needs.
#[derive(Debug, Clone)]
pub enum TerrainFeature {
    ProtectedArea {
        name: &'static str,
        center: GeoPoint,
        radius_deg: f64,
        impact_factor: f64,
    },
    River {
        name: &'static str,
        points: Vec<GeoPoint>,
        half_width_deg: f64,
        crossing_difficulty: f64,
    },
    Road {
        name: &'static str,
        points: Vec<GeoPoint>,
        half_width_deg: f64,
        accessibility_bonus: f64,
    },
    Settlement {
        name: &'static str,
        center: GeoPoint,
        radius_deg: f64,
        population: u32,
        restriction_factor: f64,
    },
}

/// A hard exclusion circle (city or major reserve), enforced by
/// `is_valid_position` regardless of the soft catalog above.
#[derive(Debug, Clone, Copy)]
pub struct ForbiddenZone {
    pub name: &'static str,
    pub center: GeoPoint,
    pub radius_deg: f64,
}

pub fn protected_areas() -> Vec<TerrainFeature> {
    vec![
        TerrainFeature::ProtectedArea {
            name: "Pribaikalsky National Park",
            center: GeoPoint::new(52.0, 105.5),
            radius_deg: 0.5,
            impact_factor: 0.9,
        },
        TerrainFeature::ProtectedArea {
            name: "Baikalo-Lensky Nature Reserve",
            center: GeoPoint::new(53.5, 107.8),
            radius_deg: 0.4,
            impact_factor: 0.95,
        },
    ]
}

pub fn rivers() -> Vec<TerrainFeature> {
    vec![
        TerrainFeature::River {
            name: "Angara",
            points: vec![
                GeoPoint::new(52.3, 104.3),
                GeoPoint::new(52.5, 104.2),
                GeoPoint::new(52.7, 104.0),
                GeoPoint::new(52.9, 103.8),
            ],
            half_width_deg: 0.01,
            crossing_difficulty: 0.8,
        },
        TerrainFeature::River {
            name: "Lena",
            points: vec![
                GeoPoint::new(53.1, 105.5),
                GeoPoint::new(53.3, 105.7),
                GeoPoint::new(53.5, 105.9),
            ],
            half_width_deg: 0.008,
            crossing_difficulty: 0.7,
        },
    ]
}

pub fn roads() -> Vec<TerrainFeature> {
    vec![
        TerrainFeature::Road {
            name: "M53",
            points: vec![
                GeoPoint::new(52.2, 104.1),
                GeoPoint::new(52.3, 104.3),
                GeoPoint::new(52.4, 104.5),
            ],
            half_width_deg: 0.003,
            accessibility_bonus: 0.6,
        },
        TerrainFeature::Road {
            name: "M55",
            points: vec![
                GeoPoint::new(52.3, 104.3),
                GeoPoint::new(52.3, 104.5),
                GeoPoint::new(52.3, 104.7),
            ],
            half_width_deg: 0.002,
            accessibility_bonus: 0.5,
        },
    ]
}

pub fn settlements() -> Vec<TerrainFeature> {
    vec![
        TerrainFeature::Settlement {
            name: "Irkutsk",
            center: GeoPoint::new(52.3, 104.3),
            radius_deg: 0.1,
            population: 600_000,
            restriction_factor: 0.8,
        },
        TerrainFeature::Settlement {
            name: "Angarsk",
            center: GeoPoint::new(52.5, 103.9),
            radius_deg: 0.07,
            population: 220_000,
            restriction_factor: 0.7,
        },
    ]
}

/// Hard-forbidden cities and reserves. Overrides the soft catalog above in
/// `is_valid_position` regardless of impact/restriction factor.
pub const FORBIDDEN_ZONES: &[ForbiddenZoneDef] = &[
    ForbiddenZoneDef { name: "Irkutsk", lat: 52.3, lng: 104.3, radius_deg: 0.12 },
    ForbiddenZoneDef { name: "Angarsk", lat: 52.5, lng: 103.9, radius_deg: 0.08 },
    ForbiddenZoneDef { name: "Shelekhov", lat: 52.2, lng: 104.08, radius_deg: 0.04 },
    ForbiddenZoneDef { name: "Usolye-Sibirskoye", lat: 52.75, lng: 103.65, radius_deg: 0.05 },
    ForbiddenZoneDef { name: "Pribaikalsky National Park", lat: 53.2, lng: 107.35, radius_deg: 0.35 },
    ForbiddenZoneDef { name: "Baikalo-Lensky Nature Reserve", lat: 53.9, lng: 108.0, radius_deg: 0.40 },
    ForbiddenZoneDef { name: "Baikalsky Nature Reserve", lat: 51.5, lng: 105.0, radius_deg: 0.30 },
];

/// Const-friendly definition; converted to [`ForbiddenZone`] (with a real
/// [`GeoPoint`]) by [`forbidden_zones`].
pub struct ForbiddenZoneDef {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub radius_deg: f64,
}

pub fn forbidden_zones() -> impl Iterator<Item = ForbiddenZone> {
    FORBIDDEN_ZONES.iter().map(|z| ForbiddenZone {
        name: z.name,
        center: GeoPoint::new(z.lat, z.lng),
        radius_deg: z.radius_deg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_zone_count_matches_reference() {
        assert_eq!(FORBIDDEN_ZONES.len(), 7);
    }

    #[test]
    fn catalog_lists_nonempty() {
        assert!(!protected_areas().is_empty());
        assert!(!rivers().is_empty());
        assert!(!roads().is_empty());
        assert!(!settlements().is_empty());
    }
}
