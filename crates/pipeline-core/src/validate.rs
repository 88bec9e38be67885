//! Request validation: coordinate parsing and range/distinctness checks.
//!
//! Ported from `original_source/route_planner/utils.py::parse_coordinates`
//! and `validate_input`.

use serde::{Deserialize, Serialize};

use crate::error::{RouteError, Result};
use crate::geodesy::GeoPoint;
use crate::model::{CriteriaWeights, PipeMaterial, PipeParams, PipeType};

/// Parses a `"lat,lng"` string into a [`GeoPoint`], validating both ranges.
pub fn parse_coordinates(s: &str) -> Result<GeoPoint> {
    let (lat_str, lng_str) = s
        .split_once(',')
        .ok_or_else(|| RouteError::Input(format!("invalid coordinate format: {s}")))?;

    let lat: f64 = lat_str
        .trim()
        .parse()
        .map_err(|_| RouteError::Input(format!("invalid latitude: {lat_str}")))?;
    let lng: f64 = lng_str
        .trim()
        .parse()
        .map_err(|_| RouteError::Input(format!("invalid longitude: {lng_str}")))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(RouteError::Input(format!("latitude out of range: {lat}")));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(RouteError::Input(format!("longitude out of range: {lng}")));
    }

    Ok(GeoPoint::new(lat, lng))
}

/// Partial weight overrides from a request body — only the named criteria
/// are overridden, the rest keep [`CriteriaWeights::default_weights`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaWeightsInput {
    pub distance: Option<f64>,
    pub terrain_difficulty: Option<f64>,
    pub environmental_impact: Option<f64>,
    pub construction_cost: Option<f64>,
    pub maintenance_access: Option<f64>,
}

impl CriteriaWeightsInput {
    pub fn merged_with_defaults(&self) -> CriteriaWeights {
        let mut w = CriteriaWeights::default_weights();
        if let Some(v) = self.distance {
            w.distance = v;
        }
        if let Some(v) = self.terrain_difficulty {
            w.terrain_difficulty = v;
        }
        if let Some(v) = self.environmental_impact {
            w.environmental_impact = v;
        }
        if let Some(v) = self.construction_cost {
            w.construction_cost = v;
        }
        if let Some(v) = self.maintenance_access {
            w.maintenance_access = v;
        }
        w
    }
}

/// Raw, unvalidated request fields (one per field named in spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRouteRequest {
    pub start_point: String,
    pub end_point: String,
    pub pipe_type: PipeType,
    pub pipe_diameter: f64,
    pub pipe_material: PipeMaterial,
    pub max_pressure: f64,
    #[serde(default)]
    pub criteria_weights: CriteriaWeightsInput,
    #[serde(default)]
    pub num_alternatives: Option<u32>,
}

/// A fully validated, type-safe request ready for [`crate::engine::plan_routes`].
#[derive(Debug, Clone, Copy)]
pub struct ValidatedRequest {
    pub start: GeoPoint,
    pub goal: GeoPoint,
    pub pipe: PipeParams,
    pub weights: CriteriaWeights,
    pub num_alternatives: u32,
}

/// Mirrors `validate_input`: required fields, coordinate parse + range +
/// distinctness, diameter `[100, 2000]`, pressure `[1, 100]`.
pub fn validate_request(raw: &RawRouteRequest) -> Result<ValidatedRequest> {
    if raw.start_point.trim().is_empty() {
        return Err(RouteError::Input("startPoint is required".to_string()));
    }
    if raw.end_point.trim().is_empty() {
        return Err(RouteError::Input("endPoint is required".to_string()));
    }

    let start = parse_coordinates(&raw.start_point)?;
    let goal = parse_coordinates(&raw.end_point)?;

    if start == goal {
        return Err(RouteError::Input("start and end points must be distinct".to_string()));
    }

    if !(100.0..=2000.0).contains(&raw.pipe_diameter) {
        return Err(RouteError::Input(format!("pipeDiameter out of range: {}", raw.pipe_diameter)));
    }
    if !(1.0..=100.0).contains(&raw.max_pressure) {
        return Err(RouteError::Input(format!("maxPressure out of range: {}", raw.max_pressure)));
    }

    Ok(ValidatedRequest {
        start,
        goal,
        pipe: PipeParams {
            pipe_type: raw.pipe_type,
            diameter_mm: raw.pipe_diameter,
            material: raw.pipe_material,
            max_pressure: raw.max_pressure,
        },
        weights: raw.criteria_weights.merged_with_defaults(),
        num_alternatives: raw.num_alternatives.unwrap_or(2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_raw() -> RawRouteRequest {
        RawRouteRequest {
            start_point: "52.30,104.40".to_string(),
            end_point: "52.32,104.42".to_string(),
            pipe_type: PipeType::Gas,
            pipe_diameter: 700.0,
            pipe_material: PipeMaterial::Steel,
            max_pressure: 50.0,
            criteria_weights: CriteriaWeightsInput::default(),
            num_alternatives: Some(2),
        }
    }

    #[test]
    fn parse_coordinates_round_trips() {
        let p = parse_coordinates("52.3,104.3").unwrap();
        assert_eq!(p, GeoPoint::new(52.3, 104.3));
    }

    #[test]
    fn parse_coordinates_rejects_out_of_range_latitude() {
        assert!(parse_coordinates("91.0,0.0").is_err());
    }

    #[test]
    fn parse_coordinates_rejects_malformed_input() {
        assert!(parse_coordinates("not-a-coordinate").is_err());
    }

    #[test]
    fn validate_request_accepts_valid_input() {
        assert!(validate_request(&valid_raw()).is_ok());
    }

    #[test]
    fn validate_request_rejects_identical_endpoints() {
        let mut raw = valid_raw();
        raw.end_point = raw.start_point.clone();
        assert!(validate_request(&raw).is_err());
    }

    #[test]
    fn validate_request_rejects_diameter_boundaries() {
        let mut raw = valid_raw();
        raw.pipe_diameter = 99.0;
        assert!(validate_request(&raw).is_err());
        raw.pipe_diameter = 2001.0;
        assert!(validate_request(&raw).is_err());
        raw.pipe_diameter = 100.0;
        assert!(validate_request(&raw).is_ok());
        raw.pipe_diameter = 2000.0;
        assert!(validate_request(&raw).is_ok());
    }

    #[test]
    fn validate_request_merges_partial_weight_overrides() {
        let mut raw = valid_raw();
        raw.criteria_weights = CriteriaWeightsInput { distance: Some(0.9), ..Default::default() };
        let validated = validate_request(&raw).unwrap();
        assert_eq!(validated.weights.distance, 0.9);
        assert_eq!(validated.weights.terrain_difficulty, CriteriaWeights::default_weights().terrain_difficulty);
    }
}
