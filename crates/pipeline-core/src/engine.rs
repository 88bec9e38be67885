//! Engine facade: accepts one routing request, normalizes weights, drives
//! the search, and assembles the primary route plus alternatives.

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{Result, RouteError};
use crate::geodesy::GeoPoint;
use crate::model::{CriteriaWeights, PipeParams, RouteResult};
use crate::search::alternatives::find_paths;
use crate::terrain::TerrainOracle;

/// One routing request: endpoints, pipe parameters, unnormalized criteria
/// weights (already merged with defaults by the caller), and how many
/// alternatives to produce.
#[derive(Debug, Clone, Copy)]
pub struct RoutingRequest {
    pub start: GeoPoint,
    pub goal: GeoPoint,
    pub pipe: PipeParams,
    pub weights: CriteriaWeights,
    pub num_alternatives: u32,
}

/// Plans the primary route and up to `request.num_alternatives` alternates.
///
/// Per §7, search exhaustion on the primary route is not an error: it
/// degrades to an empty route list rather than propagating. Only
/// [`RouteError::Input`] (which should already have been caught by
/// validation before this call) would propagate here.
pub fn plan_routes(request: &RoutingRequest, oracle: &TerrainOracle, config: &EngineConfig) -> Result<Vec<RouteResult>> {
    let weights = request.weights.normalized();

    info!(
        start = ?request.start,
        goal = ?request.goal,
        alternatives = request.num_alternatives,
        "planning route"
    );

    match find_paths(
        request.start,
        request.goal,
        &weights,
        &request.pipe,
        oracle,
        config,
        request.num_alternatives,
    ) {
        Ok(routes) => Ok(routes),
        Err(RouteError::SearchExhausted) => {
            warn!(start = ?request.start, goal = ?request.goal, "search exhausted, returning empty route list");
            Ok(Vec::new())
        }
        Err(other) => Err(other),
    }
}
