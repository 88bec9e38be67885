use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use pipeline_core::engine::{plan_routes, RoutingRequest};
use pipeline_core::narrative::{construction_time_days, describe_route, format_construction_time};
use pipeline_core::validate::{validate_request, RawRouteRequest};
use pipeline_core::RouteResult;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    fn new(error: impl ToString) -> Self {
        Self { success: false, error: error.to_string() }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteView {
    pub route: Vec<pipeline_core::GeoPoint>,
    pub total_distance: f64,
    pub estimated_cost: f64,
    pub terrain_difficulty: f64,
    pub environmental_impact: f64,
    pub construction_time: String,
    pub route_description: String,
    pub alternative_num: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CalculateRouteResponse {
    pub success: bool,
    pub routes: Vec<RouteView>,
}

fn to_view(result: &RouteResult, request: &RawRouteRequest, oracle: &pipeline_core::TerrainOracle, start: pipeline_core::GeoPoint, goal: pipeline_core::GeoPoint) -> RouteView {
    let weights = request.criteria_weights.merged_with_defaults();
    let days = construction_time_days(&result.metrics, request.pipe_diameter, request.pipe_type);

    RouteView {
        route: result.polyline.clone(),
        total_distance: result.metrics.total_distance,
        estimated_cost: result.metrics.estimated_cost,
        terrain_difficulty: result.metrics.terrain_difficulty_score,
        environmental_impact: result.metrics.environmental_impact_score,
        construction_time: format_construction_time(days),
        route_description: describe_route(start, goal, result, &weights, oracle),
        alternative_num: result.metrics.alternative_num,
    }
}

/// `POST /api/calculate_route`. Thin: parse, validate, call into
/// `pipeline-core`, serialize. No business logic lives here.
pub async fn calculate_route(
    State(state): State<AppState>,
    Json(request): Json<RawRouteRequest>,
) -> Result<Json<CalculateRouteResponse>, (StatusCode, Json<ApiError>)> {
    let validated = validate_request(&request).map_err(|e| (StatusCode::BAD_REQUEST, Json(ApiError::new(e))))?;

    let routing_request = RoutingRequest {
        start: validated.start,
        goal: validated.goal,
        pipe: validated.pipe,
        weights: validated.weights,
        num_alternatives: validated.num_alternatives,
    };

    let routes = plan_routes(&routing_request, &state.oracle, &state.config).map_err(|e| {
        error!(error = %e, "route calculation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiError::new(e)))
    })?;

    let views = routes
        .iter()
        .map(|r| to_view(r, &request, &state.oracle, validated.start, validated.goal))
        .collect();

    Ok(Json(CalculateRouteResponse { success: true, routes: views }))
}

#[derive(Debug, Deserialize)]
pub struct TerrainQuery {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

#[derive(Debug, Serialize)]
pub struct TerrainResponse {
    pub success: bool,
    pub terrain_data: pipeline_core::terrain::TerrainDataResponse,
}

/// `GET /api/terrain?north&south&east&west`.
pub async fn terrain(
    State(state): State<AppState>,
    Query(query): Query<TerrainQuery>,
) -> Json<TerrainResponse> {
    let terrain_data = state.oracle.get_terrain_data(query.north, query.south, query.east, query.west);
    Json(TerrainResponse { success: true, terrain_data })
}
