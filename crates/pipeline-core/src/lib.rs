//! Core multi-criteria route-planning engine: terrain oracle, A* search
//! (standard and adaptive), cost model, and the facade that ties them
//! together for callers (`pipeline-server`, `tools/route-cli`).

pub mod config;
pub mod costs;
pub mod engine;
pub mod error;
pub mod geodesy;
pub mod model;
pub mod narrative;
pub mod search;
pub mod terrain;
pub mod validate;

pub use config::EngineConfig;
pub use engine::{plan_routes, RoutingRequest};
pub use error::{Result, RouteError};
pub use geodesy::GeoPoint;
pub use model::{CriteriaWeights, Criterion, PipeMaterial, PipeParams, PipeType, RouteMetrics, RouteResult};
pub use terrain::TerrainOracle;
pub use validate::{validate_request, RawRouteRequest, ValidatedRequest};
