/// Offline route runner: exercises the engine without the HTTP facade, for
/// scripted and CI use.
use anyhow::{Context, Result};
use clap::Parser;

use pipeline_core::engine::{plan_routes, RoutingRequest};
use pipeline_core::validate::{validate_request, RawRouteRequest};
use pipeline_core::{EngineConfig, TerrainOracle};

#[derive(Parser, Debug)]
#[command(name = "route-cli", about = "Compute a pipeline route from the command line")]
struct Args {
    /// Start point, "lat,lng".
    #[arg(long)]
    start: String,

    /// End point, "lat,lng".
    #[arg(long)]
    end: String,

    /// Pipe fluid type: oil, gas, or water.
    #[arg(long, default_value = "oil")]
    pipe_type: String,

    /// Pipe diameter in millimetres, 100-2000.
    #[arg(long, default_value = "500")]
    diameter: f64,

    /// Pipe material: steel, plastic, or composite.
    #[arg(long, default_value = "steel")]
    material: String,

    /// Maximum operating pressure in atm, 1-100.
    #[arg(long, default_value = "50")]
    max_pressure: f64,

    /// Number of alternative routes to compute in addition to the primary.
    #[arg(long, default_value = "2")]
    alternatives: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let raw = RawRouteRequest {
        start_point: args.start,
        end_point: args.end,
        pipe_type: serde_json::from_value(serde_json::Value::String(args.pipe_type))
            .context("invalid --pipe-type")?,
        pipe_diameter: args.diameter,
        pipe_material: serde_json::from_value(serde_json::Value::String(args.material))
            .context("invalid --material")?,
        max_pressure: args.max_pressure,
        criteria_weights: Default::default(),
        num_alternatives: Some(args.alternatives),
    };

    let validated = validate_request(&raw).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let config = EngineConfig::default();
    let oracle = TerrainOracle::new(config.oracle_seed);

    let request = RoutingRequest {
        start: validated.start,
        goal: validated.goal,
        pipe: validated.pipe,
        weights: validated.weights,
        num_alternatives: validated.num_alternatives,
    };

    let routes = plan_routes(&request, &oracle, &config).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    println!("{}", serde_json::to_string_pretty(&routes)?);
    Ok(())
}
