//! Pure cost-model functions: construction cost and environmental impact.
//!
//! Ported from `original_source/route_planner/costs.py`; constants and
//! formulas are copied exactly.

use crate::model::{PipeMaterial, PipeType};

fn material_factor(material: PipeMaterial) -> f64 {
    match material {
        PipeMaterial::Steel => 1.0,
        PipeMaterial::Plastic => 0.8,
        PipeMaterial::Composite => 1.4,
    }
}

fn pipe_type_cost_factor(pipe_type: PipeType) -> f64 {
    match pipe_type {
        PipeType::Oil => 1.2,
        PipeType::Gas => 1.3,
        PipeType::Water => 0.9,
    }
}

fn pipe_type_impact_base(pipe_type: PipeType) -> f64 {
    match pipe_type {
        PipeType::Oil => 0.7,
        PipeType::Gas => 0.5,
        PipeType::Water => 0.2,
    }
}

/// Estimated construction cost in millions of currency units for a segment
/// of length `distance_km`.
pub fn construction_cost(
    distance_km: f64,
    diameter_mm: f64,
    material: PipeMaterial,
    terrain_difficulty: f64,
    pipe_type: PipeType,
) -> f64 {
    let base_cost_per_km = 2e-5 * diameter_mm * diameter_mm + 0.01 * diameter_mm;
    let terrain_factor = 1.0 + terrain_difficulty * terrain_difficulty * 2.0;

    base_cost_per_km
        * material_factor(material)
        * pipe_type_cost_factor(pipe_type)
        * terrain_factor
        * distance_km
}

/// Environmental impact score in [0, 1].
pub fn environmental_impact(pipe_type: PipeType, diameter_mm: f64, terrain_difficulty: f64) -> f64 {
    let base_impact = pipe_type_impact_base(pipe_type);

    let diameter_normalized = ((diameter_mm - 100.0) / 1900.0).clamp(0.0, 1.0);
    let diameter_factor = 0.3 + diameter_normalized * 0.7;

    let terrain_factor = 0.5 + terrain_difficulty * 0.5;

    let impact = base_impact * 0.5 + diameter_factor * 0.2 + terrain_factor * 0.3;
    impact.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn construction_cost_increasing_in_distance() {
        let short = construction_cost(1.0, 500.0, PipeMaterial::Steel, 0.2, PipeType::Oil);
        let long = construction_cost(2.0, 500.0, PipeMaterial::Steel, 0.2, PipeType::Oil);
        assert!(long > short);
    }

    #[test]
    fn construction_cost_increasing_in_terrain_difficulty() {
        let easy = construction_cost(1.0, 500.0, PipeMaterial::Steel, 0.1, PipeType::Oil);
        let hard = construction_cost(1.0, 500.0, PipeMaterial::Steel, 0.9, PipeType::Oil);
        assert!(hard > easy);
    }

    #[test]
    fn construction_cost_is_nonnegative() {
        let c = construction_cost(5.0, 2000.0, PipeMaterial::Composite, 1.0, PipeType::Gas);
        assert!(c >= 0.0);
    }

    #[test]
    fn construction_cost_known_value_500mm_steel_oil_flat() {
        // base = 2e-5*500^2 + 0.01*500 = 5.0 + 5.0 = 10.0 million/km
        // terrain_factor at t=0 is 1.0; material=1.0; pipe_type(oil)=1.2
        let c = construction_cost(1.0, 500.0, PipeMaterial::Steel, 0.0, PipeType::Oil);
        assert_relative_eq!(c, 12.0, epsilon = 1e-9);
    }

    #[test]
    fn environmental_impact_in_unit_range() {
        for diameter in [100.0, 500.0, 2000.0] {
            for t in [0.0, 0.5, 1.0] {
                for pipe_type in [PipeType::Oil, PipeType::Gas, PipeType::Water] {
                    let e = environmental_impact(pipe_type, diameter, t);
                    assert!((0.0..=1.0).contains(&e), "got {e}");
                }
            }
        }
    }

    #[test]
    fn environmental_impact_water_lower_than_oil() {
        let oil = environmental_impact(PipeType::Oil, 500.0, 0.3);
        let water = environmental_impact(PipeType::Water, 500.0, 0.3);
        assert!(water < oil);
    }
}
