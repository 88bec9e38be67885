//! Shared data model: criteria, weights, per-criterion costs, pipe
//! parameters, and route results.

use serde::{Deserialize, Serialize};

use crate::geodesy::GeoPoint;

/// The closed set of routing criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Distance,
    TerrainDifficulty,
    EnvironmentalImpact,
    ConstructionCost,
    MaintenanceAccess,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::Distance,
        Criterion::TerrainDifficulty,
        Criterion::EnvironmentalImpact,
        Criterion::ConstructionCost,
        Criterion::MaintenanceAccess,
    ];
}

/// A per-criterion value: criteria weights or a node's accumulated g-score,
/// depending on context. One `f64` field per member of `Criterion`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriteriaMap {
    pub distance: f64,
    pub terrain_difficulty: f64,
    pub environmental_impact: f64,
    pub construction_cost: f64,
    pub maintenance_access: f64,
}

impl CriteriaMap {
    pub const ZERO: CriteriaMap = CriteriaMap {
        distance: 0.0,
        terrain_difficulty: 0.0,
        environmental_impact: 0.0,
        construction_cost: 0.0,
        maintenance_access: 0.0,
    };

    /// Default, unnormalized weights used by the engine facade before
    /// applying any caller-supplied overrides.
    pub fn default_weights() -> Self {
        Self {
            distance: 0.3,
            terrain_difficulty: 0.2,
            environmental_impact: 0.15,
            construction_cost: 0.2,
            maintenance_access: 0.15,
        }
    }

    pub fn get(&self, c: Criterion) -> f64 {
        match c {
            Criterion::Distance => self.distance,
            Criterion::TerrainDifficulty => self.terrain_difficulty,
            Criterion::EnvironmentalImpact => self.environmental_impact,
            Criterion::ConstructionCost => self.construction_cost,
            Criterion::MaintenanceAccess => self.maintenance_access,
        }
    }

    pub fn set(&mut self, c: Criterion, v: f64) {
        match c {
            Criterion::Distance => self.distance = v,
            Criterion::TerrainDifficulty => self.terrain_difficulty = v,
            Criterion::EnvironmentalImpact => self.environmental_impact = v,
            Criterion::ConstructionCost => self.construction_cost = v,
            Criterion::MaintenanceAccess => self.maintenance_access = v,
        }
    }

    pub fn sum(&self) -> f64 {
        self.distance
            + self.terrain_difficulty
            + self.environmental_impact
            + self.construction_cost
            + self.maintenance_access
    }

    /// Normalize so all five values sum to 1. No-op (returns a zeroed map)
    /// if the current sum is not positive.
    pub fn normalized(&self) -> Self {
        let total = self.sum();
        if total <= 0.0 {
            return Self::ZERO;
        }
        Self {
            distance: self.distance / total,
            terrain_difficulty: self.terrain_difficulty / total,
            environmental_impact: self.environmental_impact / total,
            construction_cost: self.construction_cost / total,
            maintenance_access: self.maintenance_access / total,
        }
    }

    /// Weighted dot product against a g-score map, i.e. `f(n) - h(n)`.
    pub fn dot(&self, g: &CriteriaMap) -> f64 {
        self.distance * g.distance
            + self.terrain_difficulty * g.terrain_difficulty
            + self.environmental_impact * g.environmental_impact
            + self.construction_cost * g.construction_cost
            + self.maintenance_access * g.maintenance_access
    }

    pub fn add(&self, other: &CriteriaMap) -> Self {
        Self {
            distance: self.distance + other.distance,
            terrain_difficulty: self.terrain_difficulty + other.terrain_difficulty,
            environmental_impact: self.environmental_impact + other.environmental_impact,
            construction_cost: self.construction_cost + other.construction_cost,
            maintenance_access: self.maintenance_access + other.maintenance_access,
        }
    }
}

/// Criteria weights are just a normalized `CriteriaMap`; kept as a distinct
/// alias so call sites read clearly.
pub type CriteriaWeights = CriteriaMap;

/// Pipeline fluid type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipeType {
    Oil,
    Gas,
    Water,
}

/// Pipeline construction material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipeMaterial {
    Steel,
    Plastic,
    Composite,
}

/// Full pipe parameter set carried through cost-model and search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeParams {
    pub pipe_type: PipeType,
    /// Diameter in millimetres, valid range [100, 2000].
    pub diameter_mm: f64,
    pub material: PipeMaterial,
    /// Maximum operating pressure in atm, valid range [1, 100].
    pub max_pressure: f64,
}

/// Metrics attached to a computed route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Total polyline length, km.
    pub total_distance: f64,
    /// Construction cost, millions of currency units.
    pub estimated_cost: f64,
    /// Normalized terrain difficulty, per km.
    pub terrain_difficulty_score: f64,
    /// Environmental impact score, [0, 1].
    pub environmental_impact_score: f64,
    /// Estimated construction time in days.
    pub estimated_construction_time: f64,
    /// `Some(0)` for the primary route, `Some(i)` for the i-th alternative.
    pub alternative_num: Option<u32>,
}

/// A computed route: its polyline plus derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub polyline: Vec<GeoPoint>,
    pub metrics: RouteMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalized_sums_to_one() {
        let w = CriteriaMap::default_weights();
        let n = w.normalized();
        assert_relative_eq!(n.sum(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn normalized_zero_input_returns_zero() {
        let w = CriteriaMap::ZERO;
        assert_eq!(w.normalized(), CriteriaMap::ZERO);
    }

    #[test]
    fn get_set_round_trip_all_criteria() {
        let mut m = CriteriaMap::ZERO;
        for (i, c) in Criterion::ALL.iter().enumerate() {
            m.set(*c, i as f64 + 1.0);
        }
        for (i, c) in Criterion::ALL.iter().enumerate() {
            assert_eq!(m.get(*c), i as f64 + 1.0);
        }
    }
}
