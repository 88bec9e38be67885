//! Human-readable route descriptions and construction-time formatting.
//!
//! Ported from `original_source/app.py` (`generate_route_description`,
//! `_determine_turn_reason`, `_get_direction`, `calculate_construction_time`).
//! Pure functions over an already-computed [`RouteResult`]; no I/O.

use crate::geodesy::{haversine, GeoPoint};
use crate::model::{CriteriaWeights, Criterion, PipeType, RouteMetrics, RouteResult};
use crate::terrain::TerrainOracle;

const TURN_DESCRIPTION_THRESHOLD_RAD: f64 = 0.26;
const DIFFICULT_TERRAIN_THRESHOLD: f64 = 0.7;
const EFFICIENT_ROUTE_RATIO: f64 = 0.9;
const DOMINANT_WEIGHT_THRESHOLD: f64 = 0.3;

/// `km < 1` renders as whole meters, otherwise two-decimal kilometers.
/// Meters are truncated toward zero, matching Python's `int(distance * 1000)`.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{} м", (km * 1000.0) as i64)
    } else {
        format!("{km:.2} км")
    }
}

/// `millions < 1` renders as whole thousands, otherwise two-decimal millions.
/// Thousands are truncated toward zero, matching Python's `int(cost * 1000)`.
pub fn format_cost(millions: f64) -> String {
    if millions < 1.0 {
        format!("{} тыс. ₽", (millions * 1000.0) as i64)
    } else {
        format!("{millions:.2} млн. ₽")
    }
}

fn pipe_type_time_factor(pipe_type: PipeType) -> f64 {
    match pipe_type {
        PipeType::Oil => 1.0,
        PipeType::Gas => 1.2,
        PipeType::Water => 0.9,
    }
}

fn base_rate_km_per_day(diameter_mm: f64) -> f64 {
    if diameter_mm <= 300.0 {
        0.5
    } else if diameter_mm <= 700.0 {
        0.3
    } else {
        0.2
    }
}

/// Estimated construction duration in whole days, ceiled.
pub fn construction_time_days(metrics: &RouteMetrics, diameter_mm: f64, pipe_type: PipeType) -> u32 {
    let base_rate = base_rate_km_per_day(diameter_mm);
    let terrain_factor = 1.0 + metrics.terrain_difficulty_score;
    let days = (metrics.total_distance / base_rate) * terrain_factor * pipe_type_time_factor(pipe_type);
    days.ceil().max(0.0) as u32
}

/// Renders a day count as days / months / years+months, matching the
/// original's three display tiers.
pub fn format_construction_time(days: u32) -> String {
    if days <= 30 {
        format!("{days} дней")
    } else if days <= 365 {
        let months = ((days as f64) / 30.0).ceil() as u32;
        format!("{months} месяцев")
    } else {
        let years = days / 365;
        let months = (days % 365) / 30;
        if months > 0 {
            format!("{years} лет и {months} месяцев")
        } else {
            format!("{years} лет")
        }
    }
}

fn bearing_rad(a: GeoPoint, b: GeoPoint) -> f64 {
    (b.lng - a.lng).atan2(b.lat - a.lat)
}

fn turn_angle(prev: GeoPoint, curr: GeoPoint, next: GeoPoint) -> f64 {
    let mut diff = bearing_rad(curr, next) - bearing_rad(prev, curr);
    while diff > std::f64::consts::PI {
        diff -= 2.0 * std::f64::consts::PI;
    }
    while diff < -std::f64::consts::PI {
        diff += 2.0 * std::f64::consts::PI;
    }
    diff.abs()
}

/// Dominant compass direction of `prev -> curr`.
fn direction(prev: GeoPoint, curr: GeoPoint) -> &'static str {
    let dlat = curr.lat - prev.lat;
    let dlng = curr.lng - prev.lng;
    if dlat.abs() >= dlng.abs() {
        if dlat >= 0.0 {
            "север"
        } else {
            "юг"
        }
    } else if dlng >= 0.0 {
        "восток"
    } else {
        "запад"
    }
}

/// Best-guess reason for a turn at `curr`, checked in the original's order:
/// water crossing and road-following at `curr` itself, then road avoidance,
/// a local terrain-difficulty spike, and settlement avoidance evaluated at
/// the midpoint between `prev` and `curr`, falling back to a generic
/// explanation.
fn turn_reason(prev: GeoPoint, curr: GeoPoint, oracle: &TerrainOracle) -> &'static str {
    let (is_water, _) = oracle.is_water_crossing(curr.lat, curr.lng);
    if is_water {
        return "для пересечения водной преграды";
    }

    let (is_near_road, road_bonus) = oracle.near_road(curr.lat, curr.lng);
    if is_near_road && road_bonus > 0.0 {
        return "для следования вдоль дороги";
    }

    let mid = GeoPoint::new(prev.lat + (curr.lat - prev.lat) * 0.5, prev.lng + (curr.lng - prev.lng) * 0.5);

    let (is_on_road, road_penalty) = oracle.near_road(mid.lat, mid.lng);
    if is_on_road && road_penalty < 0.0 {
        return "для обхода дороги";
    }

    let difficulty_prev = oracle.terrain_difficulty(prev.lat, prev.lng);
    let difficulty_curr = oracle.terrain_difficulty(curr.lat, curr.lng);
    let difficulty_between = oracle.terrain_difficulty(mid.lat, mid.lng);
    if difficulty_between > difficulty_curr + 0.2 {
        return "для обхода сложного участка рельефа";
    }

    let (is_settlement, _) = oracle.near_settlement(mid.lat, mid.lng);
    if is_settlement {
        return "для обхода населенного пункта";
    }

    if difficulty_curr < difficulty_prev - 0.1 {
        return "для выбора оптимального рельефа";
    }

    "согласно критериям оптимизации"
}

/// Builds the full narrative: intro, efficiency commentary, per-turn
/// call-outs, terrain/water summary, weight-driven rationale, and a closing
/// cost sentence.
pub fn describe_route(start: GeoPoint, goal: GeoPoint, route: &RouteResult, weights: &CriteriaWeights, oracle: &TerrainOracle) -> String {
    let mut sentences = Vec::new();

    sentences.push(format!(
        "Маршрут протяженностью {} проложен от начальной до конечной точки.",
        format_distance(route.metrics.total_distance)
    ));

    let direct = haversine(start, goal);
    if route.metrics.total_distance > 0.0 {
        let efficiency = direct / route.metrics.total_distance;
        if efficiency > EFFICIENT_ROUTE_RATIO {
            sentences.push("Маршрут близок к прямой линии между точками.".to_string());
        } else {
            sentences.push("Маршрут отклоняется от прямой линии для обхода сложных участков.".to_string());
        }
    }

    let mut water_crossings = 0u32;
    let mut difficult_points = 0u32;
    for i in 1..route.polyline.len().saturating_sub(1) {
        let (prev, curr, next) = (route.polyline[i - 1], route.polyline[i], route.polyline[i + 1]);
        let angle = turn_angle(prev, curr, next);

        let (is_water, _) = oracle.is_water_crossing(curr.lat, curr.lng);
        if is_water {
            water_crossings += 1;
        }
        let difficulty = oracle.terrain_difficulty(curr.lat, curr.lng);
        if difficulty > DIFFICULT_TERRAIN_THRESHOLD {
            difficult_points += 1;
        }

        if angle > TURN_DESCRIPTION_THRESHOLD_RAD {
            sentences.push(format!(
                "Поворот на {}: {}.",
                direction(prev, curr),
                turn_reason(prev, curr, oracle)
            ));
        }
    }

    if water_crossings > 0 {
        sentences.push(format!("Маршрут пересекает водные преграды ({water_crossings})."));
    }
    if difficult_points > 0 {
        sentences.push(format!("Отмечены участки со сложным рельефом ({difficult_points})."));
    }

    for criterion in Criterion::ALL {
        if weights.get(criterion) > DOMINANT_WEIGHT_THRESHOLD {
            sentences.push(dominant_criterion_sentence(criterion));
        }
    }

    sentences.push(format!(
        "Ориентировочная стоимость строительства составляет {}.",
        format_cost(route.metrics.estimated_cost)
    ));

    sentences.join(" ")
}

fn dominant_criterion_sentence(criterion: Criterion) -> String {
    match criterion {
        Criterion::Distance => "Приоритет отдан минимизации протяженности маршрута.".to_string(),
        Criterion::TerrainDifficulty => "Приоритет отдан выбору наиболее простого рельефа.".to_string(),
        Criterion::EnvironmentalImpact => "Приоритет отдан снижению экологического воздействия.".to_string(),
        Criterion::ConstructionCost => "Приоритет отдан минимизации стоимости строительства.".to_string(),
        Criterion::MaintenanceAccess => "Приоритет отдан доступности маршрута для обслуживания.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_distance_switches_units_at_one_km() {
        assert_eq!(format_distance(0.5), "500 м");
        assert_eq!(format_distance(1.5), "1.50 км");
    }

    #[test]
    fn format_distance_truncates_rather_than_rounds() {
        assert_eq!(format_distance(0.1237), "123 м");
    }

    #[test]
    fn format_cost_switches_units_at_one_million() {
        assert_eq!(format_cost(0.5), "500 тыс. ₽");
        assert_eq!(format_cost(2.25), "2.25 млн. ₽");
    }

    #[test]
    fn construction_time_days_uses_diameter_tier() {
        let metrics = RouteMetrics {
            total_distance: 10.0,
            estimated_cost: 1.0,
            terrain_difficulty_score: 0.0,
            environmental_impact_score: 0.0,
            estimated_construction_time: 0.0,
            alternative_num: Some(0),
        };
        let days = construction_time_days(&metrics, 250.0, PipeType::Oil);
        assert_eq!(days, 20); // 10 / 0.5 * 1.0 * 1.0 = 20
    }

    #[test]
    fn format_construction_time_tiers() {
        assert_eq!(format_construction_time(10), "10 дней");
        assert_eq!(format_construction_time(60), "2 месяцев");
        assert_eq!(format_construction_time(400), "1 лет и 1 месяцев");
    }

    #[test]
    fn describe_route_mentions_cost() {
        let oracle = TerrainOracle::new(1);
        let start = GeoPoint::new(52.30, 104.40);
        let goal = GeoPoint::new(52.32, 104.42);
        let route = RouteResult {
            polyline: vec![start, goal],
            metrics: RouteMetrics {
                total_distance: 2.5,
                estimated_cost: 1.2,
                terrain_difficulty_score: 0.1,
                environmental_impact_score: 0.2,
                estimated_construction_time: 3.0,
                alternative_num: Some(0),
            },
        };
        let weights = CriteriaWeights::default_weights();
        let description = describe_route(start, goal, &route, &weights, &oracle);
        assert!(description.contains("стоимость"));
    }
}
