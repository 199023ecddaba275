//! Golden scenario test - evaluates the frozen scenario fixtures and
//! compares every field against the recorded dashboard output.
//!
//! Integers must match exactly. Floats must match to 1e-9.
//! If this fails, the engine formulas have changed.

use std::fs;

use metrics_engine::domain::{CalculatedMetrics, ProjectionPoint};
use metrics_engine::engine::calculate_metrics;
use metrics_engine::hashing::canonical_hash;
use metrics_engine::invariants::validate_invariants;
use metrics_engine::ENGINE_VERSION;
use serde::Deserialize;

const TOLERANCE: f64 = 1e-9;

#[derive(Deserialize)]
struct Scenario {
    name: String,
    investment: f64,
    timeline: f64,
    expected: CalculatedMetrics,
}

fn load_scenarios() -> Vec<Scenario> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/golden/scenarios.json");
    let data = fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));
    serde_json::from_str(&data).expect("Failed to parse scenarios JSON")
}

fn assert_close(name: &str, field: &str, got: f64, expected: f64) {
    assert!(
        (got - expected).abs() <= TOLERANCE,
        "[{}] {}: got {}, expected {}",
        name,
        field,
        got,
        expected
    );
}

fn assert_series(name: &str, series: &str, got: &[ProjectionPoint], expected: &[ProjectionPoint]) {
    for (i, (g, e)) in got.iter().zip(expected).enumerate() {
        assert_eq!(g.week, e.week, "[{}] {}[{}].week", name, series, i);
        assert_close(name, &format!("{}[{}].projected", series, i), g.projected, e.projected);
        match (g.actual.value(), e.actual.value()) {
            (Some(gv), Some(ev)) => assert_close(name, &format!("{}[{}].actual", series, i), gv, ev),
            (None, None) => {}
            (gv, ev) => panic!("[{}] {}[{}].actual: got {:?}, expected {:?}", name, series, i, gv, ev),
        }
    }
}

#[test]
fn golden_scenarios_match() {
    let scenarios = load_scenarios();
    assert!(!scenarios.is_empty());

    for s in &scenarios {
        let got = calculate_metrics(s.investment, s.timeline);
        let exp = &s.expected;
        validate_invariants(&got);

        assert_eq!(got.profit_growth, exp.profit_growth, "[{}] profitGrowth", s.name);
        assert_eq!(got.ctc_reduction, exp.ctc_reduction, "[{}] ctcReduction", s.name);
        assert_eq!(got.overall_confidence, exp.overall_confidence, "[{}] overallConfidence", s.name);
        assert_eq!(got.total_savings, exp.total_savings, "[{}] totalSavings", s.name);
        assert_eq!(
            got.total_headcount_change, exp.total_headcount_change,
            "[{}] totalHeadcountChange",
            s.name
        );
        assert_eq!(got.agents, exp.agents, "[{}] agents", s.name);
        assert_eq!(got.conflicts, exp.conflicts, "[{}] conflicts", s.name);
        assert_series(&s.name, "profitProjection", &got.profit_projection, &exp.profit_projection);
        assert_series(&s.name, "ctcProjection", &got.ctc_projection, &exp.ctc_projection);
    }
}

#[test]
fn golden_scenarios_are_deterministic() {
    for s in &load_scenarios() {
        let h1 = canonical_hash(&calculate_metrics(s.investment, s.timeline)).unwrap();
        let h2 = canonical_hash(&calculate_metrics(s.investment, s.timeline)).unwrap();
        assert_eq!(
            h1, h2,
            "DETERMINISM FAILURE [{}]: two calls produced different hashes.\n\
             Run 1: {}\n\
             Run 2: {}",
            s.name, h1, h2
        );
    }
}

#[test]
fn serialized_result_round_trips_through_json() {
    let metrics = calculate_metrics(620_000.0, 12.0);
    let json = serde_json::to_string(&metrics).unwrap();
    let back: CalculatedMetrics = serde_json::from_str(&json).unwrap();
    assert_eq!(back, metrics);
}

#[test]
fn engine_version_is_one() {
    assert_eq!(ENGINE_VERSION, 1, "ENGINE_VERSION must be 1 for these fixtures");
}
