//! Metrics Engine v1 - Invariant Checks
//!
//! `validate_invariants` panics on the first failure: a violation means the
//! reference data or the engine is defective, not that the input was bad.
//! `try_validate_invariants` returns the violation for boundary callers.

use std::collections::BTreeSet;

use crate::domain::{CalculatedMetrics, ProjectionPoint, WeekLabel, OBSERVED_PREFIX};
use crate::engine::mean_confidence;
use crate::scaling::{risk_level, CONFIDENCE_CEILING, CONFIDENCE_FLOOR};

/// A broken result invariant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("[INVARIANT:confidence_band] agent {agent} confidence {confidence} outside [50, 99]")]
    ConfidenceOutOfBand { agent: String, confidence: u32 },

    #[error("[INVARIANT:risk_consistency] agent {agent} risk does not match confidence {confidence}")]
    RiskMismatch { agent: String, confidence: u32 },

    #[error("[INVARIANT:conservation] {field} is {reported}, agents sum to {summed}")]
    Conservation {
        field: &'static str,
        reported: i64,
        summed: i64,
    },

    #[error("[INVARIANT:overall_confidence] reported {reported}, rounded mean is {expected}")]
    OverallConfidence { reported: u32, expected: u32 },

    #[error("[INVARIANT:target_bounds] {field} = {value} outside [{min}, {max}]")]
    TargetOutOfBounds {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("[INVARIANT:projection_order] {series} point {index} is {found}, expected {expected}")]
    ProjectionOrder {
        series: &'static str,
        index: usize,
        found: &'static str,
        expected: &'static str,
    },

    #[error("[INVARIANT:observed_prefix] {series} point {index} observed={observed}")]
    ObservedPrefix {
        series: &'static str,
        index: usize,
        observed: bool,
    },

    #[error("[INVARIANT:finite] {field} is not finite")]
    NonFinite { field: String },

    #[error("[INVARIANT:conflict_registry] {reason}")]
    ConflictRegistry { reason: String },
}

/// Run every check. Panics on the first failure.
pub fn validate_invariants(metrics: &CalculatedMetrics) {
    if let Err(violation) = try_validate_invariants(metrics) {
        panic!("Invariant violation: {}", violation);
    }
}

/// Non-panicking variant. Returns the first violation found.
pub fn try_validate_invariants(metrics: &CalculatedMetrics) -> Result<(), InvariantViolation> {
    check_agent_confidence(metrics)?;
    check_conservation(metrics)?;
    check_overall_confidence(metrics)?;
    check_target_bounds(metrics)?;
    check_projection("profitProjection", &metrics.profit_projection)?;
    check_projection("ctcProjection", &metrics.ctc_projection)?;
    check_conflicts(metrics)?;
    Ok(())
}

fn check_agent_confidence(metrics: &CalculatedMetrics) -> Result<(), InvariantViolation> {
    for agent in &metrics.agents {
        if !(CONFIDENCE_FLOOR..=CONFIDENCE_CEILING).contains(&agent.confidence) {
            return Err(InvariantViolation::ConfidenceOutOfBand {
                agent: agent.name.to_string(),
                confidence: agent.confidence,
            });
        }
        if risk_level(agent.confidence) != agent.risk {
            return Err(InvariantViolation::RiskMismatch {
                agent: agent.name.to_string(),
                confidence: agent.confidence,
            });
        }
    }
    Ok(())
}

fn check_conservation(metrics: &CalculatedMetrics) -> Result<(), InvariantViolation> {
    let savings = metrics
        .agents
        .iter()
        .map(|a| a.budget_impact)
        .fold(0i64, i64::saturating_add);
    if savings != metrics.total_savings {
        return Err(InvariantViolation::Conservation {
            field: "totalSavings",
            reported: metrics.total_savings,
            summed: savings,
        });
    }

    let headcount = metrics
        .agents
        .iter()
        .map(|a| a.headcount_impact)
        .fold(0i64, i64::saturating_add);
    if headcount != metrics.total_headcount_change {
        return Err(InvariantViolation::Conservation {
            field: "totalHeadcountChange",
            reported: metrics.total_headcount_change,
            summed: headcount,
        });
    }
    Ok(())
}

fn check_overall_confidence(metrics: &CalculatedMetrics) -> Result<(), InvariantViolation> {
    let expected = mean_confidence(&metrics.agents);
    if expected != metrics.overall_confidence {
        return Err(InvariantViolation::OverallConfidence {
            reported: metrics.overall_confidence,
            expected,
        });
    }
    Ok(())
}

fn check_target_bounds(metrics: &CalculatedMetrics) -> Result<(), InvariantViolation> {
    let targets = [
        ("profitGrowth", metrics.profit_growth, 8.0, 18.0),
        ("ctcReduction", metrics.ctc_reduction, 1.0, 4.0),
    ];
    for (field, value, min, max) in targets {
        if !value.is_finite() {
            return Err(InvariantViolation::NonFinite {
                field: field.to_string(),
            });
        }
        if value < min || value > max {
            return Err(InvariantViolation::TargetOutOfBounds {
                field,
                value,
                min,
                max,
            });
        }
    }
    Ok(())
}

fn check_projection(
    series: &'static str,
    points: &[ProjectionPoint],
) -> Result<(), InvariantViolation> {
    for (index, (point, expected)) in points.iter().zip(WeekLabel::SEQUENCE).enumerate() {
        if point.week != expected {
            return Err(InvariantViolation::ProjectionOrder {
                series,
                index,
                found: point.week.as_str(),
                expected: expected.as_str(),
            });
        }
        let observed = point.actual.is_observed();
        if observed != (index < OBSERVED_PREFIX) {
            return Err(InvariantViolation::ObservedPrefix {
                series,
                index,
                observed,
            });
        }
        let actual_finite = point.actual.value().map_or(true, f64::is_finite);
        if !point.projected.is_finite() || !actual_finite {
            return Err(InvariantViolation::NonFinite {
                field: format!("{}[{}]", series, index),
            });
        }
    }
    Ok(())
}

fn check_conflicts(metrics: &CalculatedMetrics) -> Result<(), InvariantViolation> {
    if metrics.conflicts.is_empty() {
        return Err(InvariantViolation::ConflictRegistry {
            reason: "registry is empty".to_string(),
        });
    }
    let mut ids = BTreeSet::new();
    for record in &metrics.conflicts {
        if !ids.insert(record.id) {
            return Err(InvariantViolation::ConflictRegistry {
                reason: format!("duplicate conflict id {}", record.id),
            });
        }
        if record.agents.is_empty() {
            return Err(InvariantViolation::ConflictRegistry {
                reason: format!("conflict {} lists no agents", record.id),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observation, RiskLevel};
    use crate::engine::calculate_metrics;

    fn reference() -> CalculatedMetrics {
        calculate_metrics(620_000.0, 12.0)
    }

    #[test]
    fn test_engine_output_passes() {
        validate_invariants(&reference());
        validate_invariants(&calculate_metrics(0.0, 0.0));
        validate_invariants(&calculate_metrics(3_000_000.0, 40.0));
    }

    #[test]
    fn test_detects_conservation_break() {
        let mut m = reference();
        m.total_savings += 1;
        assert!(matches!(
            try_validate_invariants(&m),
            Err(InvariantViolation::Conservation { field: "totalSavings", .. })
        ));
    }

    #[test]
    fn test_detects_confidence_out_of_band() {
        let mut m = reference();
        m.agents[2].confidence = 100;
        assert!(matches!(
            try_validate_invariants(&m),
            Err(InvariantViolation::ConfidenceOutOfBand { confidence: 100, .. })
        ));
    }

    #[test]
    fn test_detects_risk_mismatch() {
        let mut m = reference();
        m.agents[0].risk = if m.agents[0].risk == RiskLevel::High {
            RiskLevel::Low
        } else {
            RiskLevel::High
        };
        assert!(matches!(
            try_validate_invariants(&m),
            Err(InvariantViolation::RiskMismatch { .. })
        ));
    }

    #[test]
    fn test_detects_observed_prefix_break() {
        let mut m = reference();
        m.ctc_projection[4].actual = Observation::Observed(99.0);
        assert_eq!(
            try_validate_invariants(&m),
            Err(InvariantViolation::ObservedPrefix {
                series: "ctcProjection",
                index: 4,
                observed: true,
            })
        );
    }

    #[test]
    fn test_detects_week_order_break() {
        let mut m = reference();
        m.profit_projection.swap(0, 1);
        assert!(matches!(
            try_validate_invariants(&m),
            Err(InvariantViolation::ProjectionOrder { index: 0, .. })
        ));
    }

    #[test]
    fn test_detects_duplicate_conflict_ids() {
        let mut m = reference();
        m.conflicts[1].id = 1;
        assert!(matches!(
            try_validate_invariants(&m),
            Err(InvariantViolation::ConflictRegistry { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "Invariant violation")]
    fn test_validate_panics() {
        let mut m = reference();
        m.profit_growth = 25.0;
        validate_invariants(&m);
    }
}
