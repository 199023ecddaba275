//! Scenario comparison and determinism verification.
//!
//! Compares two engine results the way a dashboard shows "what changed"
//! when the investment or timeline slider moves.

use metrics_engine::arithmetic::round_to_tenth;
use metrics_engine::catalog::AgentKind;
use metrics_engine::domain::{CalculatedMetrics, RiskLevel};
use metrics_engine::engine::calculate_metrics;
use metrics_engine::hashing::canonical_hash;
use serde::Serialize;

use crate::error::{Result, RuntimeError};
use crate::plan::PlanInputs;

/// Compute the same inputs twice and require identical hashes.
pub fn verify_determinism(inputs: &PlanInputs) -> Result<String> {
    let first = canonical_hash(&calculate_metrics(inputs.investment, inputs.timeline_weeks))?;
    let second = canonical_hash(&calculate_metrics(inputs.investment, inputs.timeline_weeks))?;
    if first != second {
        return Err(RuntimeError::Determinism {
            investment: inputs.investment,
            timeline: inputs.timeline_weeks,
            first,
            second,
        });
    }
    Ok(first)
}

/// Per-agent change between two scenarios.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDelta {
    pub name: AgentKind,
    pub budget_impact_delta: i64,
    pub headcount_impact_delta: i64,
    pub confidence_delta: i64,
    pub risk_before: RiskLevel,
    pub risk_after: RiskLevel,
}

impl AgentDelta {
    pub fn risk_changed(&self) -> bool {
        self.risk_before != self.risk_after
    }
}

/// Structured comparison of scenario `a` (before) to `b` (after).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDelta {
    pub profit_growth_delta: f64,
    pub ctc_reduction_delta: f64,
    pub overall_confidence_delta: i64,
    pub total_savings_delta: i64,
    pub total_headcount_delta: i64,
    pub agents: Vec<AgentDelta>,
}

impl ScenarioDelta {
    /// Agents whose risk classification moved.
    pub fn risk_transitions(&self) -> impl Iterator<Item = &AgentDelta> {
        self.agents.iter().filter(|a| a.risk_changed())
    }

    pub fn is_unchanged(&self) -> bool {
        self.profit_growth_delta == 0.0
            && self.ctc_reduction_delta == 0.0
            && self.overall_confidence_delta == 0
            && self.total_savings_delta == 0
            && self.total_headcount_delta == 0
            && self.agents.iter().all(|a| {
                a.budget_impact_delta == 0
                    && a.headcount_impact_delta == 0
                    && a.confidence_delta == 0
                    && !a.risk_changed()
            })
    }
}

/// Compare two results. Agents pair up by catalog position.
pub fn compare_metrics(a: &CalculatedMetrics, b: &CalculatedMetrics) -> ScenarioDelta {
    let agents = AgentKind::ALL
        .into_iter()
        .map(|kind| {
            let before = a.agent(kind);
            let after = b.agent(kind);
            AgentDelta {
                name: kind,
                budget_impact_delta: after.budget_impact.saturating_sub(before.budget_impact),
                headcount_impact_delta: after.headcount_impact.saturating_sub(before.headcount_impact),
                confidence_delta: after.confidence as i64 - before.confidence as i64,
                risk_before: before.risk,
                risk_after: after.risk,
            }
        })
        .collect();

    ScenarioDelta {
        // Targets are one-decimal values; keep the delta on that grid.
        profit_growth_delta: tenth_delta(a.profit_growth, b.profit_growth),
        ctc_reduction_delta: tenth_delta(a.ctc_reduction, b.ctc_reduction),
        overall_confidence_delta: b.overall_confidence as i64 - a.overall_confidence as i64,
        total_savings_delta: b.total_savings.saturating_sub(a.total_savings),
        total_headcount_delta: b
            .total_headcount_change
            .saturating_sub(a.total_headcount_change),
        agents,
    }
}

fn tenth_delta(before: f64, after: f64) -> f64 {
    round_to_tenth(after - before)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_scenarios_are_unchanged() {
        let m = calculate_metrics(620_000.0, 12.0);
        let delta = compare_metrics(&m, &m);
        assert!(delta.is_unchanged());
        assert_eq!(delta.risk_transitions().count(), 0);
    }

    #[test]
    fn more_funding_and_time_raises_confidence() {
        let before = calculate_metrics(620_000.0, 12.0);
        let after = calculate_metrics(800_000.0, 16.0);
        let delta = compare_metrics(&before, &after);

        assert_eq!(delta.overall_confidence_delta, 82 - 58);
        assert_eq!(delta.profit_growth_delta, 1.8);
        assert_eq!(delta.ctc_reduction_delta, 0.4);
        assert_eq!(delta.total_headcount_delta, 0);
        assert_eq!(delta.total_savings_delta, 752_543 - 620_000);

        let finance = &delta.agents[AgentKind::Finance.index()];
        assert_eq!(finance.risk_before, RiskLevel::High);
        assert_eq!(finance.risk_after, RiskLevel::Low);
        assert!(delta.risk_transitions().count() >= 1);
        assert!(!delta.is_unchanged());
    }

    #[test]
    fn tenth_delta_ties_round_up() {
        assert_eq!(tenth_delta(0.25, 0.0), -0.2);
        assert_eq!(tenth_delta(0.0, 0.25), 0.3);
        assert_eq!(tenth_delta(14.2, 16.0), 1.8);
    }

    #[test]
    fn verify_determinism_returns_hash() {
        let inputs = PlanInputs {
            investment: 450_000.0,
            timeline_weeks: 9.0,
        };
        let hash = verify_determinism(&inputs).unwrap();
        assert_eq!(hash.len(), 64);
    }
}
