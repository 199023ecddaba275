//! Metrics Engine v1 - Engine
//!
//! Single entry point. Computes the shared factors once, derives every
//! agent in catalog order, then the aggregates and projections.
//!
//! Total over finite input. No validation happens here; callers reject
//! malformed input before invoking.

use crate::arithmetic::{round_half_up, round_to_tenth};
use crate::catalog::{conflict_registry, AgentKind};
use crate::domain::{
    CalculatedAgent, CalculatedMetrics, Observation, ProjectionPoint, WeekLabel,
    OBSERVED_PREFIX, PROJECTION_POINTS,
};
use crate::scaling::{
    adjusted_confidence, investment_adequacy, risk_level, scale_budget, scale_headcount,
    timeline_factor,
};

/// Per-step growth of the projected series.
const PROJECTED_STEP: f64 = 0.14;
/// Per-step growth of the observed prefix. Runs slightly ahead of projected.
const OBSERVED_STEP: f64 = 0.15;

/// CTC index starting level.
const CTC_BASELINE: f64 = 100.0;

/// Map `(investment, timeline)` to a complete `CalculatedMetrics`.
pub fn calculate_metrics(investment: f64, timeline: f64) -> CalculatedMetrics {
    let adequacy = investment_adequacy(investment);
    let t_factor = timeline_factor(timeline);

    let agents = AgentKind::ALL
        .map(|kind| calculate_agent(kind, investment, timeline, adequacy, t_factor));

    let total_savings = agents
        .iter()
        .map(|a| a.budget_impact)
        .fold(0i64, i64::saturating_add);
    let total_headcount_change = agents
        .iter()
        .map(|a| a.headcount_impact)
        .fold(0i64, i64::saturating_add);
    let overall_confidence = mean_confidence(&agents);

    // Projections run off the unrounded targets; only the headline is rounded.
    let profit_target = profit_growth_target(investment, timeline);
    let ctc_target = ctc_reduction_target(investment);

    tracing::debug!(
        investment,
        timeline,
        adequacy,
        t_factor,
        total_savings,
        overall_confidence,
        "metrics calculated"
    );

    CalculatedMetrics {
        profit_growth: round_to_tenth(profit_target),
        ctc_reduction: round_to_tenth(ctc_target),
        overall_confidence,
        total_savings,
        total_headcount_change,
        agents,
        profit_projection: projection(|n, k| profit_target * n * k),
        ctc_projection: projection(|n, k| CTC_BASELINE - ctc_target * n * k),
        conflicts: conflict_registry(),
    }
}

fn calculate_agent(
    kind: AgentKind,
    investment: f64,
    timeline: f64,
    adequacy: f64,
    t_factor: f64,
) -> CalculatedAgent {
    let profile = kind.profile();
    let narrative = kind.narrative();
    let confidence = adjusted_confidence(&profile, adequacy, t_factor);

    CalculatedAgent {
        name: kind,
        budget_impact: scale_budget(profile.base_savings, investment),
        headcount_impact: scale_headcount(profile.base_headcount, timeline),
        confidence,
        risk: risk_level(confidence),
        decision: narrative.decision.to_string(),
        trigger: narrative.trigger.to_string(),
    }
}

/// Rounded mean of the per-agent confidences.
pub fn mean_confidence(agents: &[CalculatedAgent]) -> u32 {
    if agents.is_empty() {
        return 0;
    }
    let sum: u32 = agents.iter().map(|a| a.confidence).sum();
    round_half_up(sum as f64 / agents.len() as f64) as u32
}

/// Unrounded profit-growth target, bounded to 8..=18 percent.
pub fn profit_growth_target(investment: f64, timeline: f64) -> f64 {
    (8.0 + (investment / 100_000.0) * 0.8 + (timeline / 20.0) * 2.0).clamp(8.0, 18.0)
}

/// Unrounded CTC-reduction target, bounded to 1..=4 percent.
pub fn ctc_reduction_target(investment: f64) -> f64 {
    (1.5 + (investment / 200_000.0) * 0.4).clamp(1.0, 4.0)
}

/// Build a series over `WeekLabel::SEQUENCE`. `level(n, k)` gives the
/// series value at point `n` (1-based) for step coefficient `k`.
fn projection<F>(level: F) -> [ProjectionPoint; PROJECTION_POINTS]
where
    F: Fn(f64, f64) -> f64,
{
    std::array::from_fn(|i| {
        let n = (i + 1) as f64;
        let actual = if i < OBSERVED_PREFIX {
            Observation::Observed(level(n, OBSERVED_STEP))
        } else {
            Observation::Projected
        };
        ProjectionPoint {
            week: WeekLabel::SEQUENCE[i],
            actual,
            projected: level(n, PROJECTED_STEP),
        }
    })
}
