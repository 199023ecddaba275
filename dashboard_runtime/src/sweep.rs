//! Scenario sweep - evaluate a grid of plans.
//!
//! Each point is computed independently; the engine keeps no state between
//! calls, so order only affects the output ordering.

use metrics_engine::engine::calculate_metrics;
use metrics_engine::hashing::canonical_hash;
use metrics_engine::invariants::try_validate_invariants;
use serde::Serialize;

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::plan::{self, PlanInputs, PlanRequest};

/// Headline KPIs for one grid point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepPoint {
    pub inputs: PlanInputs,
    pub profit_growth: f64,
    pub ctc_reduction: f64,
    pub overall_confidence: u32,
    pub total_savings: i64,
    pub total_headcount_change: i64,
    pub hash: String,
}

/// Evaluate every (investment, timeline) pair, investment-major.
///
/// Each pair passes the same boundary checks as a session plan; the first
/// rejected pair fails the whole sweep.
pub fn sweep(
    investments: &[f64],
    timelines: &[f64],
    config: &DashboardConfig,
) -> Result<Vec<SweepPoint>> {
    let mut points = Vec::with_capacity(investments.len() * timelines.len());
    for &investment in investments {
        for &timeline_weeks in timelines {
            let inputs = plan::resolve(&PlanRequest::new(investment, timeline_weeks), config, None)?;
            let metrics = calculate_metrics(inputs.investment, inputs.timeline_weeks);
            try_validate_invariants(&metrics)?;
            points.push(SweepPoint {
                inputs,
                profit_growth: metrics.profit_growth,
                ctc_reduction: metrics.ctc_reduction,
                overall_confidence: metrics.overall_confidence,
                total_savings: metrics.total_savings,
                total_headcount_change: metrics.total_headcount_change,
                hash: canonical_hash(&metrics)?,
            });
        }
    }
    tracing::debug!(points = points.len(), "sweep complete");
    Ok(points)
}
