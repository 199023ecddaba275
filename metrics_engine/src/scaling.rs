//! Metrics Engine v1 - Scaling Functions
//!
//! Pure numeric transforms from the raw inputs to per-agent quantities.

use crate::arithmetic::{ramp, round_half_up, to_whole};
use crate::catalog::AgentProfile;
use crate::domain::RiskLevel;

pub const OPTIMAL_INVESTMENT: f64 = 800_000.0;
pub const MIN_INVESTMENT: f64 = 200_000.0;
pub const OPTIMAL_TIMELINE_WEEKS: f64 = 16.0;
pub const MIN_TIMELINE_WEEKS: f64 = 6.0;

/// Investment at which every base savings figure applies unscaled.
pub const REFERENCE_INVESTMENT: f64 = 620_000.0;

/// Weeks needed to realise the full base headcount change.
pub const HEADCOUNT_HORIZON_WEEKS: f64 = 12.0;

/// Exponent applied to the investment ratio for savings lines.
const SAVINGS_ELASTICITY: f64 = 0.8;

/// Weight of an agent's risk factor in its confidence discount.
const RISK_DISCOUNT: f64 = 0.3;

pub const CONFIDENCE_FLOOR: u32 = 50;
pub const CONFIDENCE_CEILING: u32 = 99;

/// 0.5 at or below 200k, 1.0 at or above 800k, linear in between.
pub fn investment_adequacy(investment: f64) -> f64 {
    ramp(investment, MIN_INVESTMENT, OPTIMAL_INVESTMENT, 0.5, 1.0)
}

/// 0.6 at or below 6 weeks, 1.0 at or above 16 weeks, linear in between.
pub fn timeline_factor(timeline: f64) -> f64 {
    ramp(timeline, MIN_TIMELINE_WEEKS, OPTIMAL_TIMELINE_WEEKS, 0.6, 1.0)
}

/// Scale a base savings figure to the given investment.
///
/// Cost lines (negative) scale linearly with the investment ratio. Savings
/// lines scale with `ratio^0.8`. A negative ratio keeps its sign through the
/// power so the result stays finite.
pub fn scale_budget(base_savings: f64, investment: f64) -> i64 {
    let ratio = investment / REFERENCE_INVESTMENT;
    if base_savings < 0.0 {
        return to_whole(base_savings * ratio);
    }
    let scaled_ratio = if ratio < 0.0 {
        -(-ratio).powf(SAVINGS_ELASTICITY)
    } else {
        ratio.powf(SAVINGS_ELASTICITY)
    };
    to_whole(base_savings * scaled_ratio)
}

/// Attenuate a headcount target linearly below 12 weeks. Never exceeds the
/// base target.
pub fn scale_headcount(base_headcount: i64, timeline: f64) -> i64 {
    let factor = (timeline / HEADCOUNT_HORIZON_WEEKS).min(1.0);
    to_whole(base_headcount as f64 * factor)
}

/// Classify an adjusted confidence.
pub fn risk_level(confidence: u32) -> RiskLevel {
    if confidence >= 85 {
        RiskLevel::Low
    } else if confidence >= 70 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Agent confidence after funding, time and volatility adjustments,
/// clamped to the 50..=99 band.
pub fn adjusted_confidence(profile: &AgentProfile, adequacy: f64, t_factor: f64) -> u32 {
    let raw = round_half_up(
        profile.base_confidence as f64
            * adequacy
            * t_factor
            * (1.0 - profile.risk_factor * RISK_DISCOUNT),
    );
    raw.clamp(CONFIDENCE_FLOOR as f64, CONFIDENCE_CEILING as f64) as u32
}
