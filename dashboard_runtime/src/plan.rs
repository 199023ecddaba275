//! Plan inputs at the boundary.
//!
//! The engine accepts any number. This layer decides what a caller may
//! actually submit and fills in defaults before the engine is invoked.

use serde::{Deserialize, Serialize};

use crate::company::CompanyProfile;
use crate::config::DashboardConfig;
use crate::error::{Result, RuntimeError};

/// What a caller submits. Missing fields take defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub investment: Option<f64>,
    pub timeline_weeks: Option<f64>,
}

impl PlanRequest {
    pub fn new(investment: f64, timeline_weeks: f64) -> Self {
        Self {
            investment: Some(investment),
            timeline_weeks: Some(timeline_weeks),
        }
    }
}

/// Validated engine inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInputs {
    pub investment: f64,
    pub timeline_weeks: f64,
}

/// Default investment: revenue share when revenue is known, else the
/// configured default.
pub fn default_investment(config: &DashboardConfig, company: Option<&CompanyProfile>) -> f64 {
    company
        .and_then(|c| c.proposed_investment(config.revenue_investment_share))
        .unwrap_or(config.default_investment)
}

/// Fill defaults and validate.
pub fn resolve(
    request: &PlanRequest,
    config: &DashboardConfig,
    company: Option<&CompanyProfile>,
) -> Result<PlanInputs> {
    let investment = request
        .investment
        .unwrap_or_else(|| default_investment(config, company));
    let timeline_weeks = request
        .timeline_weeks
        .unwrap_or(config.default_timeline_weeks);

    check("investment", investment, 0.0, config.max_investment, true)?;
    check("timeline", timeline_weeks, 0.0, config.max_timeline_weeks, false)?;

    Ok(PlanInputs {
        investment,
        timeline_weeks,
    })
}

fn check(field: &'static str, value: f64, min: f64, max: f64, min_inclusive: bool) -> Result<()> {
    let invalid = |reason| RuntimeError::InvalidInput {
        field,
        value,
        reason,
    };
    if !value.is_finite() {
        return Err(invalid("must be a finite number"));
    }
    if min_inclusive && value < min {
        return Err(invalid("must not be negative"));
    }
    if !min_inclusive && value <= min {
        return Err(invalid("must be positive"));
    }
    if value > max {
        return Err(invalid("exceeds the configured maximum"));
    }
    Ok(())
}
