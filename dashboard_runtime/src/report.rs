//! Dashboard report - the document handed to the rendering layer.
//!
//! Carries the inputs, the full engine result, the cosmetic display strings,
//! and the canonical hash of the result for verification.

use std::io::Write;

use metrics_engine::catalog::AgentKind;
use metrics_engine::domain::CalculatedMetrics;
use metrics_engine::format::{format_budget_impact, format_currency};
use metrics_engine::hashing::canonical_hash;
use metrics_engine::ENGINE_VERSION;
use serde::{Deserialize, Serialize};

use crate::compare::ScenarioDelta;
use crate::error::Result;
use crate::plan::PlanInputs;

/// Pre-formatted strings. Derived from the numbers, never fed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayStrings {
    pub investment: String,
    pub total_savings: String,
    /// `(agent, formatted budget impact)` in catalog order.
    pub agent_budget_impacts: Vec<(AgentKind, String)>,
}

impl DisplayStrings {
    fn build(inputs: &PlanInputs, metrics: &CalculatedMetrics) -> Self {
        Self {
            investment: format_currency(inputs.investment, false),
            total_savings: format_currency(metrics.total_savings as f64, true),
            agent_budget_impacts: metrics
                .agents
                .iter()
                .map(|a| (a.name, format_budget_impact(a.budget_impact)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub engine_version: u32,
    pub inputs: PlanInputs,
    pub metrics: CalculatedMetrics,
    pub display: DisplayStrings,
    /// SHA-256 of the canonical metrics serialization.
    pub hash: String,
}

impl DashboardReport {
    pub fn build(inputs: PlanInputs, metrics: CalculatedMetrics) -> Result<Self> {
        let hash = canonical_hash(&metrics)?;
        let display = DisplayStrings::build(&inputs, &metrics);
        Ok(Self {
            engine_version: ENGINE_VERSION,
            inputs,
            metrics,
            display,
            hash,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// True if the stored hash matches the stored metrics.
    pub fn verify_hash(&self) -> Result<bool> {
        Ok(canonical_hash(&self.metrics)? == self.hash)
    }
}

/// What the CLI prints: the report, plus the change against a baseline plan
/// when one was requested.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    #[serde(flatten)]
    pub report: DashboardReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ScenarioDelta>,
}

impl ReportDocument {
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
