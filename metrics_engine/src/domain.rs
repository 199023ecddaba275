//! Metrics Engine v1 - Result Types
//!
//! Pure data. Built fresh on every call, never mutated afterwards.
//! Field names serialize in camelCase to match the rendering contract.

use serde::{Deserialize, Serialize};

use crate::catalog::{AgentKind, AGENT_COUNT};

/// Number of points in each projection series.
pub const PROJECTION_POINTS: usize = 7;

/// Number of leading projection points that carry an observed value.
pub const OBSERVED_PREFIX: usize = 3;

// ── Enumerations ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictStatus {
    Resolved,
    InProgress,
}

/// Projection week labels, chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeekLabel {
    W1,
    W2,
    W4,
    W6,
    W8,
    W10,
    W12,
}

impl WeekLabel {
    pub const SEQUENCE: [WeekLabel; PROJECTION_POINTS] = [
        WeekLabel::W1,
        WeekLabel::W2,
        WeekLabel::W4,
        WeekLabel::W6,
        WeekLabel::W8,
        WeekLabel::W10,
        WeekLabel::W12,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WeekLabel::W1 => "W1",
            WeekLabel::W2 => "W2",
            WeekLabel::W4 => "W4",
            WeekLabel::W6 => "W6",
            WeekLabel::W8 => "W8",
            WeekLabel::W10 => "W10",
            WeekLabel::W12 => "W12",
        }
    }

    pub fn week(self) -> u32 {
        match self {
            WeekLabel::W1 => 1,
            WeekLabel::W2 => 2,
            WeekLabel::W4 => 4,
            WeekLabel::W6 => 6,
            WeekLabel::W8 => 8,
            WeekLabel::W10 => 10,
            WeekLabel::W12 => 12,
        }
    }
}

/// The "actual" slot of a projection point. Serialized as a number or null.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Observation {
    Observed(f64),
    Projected,
}

impl Observation {
    pub fn value(self) -> Option<f64> {
        match self {
            Observation::Observed(v) => Some(v),
            Observation::Projected => None,
        }
    }

    pub fn is_observed(self) -> bool {
        matches!(self, Observation::Observed(_))
    }
}

impl From<Observation> for Option<f64> {
    fn from(obs: Observation) -> Self {
        obs.value()
    }
}

impl From<Option<f64>> for Observation {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => Observation::Observed(v),
            None => Observation::Projected,
        }
    }
}

// ── Records ────────────────────────────────────────────────────────

/// Per-agent decision derived for one (investment, timeline) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CalculatedAgent {
    pub name: AgentKind,
    pub budget_impact: i64,
    pub headcount_impact: i64,
    /// Always within 50..=99.
    pub confidence: u32,
    pub risk: RiskLevel,
    pub decision: String,
    pub trigger: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionPoint {
    pub week: WeekLabel,
    pub actual: Observation,
    pub projected: f64,
}

/// Two competing objectives and their stated resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConflictRecord {
    pub id: u32,
    pub conflict: String,
    pub versus: String,
    pub resolution: String,
    pub status: ConflictStatus,
    pub agents: Vec<AgentKind>,
    pub savings_impact: u64,
}

/// Complete result of one engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CalculatedMetrics {
    /// Percent, one decimal, within 8..=18.
    pub profit_growth: f64,
    /// Percent, one decimal, within 1..=4.
    pub ctc_reduction: f64,
    pub overall_confidence: u32,
    pub total_savings: i64,
    pub total_headcount_change: i64,
    pub agents: [CalculatedAgent; AGENT_COUNT],
    pub profit_projection: [ProjectionPoint; PROJECTION_POINTS],
    pub ctc_projection: [ProjectionPoint; PROJECTION_POINTS],
    pub conflicts: Vec<ConflictRecord>,
}

impl CalculatedMetrics {
    pub fn agent(&self, kind: AgentKind) -> &CalculatedAgent {
        &self.agents[kind.index()]
    }
}
