//! Metrics Engine v1 - Static Reference Data
//!
//! The six modelled business functions, their scaling parameters, the fixed
//! narrative attached to each, and the fixed conflict registry.
//! Read-only. Shared freely across concurrent calls.

use serde::{Deserialize, Serialize};

use crate::domain::{ConflictRecord, ConflictStatus};

/// Number of agents in the catalog. Result arrays are sized by this.
pub const AGENT_COUNT: usize = 6;

/// A modelled business function. Closed set: adding a variant forces every
/// match below to be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Sales,
    Marketing,
    Finance,
    Operations,
    Support,
    HR,
}

/// Scaling parameters for one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentProfile {
    /// Fraction of the total budget, 0..1.
    pub base_allocation: f64,
    /// Signed currency units at the reference investment. Negative = net cost.
    pub base_savings: f64,
    pub base_headcount: i64,
    /// 0..100
    pub base_confidence: u32,
    /// 0..1, higher = more volatile.
    pub risk_factor: f64,
}

/// Fixed narrative text for one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentNarrative {
    pub decision: &'static str,
    pub trigger: &'static str,
}

impl AgentKind {
    /// Declaration order. Result ordering follows this.
    pub const ALL: [AgentKind; AGENT_COUNT] = [
        AgentKind::Sales,
        AgentKind::Marketing,
        AgentKind::Finance,
        AgentKind::Operations,
        AgentKind::Support,
        AgentKind::HR,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Sales => "Sales",
            AgentKind::Marketing => "Marketing",
            AgentKind::Finance => "Finance",
            AgentKind::Operations => "Operations",
            AgentKind::Support => "Support",
            AgentKind::HR => "HR",
        }
    }

    /// Position in `ALL`, which is also the position in result arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_name(name: &str) -> Option<AgentKind> {
        AgentKind::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    pub fn profile(self) -> AgentProfile {
        match self {
            AgentKind::Sales => AgentProfile {
                base_allocation: 0.14,
                base_savings: 85_000.0,
                base_headcount: -3,
                base_confidence: 89,
                risk_factor: 0.2,
            },
            AgentKind::Marketing => AgentProfile {
                base_allocation: 0.19,
                base_savings: -120_000.0,
                base_headcount: 0,
                base_confidence: 82,
                risk_factor: 0.4,
            },
            AgentKind::Finance => AgentProfile {
                base_allocation: 0.15,
                base_savings: 195_000.0,
                base_headcount: 0,
                base_confidence: 94,
                risk_factor: 0.1,
            },
            AgentKind::Operations => AgentProfile {
                base_allocation: 0.22,
                base_savings: 220_000.0,
                base_headcount: -5,
                base_confidence: 87,
                risk_factor: 0.35,
            },
            AgentKind::Support => AgentProfile {
                base_allocation: 0.15,
                base_savings: 95_000.0,
                base_headcount: -2,
                base_confidence: 91,
                risk_factor: 0.15,
            },
            AgentKind::HR => AgentProfile {
                base_allocation: 0.15,
                base_savings: 145_000.0,
                base_headcount: -4,
                base_confidence: 85,
                risk_factor: 0.3,
            },
        }
    }

    pub fn narrative(self) -> AgentNarrative {
        match self {
            AgentKind::Sales => AgentNarrative {
                decision: "Implement AI-powered lead scoring and automate outreach sequences. \
                           Freeze new SDR hiring.",
                trigger: "If Q2 pipeline drops below $2.5M, recommend 2 SDR hires",
            },
            AgentKind::Marketing => AgentNarrative {
                decision: "Shift 60% budget to performance channels. \
                           Deploy AI content generation for 4x output.",
                trigger: "If CAC exceeds $180, revert to brand awareness mix",
            },
            AgentKind::Finance => AgentNarrative {
                decision: "Consolidate 3 vendor contracts. \
                           Implement dynamic pricing with 2.5% margin optimization.",
                trigger: "If customer churn exceeds 8%, pause pricing changes",
            },
            AgentKind::Operations => AgentNarrative {
                decision: "Automate 40% of manual workflows. \
                           Consolidate 2 regional offices into hybrid model.",
                trigger: "If SLA breaches exceed 2%, restore on-site capacity",
            },
            AgentKind::Support => AgentNarrative {
                decision: "Deploy AI chatbot for L1 queries (60% deflection). \
                           Upskill team for complex cases.",
                trigger: "If CSAT drops below 4.2, increase human agent ratio",
            },
            AgentKind::HR => AgentNarrative {
                decision: "Freeze non-critical hiring. \
                           Implement performance-based variable compensation (+15%).",
                trigger: "If voluntary attrition exceeds 12%, review freeze policy",
            },
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed conflict registry, in id order.
pub fn conflict_registry() -> Vec<ConflictRecord> {
    vec![
        ConflictRecord {
            id: 1,
            conflict: "Growth vs Efficiency".to_string(),
            versus: "Cost Reduction Pressure".to_string(),
            resolution: "Prioritize automation over headcount reduction".to_string(),
            status: ConflictStatus::Resolved,
            agents: vec![AgentKind::HR, AgentKind::Operations],
            savings_impact: 85_000,
        },
        ConflictRecord {
            id: 2,
            conflict: "Marketing Spend".to_string(),
            versus: "CAC Targets".to_string(),
            resolution: "Shift 60% to performance channels".to_string(),
            status: ConflictStatus::Resolved,
            agents: vec![AgentKind::Marketing, AgentKind::Finance],
            savings_impact: 120_000,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_names_are_unique_and_round_trip() {
        let names: BTreeSet<&str> = AgentKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), AGENT_COUNT);
        for kind in AgentKind::ALL {
            assert_eq!(AgentKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(AgentKind::from_name("Legal"), None);
        for (i, kind) in AgentKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_every_agent_has_narrative() {
        for kind in AgentKind::ALL {
            let n = kind.narrative();
            assert!(!n.decision.is_empty(), "{} has empty decision", kind);
            assert!(!n.trigger.is_empty(), "{} has empty trigger", kind);
        }
    }

    #[test]
    fn test_narrative_line_continuation_keeps_single_space() {
        let n = AgentKind::Sales.narrative();
        assert_eq!(
            n.decision,
            "Implement AI-powered lead scoring and automate outreach sequences. Freeze new SDR hiring."
        );
    }

    #[test]
    fn test_profile_ranges() {
        let mut allocation = 0.0;
        for kind in AgentKind::ALL {
            let p = kind.profile();
            assert!((0.0..=1.0).contains(&p.base_allocation));
            assert!((0.0..=1.0).contains(&p.risk_factor));
            assert!(p.base_confidence <= 100);
            allocation += p.base_allocation;
        }
        assert!((allocation - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_only_marketing_is_net_cost() {
        let costs: Vec<AgentKind> = AgentKind::ALL
            .into_iter()
            .filter(|k| k.profile().base_savings < 0.0)
            .collect();
        assert_eq!(costs, vec![AgentKind::Marketing]);
    }

    #[test]
    fn test_conflict_registry_shape() {
        let conflicts = conflict_registry();
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].id, 1);
        assert_eq!(conflicts[1].id, 2);
        assert_eq!(conflicts[0].agents, vec![AgentKind::HR, AgentKind::Operations]);
        assert!(conflicts.iter().all(|c| c.status == ConflictStatus::Resolved));
    }
}
