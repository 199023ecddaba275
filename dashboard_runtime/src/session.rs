//! Dashboard session - the in-memory state behind one dashboard view.
//!
//! Holds the config, the optional uploaded company data, and the last
//! evaluated plan. Nothing is persisted.
//!
//! Evaluate order:
//!   1. resolve + validate the request    - may reject
//!   2. calculate_metrics                 - total, never fails
//!   3. try_validate_invariants           - only then is the result stored

use std::sync::{Mutex, MutexGuard};

use metrics_engine::domain::CalculatedMetrics;
use metrics_engine::engine::calculate_metrics;
use metrics_engine::hashing::canonical_hash;
use metrics_engine::invariants::try_validate_invariants;
use serde::Serialize;

use crate::company::{CompanyMetrics, CompanyProfile, StandardColumn};
use crate::config::DashboardConfig;
use crate::error::{Result, RuntimeError};
use crate::plan::{self, PlanInputs, PlanRequest};

/// Company-data status as shown to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompanyDataStatus {
    NoData { message: String },
    Loaded {
        metrics: CompanyMetrics,
        detected_columns: Vec<StandardColumn>,
        /// Raw headers that matched no standard column.
        unmapped_columns: Vec<String>,
    },
}

/// One dashboard's state.
pub struct DashboardSession {
    config: DashboardConfig,
    company: Option<CompanyProfile>,
    current: Option<(PlanInputs, CalculatedMetrics)>,
}

impl DashboardSession {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            company: None,
            current: None,
        }
    }

    /// Replace any loaded company data with a parsed CSV document.
    pub fn load_company_csv(&mut self, text: &str) -> Result<&CompanyProfile> {
        let profile = CompanyProfile::from_csv_str(text)?;
        tracing::info!(
            records = profile.record_count(),
            proposed_investment = ?profile.proposed_investment(self.config.revenue_investment_share),
            "company data loaded into session"
        );
        Ok(&*self.company.insert(profile))
    }

    pub fn clear_company_data(&mut self) {
        self.company = None;
    }

    pub fn company(&self) -> Option<&CompanyProfile> {
        self.company.as_ref()
    }

    pub fn company_status(&self) -> CompanyDataStatus {
        match &self.company {
            Some(profile) => CompanyDataStatus::Loaded {
                metrics: profile.metrics().clone(),
                detected_columns: profile.detected_columns(),
                unmapped_columns: profile.unmapped_columns().to_vec(),
            },
            None => CompanyDataStatus::NoData {
                message: "No company data uploaded yet. Using default baselines.".to_string(),
            },
        }
    }

    /// The investment a blank request would resolve to.
    pub fn default_investment(&self) -> f64 {
        plan::default_investment(&self.config, self.company.as_ref())
    }

    /// Resolve, compute, validate, and store.
    pub fn evaluate(&mut self, request: &PlanRequest) -> Result<&CalculatedMetrics> {
        let inputs = plan::resolve(request, &self.config, self.company.as_ref())?;
        let metrics = calculate_metrics(inputs.investment, inputs.timeline_weeks);
        try_validate_invariants(&metrics)?;

        tracing::info!(
            investment = inputs.investment,
            timeline_weeks = inputs.timeline_weeks,
            profit_growth = metrics.profit_growth,
            overall_confidence = metrics.overall_confidence,
            "plan evaluated"
        );

        Ok(&self.current.insert((inputs, metrics)).1)
    }

    pub fn current_inputs(&self) -> Option<&PlanInputs> {
        self.current.as_ref().map(|(inputs, _)| inputs)
    }

    pub fn current_metrics(&self) -> Option<&CalculatedMetrics> {
        self.current.as_ref().map(|(_, metrics)| metrics)
    }

    /// Canonical hash of the last evaluated result.
    pub fn current_hash(&self) -> Result<String> {
        let metrics = self.current_metrics().ok_or(RuntimeError::NoPlan)?;
        Ok(canonical_hash(metrics)?)
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
}

/// Thread-safe session handle.
pub struct SharedSession {
    inner: Mutex<DashboardSession>,
}

impl SharedSession {
    pub fn new(session: DashboardSession) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DashboardSession> {
        // `evaluate` stores only after validation, so a poisoned session
        // still holds a consistent plan.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Evaluate under lock. Returns an owned copy of the result.
    pub fn evaluate(&self, request: &PlanRequest) -> Result<CalculatedMetrics> {
        self.lock().evaluate(request).cloned()
    }

    pub fn load_company_csv(&self, text: &str) -> Result<()> {
        self.lock().load_company_csv(text).map(|_| ())
    }

    pub fn current_hash(&self) -> Result<String> {
        self.lock().current_hash()
    }

    pub fn company_status(&self) -> CompanyDataStatus {
        self.lock().company_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_stores_result() {
        let mut session = DashboardSession::new(DashboardConfig::default());
        assert!(matches!(session.current_hash(), Err(RuntimeError::NoPlan)));

        let m = session.evaluate(&PlanRequest::default()).unwrap().clone();
        assert_eq!(m.total_savings, 620_000);
        assert_eq!(session.current_inputs().unwrap().investment, 620_000.0);
        assert_eq!(session.current_hash().unwrap().len(), 64);
    }

    #[test]
    fn rejected_request_keeps_previous_plan() {
        let mut session = DashboardSession::new(DashboardConfig::default());
        session.evaluate(&PlanRequest::new(500_000.0, 10.0)).unwrap();
        let before = session.current_hash().unwrap();

        assert!(session.evaluate(&PlanRequest::new(-5.0, 10.0)).is_err());
        assert_eq!(session.current_hash().unwrap(), before);
    }

    #[test]
    fn company_status_reflects_upload() {
        let mut session = DashboardSession::new(DashboardConfig::default());
        assert!(matches!(session.company_status(), CompanyDataStatus::NoData { .. }));

        session.load_company_csv("revenue,headcount\n4000000,300\n").unwrap();
        match session.company_status() {
            CompanyDataStatus::Loaded {
                detected_columns,
                metrics,
                unmapped_columns,
            } => {
                assert_eq!(
                    detected_columns,
                    vec![StandardColumn::Revenue, StandardColumn::Headcount]
                );
                assert!(unmapped_columns.is_empty());
                assert_eq!(metrics.current_headcount, 300);
            }
            other => panic!("unexpected status {:?}", other),
        }
        assert!((session.default_investment() - 248_000.0).abs() < 1e-6);

        session.clear_company_data();
        assert_eq!(session.default_investment(), 620_000.0);
    }

    #[test]
    fn unrecognized_headers_are_reported() {
        let mut session = DashboardSession::new(DashboardConfig::default());
        session.load_company_csv("Region,Sales Lead\nEU,Ana\n").unwrap();
        match session.company_status() {
            CompanyDataStatus::Loaded {
                detected_columns,
                unmapped_columns,
                ..
            } => {
                assert!(detected_columns.is_empty());
                assert_eq!(unmapped_columns, vec!["region".to_string(), "sales_lead".to_string()]);
            }
            other => panic!("unexpected status {:?}", other),
        }

        let json = serde_json::to_value(session.company_status()).unwrap();
        assert_eq!(json["status"], "loaded");
        assert_eq!(json["unmapped_columns"][1], "sales_lead");
    }

    #[test]
    fn status_serializes_with_tag() {
        let session = DashboardSession::new(DashboardConfig::default());
        let json = serde_json::to_value(session.company_status()).unwrap();
        assert_eq!(json["status"], "no_data");
    }
}
