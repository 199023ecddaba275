//! Dashboard configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Investment used when the caller gives none and no revenue is known.
    pub default_investment: f64,
    pub default_timeline_weeks: f64,
    /// Share of total revenue proposed as the default investment.
    pub revenue_investment_share: f64,
    pub max_investment: f64,
    pub max_timeline_weeks: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_investment: 620_000.0,
            default_timeline_weeks: 12.0,
            revenue_investment_share: 0.062,
            max_investment: 100_000_000.0,
            max_timeline_weeks: 104.0,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|source| RuntimeError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.default_investment, 620_000.0);
        assert_eq!(cfg.revenue_investment_share, 0.062);
    }

    #[test]
    fn partial_document_overrides() {
        let cfg = DashboardConfig::from_toml_str("default_timeline_weeks = 16.0\n").unwrap();
        assert_eq!(cfg.default_timeline_weeks, 16.0);
        assert_eq!(cfg.max_timeline_weeks, 104.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = DashboardConfig::from_toml_str("budget = 5\n").unwrap_err();
        assert!(matches!(err, RuntimeError::ConfigParse(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        fs::write(&path, "max_investment = 5000000.0\n").unwrap();
        let cfg = DashboardConfig::load(&path).unwrap();
        assert_eq!(cfg.max_investment, 5_000_000.0);

        fs::write(&path, "max_investment = \"lots\"\n").unwrap();
        assert!(matches!(
            DashboardConfig::load(&path),
            Err(RuntimeError::Config { .. })
        ));
    }
}
