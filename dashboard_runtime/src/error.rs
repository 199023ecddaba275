//! Runtime error taxonomy.
//!
//! The engine is total and never fails; everything here belongs to the
//! boundary: input validation, company data, configuration, and I/O.

use std::path::PathBuf;

use metrics_engine::invariants::InvariantViolation;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("invalid {field} {value}: {reason}")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("company data rejected: {0}")]
    CompanyData(String),

    #[error("company data is not readable CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config parse failed: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("engine result failed validation: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("determinism failure for investment={investment}, timeline={timeline}: {first} != {second}")]
    Determinism {
        investment: f64,
        timeline: f64,
        first: String,
        second: String,
    },

    #[error("no plan has been evaluated yet")]
    NoPlan,

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
