#![forbid(unsafe_code)]

//! Dashboard Runtime
//!
//! Boundary layer around the metrics engine: configuration, input
//! validation, company-data ingestion, the in-memory dashboard session,
//! scenario comparison, and the serialized report.
//!
//! No formula lives here. Every number comes from `metrics_engine`.

pub mod error;
pub mod config;
pub mod plan;
pub mod company;
pub mod session;
pub mod compare;
pub mod sweep;
pub mod report;

pub use error::{Result, RuntimeError};
