#![forbid(unsafe_code)]

//! Metrics Engine v1
//!
//! Pure, synchronous derivation of dashboard metrics from two executive
//! inputs: total investment and timeline in weeks. No I/O, no shared
//! mutable state. Every call is independent.

/// Engine v1. Formula changes require a new engine version.
pub const ENGINE_VERSION: u32 = 1;

pub mod arithmetic;
pub mod catalog;
pub mod scaling;
pub mod domain;
pub mod engine;
pub mod invariants;
pub mod hashing;
pub mod format;

pub use domain::CalculatedMetrics;
pub use engine::calculate_metrics;
