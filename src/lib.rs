//! Practice coverage ("script QC") analytics.
//!
//! Flattens a week of scripted practice and reports how it covers the
//! program's buckets, concept families, rep quotas, call-sheet situations and
//! execution reviews, ending in a ranked list of recommendations. Every stage
//! is a pure function of the week, the play registry and the setup config.
pub mod buckets;
pub mod config;
pub mod days;
pub mod error;
pub mod loader;
pub mod model;
pub mod output;
pub mod quotas;
pub mod recommendations;
pub mod reports;
pub mod rows;
pub mod situations;
pub mod types;
pub mod util;

pub use config::Thresholds;
pub use error::{CoverageError, Result};
pub use model::{PlayRegistry, SetupConfig, Week};
pub use reports::{compute_coverage_report, compute_coverage_report_with};
pub use types::CoverageReport;
