//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the raw uploaded table (`RawTable`)
//! - the aggregated monthly series (`MonthlyRecord`, `MonthlyTable`)
//! - metric and forecast outputs (`MetricsSummary`, `ForecastPoint`)
//! - run configuration (`ReportConfig`) and month arithmetic helpers

pub mod types;

pub use types::*;
