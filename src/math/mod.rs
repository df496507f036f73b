//! Numerical helpers.
//!
//! - least squares solver used by the forecaster (`ols`)

pub mod ols;

pub use ols::*;
