//! Report assembly: narrative text and formatted terminal output.
//!
//! Formatting lives in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod format;

pub use format::*;
