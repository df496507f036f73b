//! Input/output helpers.
//!
//! - uploaded-file loading with extension dispatch (`loader`)
//! - report exports (CSV/JSON) (`export`)

pub mod export;
pub mod loader;

pub use export::*;
pub use loader::*;
