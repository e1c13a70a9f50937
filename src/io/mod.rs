//! Input/output helpers.
//!
//! - windowed-table CSV export (`export`)
//! - dataset JSON read/write (`dataset`)

pub mod dataset;
pub mod export;

pub use dataset::*;
pub use export::*;
