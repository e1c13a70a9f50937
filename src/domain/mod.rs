//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - fetched series types (`Observation`, `SeriesTable`)
//! - joined/derived table rows (`JoinedRow`, `AlignedRow`, `IndexBases`)
//! - dashboard configuration (`Dashboard`, `JoinMode`, `DateWindow`,
//!   `DashboardConfig`)
//! - renderable chart descriptions (`Panel`, `PanelSeries`)

pub mod types;

pub use types::*;
