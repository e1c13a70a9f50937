//! Pipeline compute stages.
//!
//! Responsibilities:
//!
//! - join two series on date (`align`)
//! - compute the ratio and base-year index columns (`derive`)
//! - restrict the derived table to a date window (`window`)

pub mod align;
pub mod derive;
pub mod window;

pub use align::*;
pub use derive::*;
pub use window::*;
