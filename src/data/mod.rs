//! Data acquisition: fredgraph CSV fetch, session cache, offline samples.

pub mod cache;
pub mod fredgraph;
pub mod sample;

pub use cache::SeriesCache;
pub use fredgraph::FredGraphClient;
