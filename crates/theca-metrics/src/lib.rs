//! # theca-metrics
//!
//! Fixed-cardinality request metrics for Theca.
//!
//! ## Modules
//!
//! - `families`: labelled counter, gauge, and histogram families
//! - `registry`: the [`Metrics`] set shared through application state
//! - `rps`: sliding-window requests-per-second aggregator

pub mod families;
pub mod registry;
pub mod rps;

pub use registry::Metrics;
pub use rps::RpsAggregator;
