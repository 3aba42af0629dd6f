//! Analysis modules.
//!
//! Aggregation of per-comment sentiment and keywords into insight views.

pub mod aggregator;

pub use aggregator::*;
