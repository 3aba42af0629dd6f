//! Analysis service integration.
//!
//! This module fetches per-video analyses from the analysis service and
//! decodes saved or raw analysis payloads.

pub mod client;
pub mod payload;

pub use client::AnalysisClient;
pub use payload::load_result;
