//! Batch analysis: rates many shipments, isolates row failures, and
//! aggregates the outcome into an [`AnalysisSummary`](crate::models::AnalysisSummary).
//!
//! Rows can be spread over scoped worker threads. Results always come back in
//! input order and are identical to a sequential run.

mod aggregate;
mod processor;

pub use aggregate::{Aggregator, summarize};
pub use processor::{BatchOptions, BatchOutput, BatchProcessor, process};
