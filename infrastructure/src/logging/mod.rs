//! Logging infrastructure: structured summary metrics.
//!
//! Provides [`JsonlSummaryLog`], a JSONL file writer that implements
//! the [`SummaryObserver`](council_application::SummaryObserver) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlSummaryLog;
