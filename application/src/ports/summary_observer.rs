//! Observability port for the summary pipeline.
//!
//! Two kinds of events leave the pipeline:
//!
//! - one [`SummaryRecord`] per summarized round, once its outcome is final
//! - a suspension event whenever `get_summary` actually has to wait, which
//!   means the lag budget was not enough and is worth alerting on

use council_domain::{RoundNumber, SummaryStatus};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{info, warn};

/// Per-round summarization metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    pub round_number: RoundNumber,
    pub input_char_count: usize,
    pub output_char_count: usize,
    /// `input_char_count / output_char_count`, `0.0` for empty output
    pub compression_ratio: f64,
    pub latency: Duration,
    /// One of `Ready`, `Degraded`, `Unavailable`
    pub outcome: SummaryStatus,
}

impl SummaryRecord {
    pub fn new(
        round_number: RoundNumber,
        input_char_count: usize,
        output_char_count: usize,
        latency: Duration,
        outcome: SummaryStatus,
    ) -> Self {
        let compression_ratio = if output_char_count == 0 {
            0.0
        } else {
            input_char_count as f64 / output_char_count as f64
        };
        Self {
            round_number,
            input_char_count,
            output_char_count,
            compression_ratio,
            latency,
            outcome,
        }
    }
}

/// Sink for summary pipeline metrics
///
/// Calls are synchronous and infallible; implementations must not block.
pub trait SummaryObserver: Send + Sync {
    /// A round's summary reached its final outcome.
    fn on_summary_complete(&self, record: &SummaryRecord);

    /// `get_summary` had to suspend the driver for `waited`.
    fn on_summary_suspended(&self, round_number: RoundNumber, waited: Duration);
}

/// No-op observer
pub struct NoSummaryObserver;

impl SummaryObserver for NoSummaryObserver {
    fn on_summary_complete(&self, _record: &SummaryRecord) {}
    fn on_summary_suspended(&self, _round_number: RoundNumber, _waited: Duration) {}
}

/// Emits every event through `tracing`.
pub struct TracingSummaryObserver;

impl SummaryObserver for TracingSummaryObserver {
    fn on_summary_complete(&self, record: &SummaryRecord) {
        info!(
            round = record.round_number,
            input_chars = record.input_char_count,
            output_chars = record.output_char_count,
            compression_ratio = record.compression_ratio,
            latency_ms = record.latency.as_millis() as u64,
            outcome = record.outcome.as_str(),
            "round summary complete"
        );
    }

    fn on_summary_suspended(&self, round_number: RoundNumber, waited: Duration) {
        warn!(
            round = round_number,
            waited_ms = waited.as_millis() as u64,
            "driver suspended waiting for round summary"
        );
    }
}

/// Outcome and suspension counters.
#[derive(Debug, Default)]
pub struct SummaryCounters {
    ready: AtomicUsize,
    degraded: AtomicUsize,
    unavailable: AtomicUsize,
    suspensions: AtomicUsize,
}

impl SummaryCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(&self) -> usize {
        self.ready.load(Ordering::Relaxed)
    }

    pub fn degraded(&self) -> usize {
        self.degraded.load(Ordering::Relaxed)
    }

    pub fn unavailable(&self) -> usize {
        self.unavailable.load(Ordering::Relaxed)
    }

    pub fn suspensions(&self) -> usize {
        self.suspensions.load(Ordering::Relaxed)
    }

    pub fn completed(&self) -> usize {
        self.ready() + self.degraded() + self.unavailable()
    }
}

impl SummaryObserver for SummaryCounters {
    fn on_summary_complete(&self, record: &SummaryRecord) {
        let counter = match record.outcome {
            SummaryStatus::Ready => &self.ready,
            SummaryStatus::Degraded => &self.degraded,
            _ => &self.unavailable,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn on_summary_suspended(&self, _round_number: RoundNumber, _waited: Duration) {
        self.suspensions.fetch_add(1, Ordering::Relaxed);
    }
}

/// Fans events out to several observers.
#[derive(Default)]
pub struct CompositeSummaryObserver {
    observers: Vec<Arc<dyn SummaryObserver>>,
}

impl CompositeSummaryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn SummaryObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl SummaryObserver for CompositeSummaryObserver {
    fn on_summary_complete(&self, record: &SummaryRecord) {
        for observer in &self.observers {
            observer.on_summary_complete(record);
        }
    }

    fn on_summary_suspended(&self, round_number: RoundNumber, waited: Duration) {
        for observer in &self.observers {
            observer.on_summary_suspended(round_number, waited);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_ratio() {
        let record = SummaryRecord::new(1, 900, 300, Duration::ZERO, SummaryStatus::Ready);
        assert!((record.compression_ratio - 3.0).abs() < f64::EPSILON);

        let empty = SummaryRecord::new(1, 900, 0, Duration::ZERO, SummaryStatus::Unavailable);
        assert_eq!(empty.compression_ratio, 0.0);
    }

    #[test]
    fn test_counters() {
        let counters = SummaryCounters::new();
        counters.on_summary_complete(&SummaryRecord::new(
            1,
            10,
            5,
            Duration::ZERO,
            SummaryStatus::Ready,
        ));
        counters.on_summary_complete(&SummaryRecord::new(
            2,
            10,
            5,
            Duration::ZERO,
            SummaryStatus::Degraded,
        ));
        counters.on_summary_complete(&SummaryRecord::new(
            3,
            10,
            27,
            Duration::ZERO,
            SummaryStatus::Unavailable,
        ));
        counters.on_summary_suspended(4, Duration::from_millis(5));

        assert_eq!(counters.ready(), 1);
        assert_eq!(counters.degraded(), 1);
        assert_eq!(counters.unavailable(), 1);
        assert_eq!(counters.completed(), 3);
        assert_eq!(counters.suspensions(), 1);
    }

    #[test]
    fn test_composite_fans_out() {
        let a = Arc::new(SummaryCounters::new());
        let b = Arc::new(SummaryCounters::new());
        let composite = CompositeSummaryObserver::new()
            .with(a.clone())
            .with(b.clone());
        assert_eq!(composite.len(), 2);

        composite.on_summary_suspended(1, Duration::from_millis(1));
        assert_eq!(a.suspensions(), 1);
        assert_eq!(b.suspensions(), 1);
    }
}
