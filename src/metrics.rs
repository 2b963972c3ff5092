use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct SummaryMetrics {
    requests: AtomicU64,
    external_summaries: AtomicU64,
    fallback_summaries: AtomicU64,
    engine_calls: AtomicU64,
}

impl SummaryMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a summary produced by the external engine and the number of engine calls it took.
    pub fn record_external(&self, engine_calls: u64) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.external_summaries.fetch_add(1, Ordering::Relaxed);
        self.engine_calls.fetch_add(engine_calls, Ordering::Relaxed);
    }

    /// Record a summary produced by the local extractive fallback.
    pub fn record_fallback(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.fallback_summaries.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            summaries_requested: self.requests.load(Ordering::Relaxed),
            external_summaries: self.external_summaries.load(Ordering::Relaxed),
            fallback_summaries: self.fallback_summaries.load(Ordering::Relaxed),
            engine_calls: self.engine_calls.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of summarization counters used for reporting.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Summaries produced since startup, regardless of provider.
    pub summaries_requested: u64,
    /// Summaries produced by the external engine.
    pub external_summaries: u64,
    /// Summaries produced by the local fallback.
    pub fallback_summaries: u64,
    /// Successful engine calls behind the external summaries.
    pub engine_calls: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_external_and_fallback_summaries() {
        let metrics = SummaryMetrics::new();
        metrics.record_external(5);
        metrics.record_fallback();
        metrics.record_external(1);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.summaries_requested, 3);
        assert_eq!(snapshot.external_summaries, 2);
        assert_eq!(snapshot.fallback_summaries, 1);
        assert_eq!(snapshot.engine_calls, 6);
    }

    #[test]
    fn snapshot_is_consistent() {
        let metrics = SummaryMetrics::new();
        assert_eq!(metrics.snapshot().summaries_requested, 0);
        assert_eq!(metrics.snapshot().engine_calls, 0);
    }
}
