//! Process-wide counters shared by every session handled by one engine.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Atomic counters. Owned by the caller and shared via `Arc`; they reset only
/// when the process restarts.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    unknown_count: AtomicU64,
    evidence_pivots: AtomicU64,
    dedup_retries_total: AtomicU64,
    dedup_duplicates_accepted: AtomicU64,
}

/// Point-in-time copy of [`EngineMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub unknown_count: u64,
    pub evidence_pivots: u64,
    pub dedup_retries_total: u64,
    pub dedup_duplicates_accepted: u64,
}

impl EngineMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_unknown(&self) {
        self.unknown_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pivot(&self) {
        self.evidence_pivots.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.dedup_retries_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate_accepted(&self) {
        self.dedup_duplicates_accepted.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            unknown_count: self.unknown_count.load(Ordering::Relaxed),
            evidence_pivots: self.evidence_pivots.load(Ordering::Relaxed),
            dedup_retries_total: self.dedup_retries_total.load(Ordering::Relaxed),
            dedup_duplicates_accepted: self.dedup_duplicates_accepted.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn counters_are_shared_across_clones_of_the_arc() {
        let metrics = Arc::new(EngineMetrics::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let m = Arc::clone(&metrics);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        m.record_retry();
                    }
                    m.record_unknown();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let snap = metrics.snapshot();
        assert_eq!(snap.dedup_retries_total, 100);
        assert_eq!(snap.unknown_count, 4);
        assert_eq!(snap.dedup_duplicates_accepted, 0);
    }
}
