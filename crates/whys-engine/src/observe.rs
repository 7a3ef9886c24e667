//! Event sinks for engine observability.

use std::sync::Mutex;

use whys_core::events::EngineEvent;

/// Receives every [`EngineEvent`]. Sinks must not fail the operation that
/// emitted the event; they log their own errors.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &EngineEvent);
}

/// Emits events as structured `tracing` records on the `whys::events` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &EngineEvent) {
        let signals = event.signals();
        tracing::info!(
            target: "whys::events",
            kind = event.kind(),
            session = event.session_id(),
            answer_type = signals.answer_type.map(|t| t.as_str()),
            pivot_mode = signals.pivot_mode.map(|p| p.as_str()),
            depth_score = signals.depth_score,
            unknown_count = signals.unknown_count,
            unknown_streak = signals.unknown_streak,
            evidence_pivots = signals.evidence_pivots,
            dedup_retries_total = signals.dedup_retries_total,
            dedup_duplicates_accepted = signals.dedup_duplicates_accepted,
            "engine event"
        );
    }
}

/// Discards events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn record(&self, _event: &EngineEvent) {}
}

/// Keeps events in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<EngineEvent>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every recorded event.
    #[must_use]
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: &EngineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whys_core::events::Signals;

    #[test]
    fn memory_sink_keeps_order() {
        let sink = MemorySink::new();
        for step in 1..=2 {
            sink.record(&EngineEvent::Classified {
                session_id: "rca-1".into(),
                step,
                signals: Signals::default(),
            });
        }
        let steps: Vec<_> = sink
            .events()
            .iter()
            .map(|e| match e {
                EngineEvent::Classified { step, .. } => *step,
                _ => 0,
            })
            .collect();
        assert_eq!(steps, vec![1, 2]);
        NoopSink.record(&sink.events()[0]);
    }
}
