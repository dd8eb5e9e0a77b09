//! Ordered trace of one run.

use patterns_env::Tracer;
use serde::{Deserialize, Serialize};

/// A single trace message with its position in the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// 0-based, gapless within one run
    pub sequence: u64,
    pub message: String,
}

/// Append-only log of everything a run emitted.
///
/// One sink per run: sequence numbers restart at zero on [`TraceSink::reset`].
#[derive(Debug, Clone, Default)]
pub struct TraceSink {
    events: Vec<TraceEvent>,
}

impl TraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message with the next sequence number.
    pub fn emit(&mut self, message: impl Into<String>) {
        let sequence = self.events.len() as u64;
        self.events.push(TraceEvent {
            sequence,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Returns the messages in emission order.
    pub fn messages(&self) -> Vec<String> {
        self.events.iter().map(|e| e.message.clone()).collect()
    }

    /// Drops all events.
    pub fn reset(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consumes the sink, returning its events.
    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }
}

impl Tracer for TraceSink {
    fn emit(&mut self, message: String) {
        TraceSink::emit(self, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reset_restarts_sequence() {
        let mut sink = TraceSink::new();
        sink.emit("a");
        sink.emit("b");
        sink.reset();
        assert!(sink.is_empty());

        sink.emit("c");
        assert_eq!(sink.events()[0].sequence, 0);
        assert_eq!(sink.messages(), vec!["c"]);
    }

    #[test]
    fn test_emits_through_tracer_trait() {
        let mut sink = TraceSink::new();
        let tracer: &mut dyn Tracer = &mut sink;
        tracer.emit("Order created".to_string());
        assert_eq!(sink.len(), 1);
    }

    proptest! {
        #[test]
        fn test_sequences_are_gapless(messages in proptest::collection::vec(".*", 0..50)) {
            let mut sink = TraceSink::new();
            for m in &messages {
                sink.emit(m.clone());
            }
            for (i, event) in sink.events().iter().enumerate() {
                prop_assert_eq!(event.sequence, i as u64);
            }
            prop_assert_eq!(sink.messages(), messages);
        }
    }
}
