//! Fire-and-forget event delivery.

use std::sync::Arc;

use fusionswap_types::SwapEvent;
use parking_lot::Mutex;

/// Receives committed protocol events. Must not fail or block.
pub trait EventSink {
    fn emit(&self, event: &SwapEvent);
}

/// Forwards events to `tracing` at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &SwapEvent) {
        tracing::info!(target: "fusionswap::events", event = %event, details = ?event, "Protocol event");
    }
}

/// Keeps every event in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventSink {
    events: Arc<Mutex<Vec<SwapEvent>>>,
}

impl MemoryEventSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    #[must_use]
    pub fn events(&self) -> Vec<SwapEvent> {
        self.events.lock().clone()
    }

    /// Names of everything emitted so far, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(SwapEvent::name).collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, event: &SwapEvent) {
        self.events.lock().push(event.clone());
    }
}
