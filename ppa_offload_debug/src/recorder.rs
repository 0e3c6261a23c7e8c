// Copyright 2026 the PPA Offload Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and appends every event it
//! receives, in order, as a [`RecordedEvent`].

use ppa_offload_core::trace::{
    CacheSyncEvent, DispatchBeginEvent, DispatchEndEvent, EvaluateEvent, TraceSink,
};

/// A recorded trace event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// An [`EvaluateEvent`].
    Evaluate(EvaluateEvent),
    /// A [`CacheSyncEvent`].
    CacheSync(CacheSyncEvent),
    /// A [`DispatchBeginEvent`].
    DispatchBegin(DispatchBeginEvent),
    /// A [`DispatchEndEvent`].
    DispatchEnd(DispatchEndEvent),
}

impl RecordedEvent {
    /// Dispatch counter the event belongs to.
    #[must_use]
    pub fn dispatch_index(&self) -> u64 {
        match self {
            Self::Evaluate(e) => e.dispatch_index,
            Self::CacheSync(e) => e.dispatch_index,
            Self::DispatchBegin(e) => e.dispatch_index,
            Self::DispatchEnd(e) => e.dispatch_index,
        }
    }
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for RecorderSink {
    fn on_evaluate(&mut self, e: &EvaluateEvent) {
        self.events.push(RecordedEvent::Evaluate(*e));
    }

    fn on_cache_sync(&mut self, e: &CacheSyncEvent) {
        self.events.push(RecordedEvent::CacheSync(*e));
    }

    fn on_dispatch_begin(&mut self, e: &DispatchBeginEvent) {
        self.events.push(RecordedEvent::DispatchBegin(*e));
    }

    fn on_dispatch_end(&mut self, e: &DispatchEndEvent) {
        self.events.push(RecordedEvent::DispatchEnd(*e));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ppa_offload_core::buffer::DrawBuffer;
    use ppa_offload_core::coherency::SyncDirection;
    use ppa_offload_core::format::{ColorFormat, OperationKind};
    use ppa_offload_core::mode::to_hardware_mode;
    use ppa_offload_core::task::{PixelRect, TaskKind};

    #[test]
    fn records_events_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_evaluate(&EvaluateEvent {
            dispatch_index: 4,
            task: TaskKind::Fill,
            outcome: Ok(OperationKind::FillTarget),
        });
        rec.on_cache_sync(&CacheSyncEvent {
            dispatch_index: 4,
            buffer: DrawBuffer::new(0x8000, 256),
            direction: SyncDirection::CacheToMemory,
        });
        rec.on_dispatch_begin(&DispatchBeginEvent {
            dispatch_index: 4,
            operation: OperationKind::FillTarget,
            mode: to_hardware_mode(ColorFormat::Rgb565, OperationKind::FillTarget),
            region: PixelRect::new(0, 0, 8, 8),
        });
        rec.on_dispatch_end(&DispatchEndEvent {
            dispatch_index: 4,
            operation: OperationKind::FillTarget,
            result: Ok(()),
        });

        let events = rec.events();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], RecordedEvent::Evaluate(_)));
        assert!(matches!(events[1], RecordedEvent::CacheSync(_)));
        assert!(matches!(events[2], RecordedEvent::DispatchBegin(_)));
        assert!(matches!(events[3], RecordedEvent::DispatchEnd(_)));
        assert!(events.iter().all(|e| e.dispatch_index() == 4));
    }

    #[test]
    fn clear_discards_events() {
        let mut rec = RecorderSink::new();
        rec.on_evaluate(&EvaluateEvent {
            dispatch_index: 0,
            task: TaskKind::Other,
            outcome: Err(ppa_offload_core::plan::RejectReason::NotAccelerated),
        });
        rec.clear();
        assert!(rec.into_events().is_empty());
    }
}
