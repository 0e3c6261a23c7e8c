// Copyright 2026 the PPA Offload Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the dispatch path.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [draw unit](crate::unit::DrawUnit) calls at each step of a dispatch. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use crate::buffer::DrawBuffer;
use crate::coherency::SyncDirection;
use crate::error::AccelError;
use crate::format::OperationKind;
use crate::mode::HardwareMode;
use crate::plan::RejectReason;
use crate::task::{PixelRect, TaskKind};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted once per dispatch attempt with the accept/reject decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluateEvent {
    /// Dispatch counter of the draw unit.
    pub dispatch_index: u64,
    /// What kind of task was offered.
    pub task: TaskKind,
    /// The target operation chosen, or why the task was rejected.
    pub outcome: Result<OperationKind, RejectReason>,
}

/// Emitted for each cache maintenance call the dispatch issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheSyncEvent {
    /// Dispatch counter of the draw unit.
    pub dispatch_index: u64,
    /// Region synchronized.
    pub buffer: DrawBuffer,
    /// Flush or invalidate.
    pub direction: SyncDirection,
}

/// Emitted immediately before the accelerator driver is called.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchBeginEvent {
    /// Dispatch counter of the draw unit.
    pub dispatch_index: u64,
    /// Target operation.
    pub operation: OperationKind,
    /// Translated target mode.
    pub mode: HardwareMode,
    /// Region of the target written.
    pub region: PixelRect,
}

/// Emitted when the accelerator driver returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchEndEvent {
    /// Dispatch counter of the draw unit.
    pub dispatch_index: u64,
    /// Target operation.
    pub operation: OperationKind,
    /// Driver result.
    pub result: Result<(), AccelError>,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the dispatch path.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a task has been evaluated.
    fn on_evaluate(&mut self, e: &EvaluateEvent) {
        _ = e;
    }

    /// Called after each cache maintenance call.
    fn on_cache_sync(&mut self, e: &CacheSyncEvent) {
        _ = e;
    }

    /// Called before the driver runs an operation.
    fn on_dispatch_begin(&mut self, e: &DispatchBeginEvent) {
        _ = e;
    }

    /// Called after the driver returns.
    fn on_dispatch_end(&mut self, e: &DispatchEndEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`EvaluateEvent`].
    #[inline]
    pub fn evaluate(&mut self, e: &EvaluateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_evaluate(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CacheSyncEvent`].
    #[inline]
    pub fn cache_sync(&mut self, e: &CacheSyncEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cache_sync(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DispatchBeginEvent`].
    #[inline]
    pub fn dispatch_begin(&mut self, e: &DispatchBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_dispatch_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DispatchEndEvent`].
    #[inline]
    pub fn dispatch_end(&mut self, e: &DispatchEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_dispatch_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_evaluate() -> EvaluateEvent {
        EvaluateEvent {
            dispatch_index: 3,
            task: TaskKind::Fill,
            outcome: Ok(OperationKind::FillTarget),
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_evaluate(&sample_evaluate());
        sink.on_cache_sync(&CacheSyncEvent {
            dispatch_index: 3,
            buffer: DrawBuffer::new(0x4000, 64),
            direction: SyncDirection::CacheToMemory,
        });
        sink.on_dispatch_end(&DispatchEndEvent {
            dispatch_index: 3,
            operation: OperationKind::FillTarget,
            result: Err(AccelError::Timeout),
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.evaluate(&sample_evaluate());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            indices: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_evaluate(&mut self, e: &EvaluateEvent) {
                self.indices.push(e.dispatch_index);
            }
        }

        let mut sink = RecordingSink {
            indices: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.evaluate(&sample_evaluate());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.indices, &[3]);
    }
}
