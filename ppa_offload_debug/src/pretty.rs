// Copyright 2026 the PPA Offload Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use ppa_offload_core::coherency::SyncDirection;
use ppa_offload_core::task::PixelRect;
use ppa_offload_core::trace::{
    CacheSyncEvent, DispatchBeginEvent, DispatchEndEvent, EvaluateEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn direction_name(direction: SyncDirection) -> &'static str {
    match direction {
        SyncDirection::CacheToMemory => "c2m",
        SyncDirection::MemoryToCache => "m2c",
    }
}

struct Region(PixelRect);

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = self.0;
        write!(f, "{}x{}@({},{})", r.width, r.height, r.x, r.y)
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_evaluate(&mut self, e: &EvaluateEvent) {
        let _ = match e.outcome {
            Ok(operation) => writeln!(
                self.writer,
                "[evaluate] dispatch={} task={:?} accepted={operation:?}",
                e.dispatch_index, e.task,
            ),
            Err(reason) => writeln!(
                self.writer,
                "[evaluate] dispatch={} task={:?} rejected: {reason}",
                e.dispatch_index, e.task,
            ),
        };
    }

    fn on_cache_sync(&mut self, e: &CacheSyncEvent) {
        let _ = writeln!(
            self.writer,
            "[sync] dispatch={} {} {:?}",
            e.dispatch_index,
            direction_name(e.direction),
            e.buffer,
        );
    }

    fn on_dispatch_begin(&mut self, e: &DispatchBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[begin] dispatch={} {:?} mode={:?} region={}",
            e.dispatch_index,
            e.operation,
            e.mode,
            Region(e.region),
        );
    }

    fn on_dispatch_end(&mut self, e: &DispatchEndEvent) {
        let _ = match e.result {
            Ok(()) => writeln!(
                self.writer,
                "[end] dispatch={} {:?} ok",
                e.dispatch_index, e.operation,
            ),
            Err(err) => writeln!(
                self.writer,
                "[end] dispatch={} {:?} FAILED: {err}",
                e.dispatch_index, e.operation,
            ),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppa_offload_core::buffer::DrawBuffer;
    use ppa_offload_core::error::AccelError;
    use ppa_offload_core::format::OperationKind;
    use ppa_offload_core::plan::RejectReason;
    use ppa_offload_core::task::TaskKind;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_writer()).unwrap()
    }

    #[test]
    fn pretty_print_evaluate() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_evaluate(&EvaluateEvent {
            dispatch_index: 1,
            task: TaskKind::Fill,
            outcome: Ok(OperationKind::FillTarget),
        });
        sink.on_evaluate(&EvaluateEvent {
            dispatch_index: 2,
            task: TaskKind::Fill,
            outcome: Err(RejectReason::RoundedCorners),
        });
        let output = output(sink);
        assert!(output.contains("[evaluate]"), "got: {output}");
        assert!(output.contains("dispatch=1"), "got: {output}");
        assert!(output.contains("accepted=FillTarget"), "got: {output}");
        assert!(output.contains("rejected: rounded corners"), "got: {output}");
    }

    #[test]
    fn pretty_print_sync_and_end() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_cache_sync(&CacheSyncEvent {
            dispatch_index: 0,
            buffer: DrawBuffer::new(0x4000, 64),
            direction: SyncDirection::CacheToMemory,
        });
        sink.on_dispatch_end(&DispatchEndEvent {
            dispatch_index: 0,
            operation: OperationKind::BlendTarget,
            result: Err(AccelError::Timeout),
        });
        let output = output(sink);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2, "got: {output}");
        assert!(lines[0].starts_with("[sync] dispatch=0 c2m"), "got: {output}");
        assert!(lines[1].contains("FAILED"), "got: {output}");
    }
}
