// Copyright 2026 the PPA Offload Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads events recorded by a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! The core carries no clock, so each event's `ts` is its position in the
//! recording. Durations in the viewer are therefore event counts, not time.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use ppa_offload_core::coherency::SyncDirection;

use crate::recorder::RecordedEvent;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Each dispatch becomes a `B`/`E` pair named after its operation; evaluation
/// and cache maintenance become instant events.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::with_capacity(events.len());

    for (ts, recorded) in events.iter().enumerate() {
        match recorded {
            RecordedEvent::Evaluate(e) => {
                let (accepted, detail) = match e.outcome {
                    Ok(operation) => (true, format!("{operation:?}")),
                    Err(reason) => (false, reason.to_string()),
                };
                out.push(json!({
                    "ph": "i",
                    "name": "Evaluate",
                    "cat": "Planner",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "dispatch_index": e.dispatch_index,
                        "task": format!("{:?}", e.task),
                        "accepted": accepted,
                        "detail": detail,
                    }
                }));
            }
            RecordedEvent::CacheSync(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": match e.direction {
                        SyncDirection::CacheToMemory => "Flush",
                        SyncDirection::MemoryToCache => "Invalidate",
                    },
                    "cat": "Cache",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "dispatch_index": e.dispatch_index,
                        "addr": format!("{:#x}", e.buffer.addr()),
                        "len": e.buffer.len(),
                    }
                }));
            }
            RecordedEvent::DispatchBegin(e) => {
                out.push(json!({
                    "ph": "B",
                    "name": format!("{:?}", e.operation),
                    "cat": "Accelerator",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "dispatch_index": e.dispatch_index,
                        "mode": e.mode.raw(),
                        "layout": format!("{:?}", e.mode.layout()),
                        "region": [e.region.x, e.region.y, e.region.width, e.region.height],
                    }
                }));
            }
            RecordedEvent::DispatchEnd(e) => {
                out.push(json!({
                    "ph": "E",
                    "name": format!("{:?}", e.operation),
                    "cat": "Accelerator",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "dispatch_index": e.dispatch_index,
                        "error": e.result.err().as_ref().map(ToString::to_string),
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &out)?;
    Ok(())
}
