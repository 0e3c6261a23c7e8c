// Copyright 2026 the PPA Offload Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offloading 2D draw operations to a DMA-driven pixel accelerator.
//!
//! `ppa_offload_core` decides which draw tasks a hardware 2D accelerator
//! (fill, blend, scale/rotate/mirror) can take over from a GUI toolkit's
//! software renderer, translates pixel formats into the accelerator's modes,
//! and keeps the CPU's cached view of pixel memory coherent with the
//! accelerator's DMA view. It is `no_std` compatible without an allocator
//! and never allocates pixel memory itself.
//!
//! # Architecture
//!
//! ```text
//!   dispatcher (external)
//!       │ DrawTask + target Surface + clip
//!       ▼
//!   DrawUnit::evaluate() ──► format::is_supported ──► mode::try_to_hardware_mode
//!       │                                                     │
//!       │ Reject ──► software renderer (external)             │
//!       ▼                                                     ▼
//!   DrawUnit::dispatch() ──► coherency::sync_before_hardware_access (per buffer)
//!                                      │
//!                                      ▼
//!                          Accelerator::{fill, blend, srm} (external)
//! ```
//!
//! **[`format`]** — [`ColorFormat`](format::ColorFormat),
//! [`OperationKind`](format::OperationKind), and the per-operation support
//! matrix.
//!
//! **[`mode`]** — Format to accelerator-mode translation, lenient and strict.
//!
//! **[`coherency`]** — The cache synchronization boundary and the
//! [`CacheMaintenance`](coherency::CacheMaintenance) platform seam.
//!
//! **[`buffer`]** — Buffer and surface descriptors.
//!
//! **[`task`]** / **[`plan`]** — Draw tasks and the accept/reject decision
//! that turns them into accelerator operations.
//!
//! **[`unit`]** — The [`DrawUnit`](unit::DrawUnit) and the
//! [`Accelerator`](unit::Accelerator) driver seam.
//!
//! **[`config`]** / **[`error`]** — Configuration and error types.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! dispatch instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[cfg(test)]
extern crate alloc;

pub mod buffer;
pub mod coherency;
pub mod config;
pub mod error;
pub mod format;
pub mod mode;
pub mod plan;
pub mod task;
pub mod trace;
pub mod unit;
