// Copyright 2026 the PPA Offload Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cache synchronization around accelerator dispatches.
//!
//! The accelerator reads and writes pixel memory by DMA while the CPU works
//! through its data cache. Before a dispatch, dirty lines covering every
//! buffer the accelerator will touch must be written back; that is
//! [`sync_before_hardware_access`]. If the CPU later reads an
//! accelerator-written buffer, stale lines must be dropped first; that is
//! [`sync_after_hardware_access`].
//!
//! # Scope
//!
//! These functions are called by the dispatch path, on exactly the buffers of
//! one accelerator operation, and nowhere else. They are never installed as a
//! generic "buffer ready" hook: the software renderer's buffers may live in
//! non-cacheable or sub-line-aligned memory, and the platform primitive
//! aborts on such memory. [`init_buffer_handlers`] is the registration point
//! the display subsystem calls at startup, and it deliberately installs
//! nothing.
//!
//! The platform primitive is injected as a [`CacheMaintenance`]
//! implementation. It is blocking; no asynchronous variant exists, so cache
//! maintenance never overlaps accelerator execution.

use crate::buffer::DrawBuffer;

/// Direction of a cache maintenance operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncDirection {
    /// Write dirty cache lines back to memory (flush).
    CacheToMemory,
    /// Discard cache lines so subsequent reads observe memory (invalidate).
    MemoryToCache,
}

/// Platform data-cache maintenance primitive.
///
/// Implementations cover at least `[region.addr(), region.addr() +
/// region.len())`, rounding outward to cache lines as the platform requires.
/// They may abort on memory they cannot manage; callers prevent that by
/// scoping, not by checking.
pub trait CacheMaintenance {
    /// Synchronizes `region` in `direction`.
    ///
    /// Never called with an empty region.
    fn msync(&mut self, region: DrawBuffer, direction: SyncDirection);
}

impl<T: CacheMaintenance + ?Sized> CacheMaintenance for &mut T {
    #[inline]
    fn msync(&mut self, region: DrawBuffer, direction: SyncDirection) {
        (**self).msync(region, direction);
    }
}

/// Writes back CPU-cached data for `buffer` so the accelerator observes it.
///
/// Call once per dispatch, immediately before handing `buffer` to the
/// accelerator, and only for buffers that dispatch will DMA-access. A null
/// or zero-length descriptor is a no-op.
#[inline]
pub fn sync_before_hardware_access<C: CacheMaintenance + ?Sized>(cache: &mut C, buffer: DrawBuffer) {
    if buffer.is_empty() {
        return;
    }
    cache.msync(buffer, SyncDirection::CacheToMemory);
}

/// Invalidates CPU-cached data for `buffer` after the accelerator wrote it.
///
/// Same scoping and no-op rules as [`sync_before_hardware_access`].
#[inline]
pub fn sync_after_hardware_access<C: CacheMaintenance + ?Sized>(cache: &mut C, buffer: DrawBuffer) {
    if buffer.is_empty() {
        return;
    }
    cache.msync(buffer, SyncDirection::MemoryToCache);
}

/// A generic per-buffer cache hook, called for every draw buffer.
pub type BufferCacheHook = fn(&DrawBuffer);

/// The display subsystem's buffer-lifecycle hook list.
#[derive(Clone, Copy, Debug, Default)]
pub struct BufferHandlers {
    /// Invoked by the subsystem whenever any draw buffer needs invalidation.
    pub invalidate_cache: Option<BufferCacheHook>,
    /// Invoked by the subsystem whenever any draw buffer needs a flush.
    pub flush_cache: Option<BufferCacheHook>,
}

/// Registration point for accelerator buffer hooks.
///
/// Intentionally installs nothing: the hooks in `handlers` fire for every
/// draw buffer, including software-rendered ones, and the accelerator's cache
/// maintenance must not run on those. Synchronization happens in the dispatch
/// path instead.
#[inline]
pub fn init_buffer_handlers(handlers: &mut BufferHandlers) {
    _ = handlers;
}
