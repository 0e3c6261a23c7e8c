// Copyright 2026 the PPA Offload Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw unit configuration.

use crate::error::ConfigError;

/// Smallest draw-buffer alignment that keeps buffers on whole L1 lines.
pub const MIN_BUFFER_ALIGN: usize = 64;

/// Tunables for a [`DrawUnit`](crate::unit::DrawUnit).
///
/// The defaults describe a SoC with a 128-byte L2 cache line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitConfig {
    /// Data cache line size in bytes.
    pub cache_line_size: usize,
    /// Alignment the allocator guarantees for draw buffers, in bytes.
    pub buffer_align: usize,
    /// Tasks whose visible area (in square pixels) is below this are left to
    /// the software renderer; the accelerator's setup cost dominates there.
    pub min_offload_area: f64,
    /// Invalidate the target's cache lines after each dispatch so the CPU can
    /// read the result directly.
    pub invalidate_after_dispatch: bool,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            cache_line_size: 128,
            buffer_align: 128,
            min_offload_area: 100.0,
            invalidate_after_dispatch: false,
        }
    }
}

impl UnitConfig {
    /// Checks that buffers allocated with this alignment can be cache-managed.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::BadCacheLine`] if the line size is zero or not a power
    ///   of two.
    /// - [`ConfigError::AlignmentNotPowerOfTwo`] for a malformed alignment.
    /// - [`ConfigError::AlignmentTooSmall`] if the alignment is below
    ///   [`MIN_BUFFER_ALIGN`] or below the cache line size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cache_line_size.is_power_of_two() {
            return Err(ConfigError::BadCacheLine(self.cache_line_size));
        }
        if !self.buffer_align.is_power_of_two() {
            return Err(ConfigError::AlignmentNotPowerOfTwo(self.buffer_align));
        }
        let required = self.cache_line_size.max(MIN_BUFFER_ALIGN);
        if self.buffer_align < required {
            return Err(ConfigError::AlignmentTooSmall {
                align: self.buffer_align,
                required,
            });
        }
        Ok(())
    }
}
