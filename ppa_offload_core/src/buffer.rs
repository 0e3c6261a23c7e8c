// Copyright 2026 the PPA Offload Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw buffer descriptors.
//!
//! A [`DrawBuffer`] only *describes* memory: a base address and a byte
//! length. The draw-unit dispatcher owns the memory; this crate reads the
//! descriptor for the duration of one call and never keeps it.
//!
//! Cacheability and alignment are not tracked here. Whoever hands a buffer
//! to the [coherency boundary](crate::coherency) guarantees that the region
//! is cacheable and aligned the way the platform primitive expects.

use core::fmt;

use crate::format::ColorFormat;

/// Base address and byte length of a region of pixel memory.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawBuffer {
    addr: usize,
    len: usize,
}

impl DrawBuffer {
    /// A descriptor with a null address and no length.
    pub const EMPTY: Self = Self { addr: 0, len: 0 };

    /// Describes `len` bytes starting at `addr`.
    #[inline]
    #[must_use]
    pub const fn new(addr: usize, len: usize) -> Self {
        Self { addr, len }
    }

    /// Describes the memory backing `bytes`.
    #[inline]
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            addr: bytes.as_ptr() as usize,
            len: bytes.len(),
        }
    }

    /// Base address.
    #[inline]
    #[must_use]
    pub const fn addr(self) -> usize {
        self.addr
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.len
    }

    /// Returns `true` if the base address is null.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.addr == 0
    }

    /// Returns `true` if the descriptor covers no memory: either the address
    /// is null or the length is zero.
    ///
    /// Empty descriptors are normal for transient or not-yet-allocated
    /// buffers.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.addr == 0 || self.len == 0
    }

    /// One past the last byte, or `None` if the region wraps the address
    /// space.
    #[inline]
    #[must_use]
    pub const fn end(self) -> Option<usize> {
        self.addr.checked_add(self.len)
    }

    /// Returns `true` if the base address is a multiple of `align`.
    ///
    /// Always `false` when `align` is not a power of two.
    #[inline]
    #[must_use]
    pub const fn is_aligned_to(self, align: usize) -> bool {
        align.is_power_of_two() && self.addr & (align - 1) == 0
    }
}

impl fmt::Debug for DrawBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DrawBuffer({:#x}+{})", self.addr, self.len)
    }
}

/// A draw buffer interpreted as a 2D image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Surface {
    /// Backing memory.
    pub buffer: DrawBuffer,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bytes per row.
    pub stride: u32,
    /// Pixel encoding.
    pub format: ColorFormat,
}

impl Surface {
    /// Creates a surface with the tightest stride for `format`.
    ///
    /// A row too wide for a `u32` stride saturates, which leaves the surface
    /// not [well formed](Self::is_well_formed).
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "stride saturates at u32::MAX before the cast"
    )]
    pub const fn packed(buffer: DrawBuffer, width: u32, height: u32, format: ColorFormat) -> Self {
        let stride = format.min_stride(width);
        Self {
            buffer,
            width,
            height,
            stride: if stride > u32::MAX as u64 { u32::MAX } else { stride as u32 },
            format,
        }
    }

    /// Bytes the pixel data occupies: `stride * height`.
    #[must_use]
    pub const fn data_len(&self) -> u64 {
        self.stride as u64 * self.height as u64
    }

    /// Returns `true` if the stride fits a row and the buffer holds every row.
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        self.stride as u64 >= self.format.min_stride(self.width)
            && self.buffer.len() as u64 >= self.data_len()
    }
}
