// Copyright 2026 the PPA Offload Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translation from abstract [`ColorFormat`]s to accelerator modes.
//!
//! Two entry points exist:
//!
//! - [`to_hardware_mode`] never fails. Any pair missing from the translation
//!   table maps to the RGB565 mode for that operation.
//! - [`try_to_hardware_mode`] is the strict variant: it agrees with
//!   [`to_hardware_mode`] on every supported pair and returns
//!   [`UnsupportedFormat`] for the rest.
//!
//! # Pitfall
//!
//! The lenient translation is only correct behind an
//! [`is_supported`](crate::format::is_supported) check. Skipping that check
//! silently programs the accelerator with the RGB565 mode for a buffer laid
//! out in some other format, which corrupts the output without any error.
//! New call sites should prefer [`try_to_hardware_mode`].
//!
//! # Aliasing
//!
//! The accelerator has no XRGB scale/rotate mode. XRGB is accepted as an SRM
//! target and translated onto the ARGB8888 mode; the alpha byte is written
//! but meaningless. Source reads of XRGB use the same aliasing.
//!
//! ARGB8888 itself has a translation entry for SRM (the mode exists) but is
//! not in the SRM support set, so [`try_to_hardware_mode`] rejects it.

use core::fmt;

use crate::error::UnsupportedFormat;
use crate::format::{ColorFormat, OperationKind, is_supported};

/// Pixel layout as programmed into an accelerator color-mode field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// 32-bit ARGB.
    Argb8888,
    /// 24-bit RGB.
    Rgb888,
    /// 16-bit RGB.
    Rgb565,
}

impl PixelLayout {
    /// Register encoding of this layout.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Argb8888 => 0,
            Self::Rgb888 => 1,
            Self::Rgb565 => 2,
        }
    }

    /// Bytes per pixel for this layout.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::Argb8888 => 4,
            Self::Rgb888 => 3,
            Self::Rgb565 => 2,
        }
    }
}

/// An accelerator mode value for a specific operation.
///
/// Only produced by translation; there is no public constructor.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HardwareMode {
    operation: OperationKind,
    layout: PixelLayout,
}

impl HardwareMode {
    /// The operation this mode was translated for.
    #[inline]
    #[must_use]
    pub const fn operation(self) -> OperationKind {
        self.operation
    }

    /// The pixel layout to program.
    #[inline]
    #[must_use]
    pub const fn layout(self) -> PixelLayout {
        self.layout
    }

    /// Raw register value for the operation's color-mode field.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.layout.code()
    }
}

impl fmt::Debug for HardwareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HardwareMode({:?}:{:?})", self.operation, self.layout)
    }
}

/// The layout used when a pair has no entry in the translation table.
const DEFAULT_LAYOUT: PixelLayout = PixelLayout::Rgb565;

/// Exact translation table lookup. `None` means "no entry".
const fn lookup(format: ColorFormat, operation: OperationKind) -> Option<PixelLayout> {
    use ColorFormat as F;
    use OperationKind as Op;
    use PixelLayout as L;

    match (operation, format) {
        (Op::SourceRead, F::Rgb565) => Some(L::Rgb565),
        (Op::SourceRead, F::Argb8888 | F::Xrgb8888) => Some(L::Argb8888),

        (Op::FillTarget | Op::BlendTarget, F::Rgb565) => Some(L::Rgb565),
        (Op::FillTarget | Op::BlendTarget, F::Rgb888) => Some(L::Rgb888),
        (Op::FillTarget | Op::BlendTarget, F::Argb8888) => Some(L::Argb8888),

        (Op::ScaleRotateTarget, F::Rgb565) => Some(L::Rgb565),
        (Op::ScaleRotateTarget, F::Rgb888) => Some(L::Rgb888),
        (Op::ScaleRotateTarget, F::Argb8888 | F::Xrgb8888) => Some(L::Argb8888),

        _ => None,
    }
}

/// Translates `format` into the accelerator mode for `operation`.
///
/// Total and deterministic: pairs with no table entry yield the RGB565 mode.
/// Callers must gate this behind [`is_supported`]; see the module docs.
#[must_use]
pub const fn to_hardware_mode(format: ColorFormat, operation: OperationKind) -> HardwareMode {
    let layout = match lookup(format, operation) {
        Some(layout) => layout,
        None => DEFAULT_LAYOUT,
    };
    HardwareMode { operation, layout }
}

/// Strict translation: errors for any pair the accelerator does not support.
///
/// # Errors
///
/// Returns [`UnsupportedFormat`] if `format` is not supported for
/// `operation`.
pub fn try_to_hardware_mode(
    format: ColorFormat,
    operation: OperationKind,
) -> Result<HardwareMode, UnsupportedFormat> {
    if !is_supported(format, operation) {
        return Err(UnsupportedFormat { format, operation });
    }
    Ok(to_hardware_mode(format, operation))
}
