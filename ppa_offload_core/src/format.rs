// Copyright 2026 the PPA Offload Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color formats, accelerator operation kinds, and the format support matrix.
//!
//! The accelerator's support matrix is asymmetric: each [`OperationKind`]
//! has its own set of accepted [`ColorFormat`]s, curated from the hardware
//! datasheet rather than derived from one another. The sets live in a single
//! immutable [`SupportMatrix`] so they can be audited (and enumerated by
//! tests) in one place.
//!
//! | operation              | Rgb565 | Rgb888 | Argb8888 | Xrgb8888 |
//! |------------------------|:------:|:------:|:--------:|:--------:|
//! | `SourceRead`           |   ✓    |        |    ✓     |    ✓     |
//! | `FillTarget`           |   ✓    |   ✓    |    ✓     |          |
//! | `BlendTarget`          |   ✓    |   ✓    |    ✓     |          |
//! | `ScaleRotateTarget`    |   ✓    |   ✓    |          |    ✓     |
//!
//! Every other format is unsupported for every operation.

use core::fmt;

/// An abstract pixel encoding used by the drawing pipeline.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorFormat {
    /// 16-bit RGB (5-6-5).
    Rgb565,
    /// 24-bit RGB, one byte per channel.
    Rgb888,
    /// 32-bit ARGB with a meaningful alpha channel.
    Argb8888,
    /// 32-bit RGB with an ignored ("don't care") alpha byte.
    Xrgb8888,
    /// 24-bit: RGB565 followed by an 8-bit alpha byte per pixel.
    Argb8565,
    /// RGB565 plane followed by a separate 8-bit alpha plane.
    Rgb565A8,
    /// 8-bit luminance.
    L8,
    /// 8-bit alpha-only mask.
    A8,
    /// 1-bit indexed.
    I1,
}

impl ColorFormat {
    /// Every known format, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Rgb565,
        Self::Rgb888,
        Self::Argb8888,
        Self::Xrgb8888,
        Self::Argb8565,
        Self::Rgb565A8,
        Self::L8,
        Self::A8,
        Self::I1,
    ];

    /// Bits per pixel of the primary plane.
    ///
    /// `Rgb565A8` reports the RGB plane only; its alpha plane follows the
    /// pixel data.
    #[must_use]
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Rgb565 | Self::Rgb565A8 => 16,
            Self::Rgb888 | Self::Argb8565 => 24,
            Self::Argb8888 | Self::Xrgb8888 => 32,
            Self::L8 | Self::A8 => 8,
            Self::I1 => 1,
        }
    }

    /// Minimum number of bytes per row for a surface `width` pixels wide.
    #[must_use]
    pub const fn min_stride(self, width: u32) -> u64 {
        (width as u64 * self.bits_per_pixel() as u64).div_ceil(8)
    }

    /// Returns `true` if the format carries a meaningful alpha channel.
    #[must_use]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Argb8888 | Self::Argb8565 | Self::Rgb565A8 | Self::A8)
    }
}

impl fmt::Debug for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rgb565 => "RGB565",
            Self::Rgb888 => "RGB888",
            Self::Argb8888 => "ARGB8888",
            Self::Xrgb8888 => "XRGB8888",
            Self::Argb8565 => "ARGB8565",
            Self::Rgb565A8 => "RGB565A8",
            Self::L8 => "L8",
            Self::A8 => "A8",
            Self::I1 => "I1",
        };
        f.write_str(name)
    }
}

/// The accelerator operation a format is being considered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    /// Reading a source image (blend foreground/background, SRM input).
    SourceRead,
    /// Destination of a solid fill.
    FillTarget,
    /// Destination of an alpha blend.
    BlendTarget,
    /// Destination of a scale/rotate/mirror (SRM) transfer.
    ScaleRotateTarget,
}

impl OperationKind {
    /// Every operation kind, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::SourceRead,
        Self::FillTarget,
        Self::BlendTarget,
        Self::ScaleRotateTarget,
    ];

    const fn index(self) -> usize {
        match self {
            Self::SourceRead => 0,
            Self::FillTarget => 1,
            Self::BlendTarget => 2,
            Self::ScaleRotateTarget => 3,
        }
    }
}

/// Immutable per-operation format support table.
///
/// Each row lists the formats the hardware accepts for one operation. The
/// rows are independent: XRGB is a legal source and a legal SRM target, but
/// not a legal fill or blend target.
#[derive(Clone, Copy, Debug)]
pub struct SupportMatrix {
    rows: [&'static [ColorFormat]; 4],
}

impl SupportMatrix {
    /// The accelerator's support matrix.
    pub const PPA: Self = Self {
        rows: [
            // SourceRead
            &[ColorFormat::Rgb565, ColorFormat::Argb8888, ColorFormat::Xrgb8888],
            // FillTarget
            &[ColorFormat::Rgb565, ColorFormat::Rgb888, ColorFormat::Argb8888],
            // BlendTarget
            &[ColorFormat::Rgb565, ColorFormat::Rgb888, ColorFormat::Argb8888],
            // ScaleRotateTarget
            &[ColorFormat::Rgb565, ColorFormat::Rgb888, ColorFormat::Xrgb8888],
        ],
    };

    /// Formats supported for `operation`.
    #[must_use]
    pub const fn formats(&self, operation: OperationKind) -> &'static [ColorFormat] {
        self.rows[operation.index()]
    }

    /// Returns `true` if `format` is in the row for `operation`.
    #[must_use]
    pub fn contains(&self, format: ColorFormat, operation: OperationKind) -> bool {
        self.formats(operation).contains(&format)
    }
}

/// Returns `true` if the accelerator can perform `operation` in `format`.
///
/// Pure and reentrant; safe to call from any thread.
#[must_use]
pub fn is_supported(format: ColorFormat, operation: OperationKind) -> bool {
    SupportMatrix::PPA.contains(format, operation)
}

#[cfg(test)]
mod tests {
    use super::*;

    use ColorFormat::*;
    use OperationKind::*;

    #[test]
    fn support_table_matches_hardware() {
        #[rustfmt::skip]
        let expected: [(ColorFormat, [bool; 4]); 9] = [
            //           Source Fill   Blend  SRM
            (Rgb565,   [true,  true,  true,  true ]),
            (Rgb888,   [false, true,  true,  true ]),
            (Argb8888, [true,  true,  true,  false]),
            (Xrgb8888, [true,  false, false, true ]),
            (Argb8565, [false, false, false, false]),
            (Rgb565A8, [false, false, false, false]),
            (L8,       [false, false, false, false]),
            (A8,       [false, false, false, false]),
            (I1,       [false, false, false, false]),
        ];
        for (format, row) in expected {
            for (operation, want) in OperationKind::ALL.into_iter().zip(row) {
                assert_eq!(
                    is_supported(format, operation),
                    want,
                    "{format:?} for {operation:?}"
                );
            }
        }
    }

    #[test]
    fn xrgb_is_never_a_fill_or_blend_target() {
        assert!(!is_supported(Xrgb8888, FillTarget));
        assert!(!is_supported(Xrgb8888, BlendTarget));
        assert!(is_supported(Xrgb8888, ScaleRotateTarget));
        assert!(is_supported(Xrgb8888, SourceRead));
    }

    #[test]
    fn queries_are_repeatable() {
        for format in ColorFormat::ALL {
            for operation in OperationKind::ALL {
                let first = is_supported(format, operation);
                assert_eq!(is_supported(format, operation), first, "stable answer");
            }
        }
    }

    #[test]
    fn stride_rounds_up_to_whole_bytes() {
        assert_eq!(Rgb565.min_stride(10), 20);
        assert_eq!(Rgb888.min_stride(10), 30);
        assert_eq!(Xrgb8888.min_stride(10), 40);
        assert_eq!(I1.min_stride(10), 2);
    }

    #[test]
    fn stride_of_very_wide_rows_does_not_overflow() {
        assert_eq!(Argb8888.min_stride(u32::MAX), u64::from(u32::MAX) * 4);
    }

    #[test]
    fn debug_uses_conventional_names() {
        let format = Xrgb8888;
        assert_eq!(alloc::format!("{format:?}"), "XRGB8888");
    }
}
