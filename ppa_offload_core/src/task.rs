// Copyright 2026 the PPA Offload Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw tasks offered to the accelerator draw unit.
//!
//! Task areas and clip rectangles are [`kurbo::Rect`]s in target pixel
//! coordinates with integral edges. They are converted to [`PixelRect`]s once
//! clipping is resolved.

use kurbo::Rect;

use crate::buffer::Surface;

/// Fully opaque.
pub const OPA_COVER: u8 = 255;

/// At or below this opacity nothing visible is drawn.
pub const OPA_MIN: u8 = 2;

/// Scale factor meaning 1.0 (8.8 fixed point).
pub const SCALE_NONE: u32 = 256;

/// An opaque RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color32 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Color32 {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs the color with `alpha` as `0xAARRGGBB`.
    #[must_use]
    pub const fn to_argb(self, alpha: u8) -> u32 {
        (alpha as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// Solid rectangle fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillTask {
    /// Area to fill.
    pub area: Rect,
    /// Fill color.
    pub color: Color32,
    /// Opacity, `0..=255`.
    pub opacity: u8,
    /// Corner radius in pixels; the accelerator only fills sharp corners.
    pub radius: u32,
    /// Whether the fill uses a gradient instead of `color`.
    pub gradient: bool,
}

impl FillTask {
    /// An opaque, square-cornered fill.
    #[must_use]
    pub const fn solid(area: Rect, color: Color32) -> Self {
        Self {
            area,
            color,
            opacity: OPA_COVER,
            radius: 0,
            gradient: false,
        }
    }
}

/// Image draw, optionally scaled and rotated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageTask {
    /// Destination area of the (transformed) image.
    pub area: Rect,
    /// Source pixels.
    pub source: Surface,
    /// Opacity, `0..=255`.
    pub opacity: u8,
    /// Horizontal scale, [`SCALE_NONE`] is 1.0.
    pub scale_x: u32,
    /// Vertical scale, [`SCALE_NONE`] is 1.0.
    pub scale_y: u32,
    /// Clockwise rotation in tenths of a degree.
    pub rotation: i32,
    /// Recolor opacity; non-zero tints the image.
    pub recolor_opacity: u8,
}

impl ImageTask {
    /// An opaque, untransformed blit of `source` with its top-left corner at
    /// `(x, y)`.
    #[must_use]
    pub fn blit(source: Surface, x: f64, y: f64) -> Self {
        Self {
            area: Rect::new(
                x,
                y,
                x + f64::from(source.width),
                y + f64::from(source.height),
            ),
            source,
            opacity: OPA_COVER,
            scale_x: SCALE_NONE,
            scale_y: SCALE_NONE,
            rotation: 0,
            recolor_opacity: 0,
        }
    }

    /// Returns `true` if the image is scaled or rotated.
    #[must_use]
    pub const fn is_transformed(&self) -> bool {
        self.scale_x != SCALE_NONE || self.scale_y != SCALE_NONE || self.rotation != 0
    }
}

/// A unit of drawing work.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawTask {
    /// Solid fill.
    Fill(FillTask),
    /// Image draw.
    Image(ImageTask),
    /// Anything the accelerator has no operation for (text, lines, arcs).
    Other,
}

impl DrawTask {
    /// The task's category.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::Fill(_) => TaskKind::Fill,
            Self::Image(_) => TaskKind::Image,
            Self::Other => TaskKind::Other,
        }
    }
}

/// Category of a [`DrawTask`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// [`DrawTask::Fill`].
    Fill,
    /// [`DrawTask::Image`].
    Image,
    /// [`DrawTask::Other`].
    Other,
}

/// An integer pixel rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl PixelRect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Converts `rect` to pixels, rounding edges to the nearest integer.
    ///
    /// Returns `None` for empty rectangles and for rectangles reaching into
    /// negative coordinates.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "edges are rounded and range-checked before the cast"
    )]
    pub fn from_rect(rect: Rect) -> Option<Self> {
        let r = rect.abs().round();
        let max = f64::from(u32::MAX);
        if r.x0 < 0.0 || r.y0 < 0.0 || r.x1 > max || r.y1 > max || r.is_zero_area() {
            return None;
        }
        Some(Self {
            x: r.x0 as u32,
            y: r.y0 as u32,
            width: (r.x1 - r.x0) as u32,
            height: (r.y1 - r.y0) as u32,
        })
    }

    /// Number of pixels covered.
    #[must_use]
    pub const fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// The rectangle as a [`kurbo::Rect`].
    #[must_use]
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.width),
            f64::from(self.y) + f64::from(self.height),
        )
    }
}
