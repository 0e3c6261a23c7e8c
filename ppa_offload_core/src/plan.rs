// Copyright 2026 the PPA Offload Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offload planning: deciding whether a task runs on the accelerator.
//!
//! [`evaluate`] is the accept/reject decision the dispatcher asks for before
//! choosing between the accelerator and the software renderer. An accepted
//! task comes back as a fully described [`AccelOp`], with every operand's
//! format already translated, so dispatch only has to synchronize caches and
//! hand the operation to the driver.
//!
//! # Operation selection
//!
//! | task                                         | operation | target row          |
//! |----------------------------------------------|-----------|---------------------|
//! | fill, opaque                                 | fill      | `FillTarget`        |
//! | fill, translucent                            | blend     | `BlendTarget`       |
//! | image, scaled or rotated                     | SRM       | `ScaleRotateTarget` |
//! | image, opaque source and opacity, SRM target | SRM       | `ScaleRotateTarget` |
//! | image, anything else                         | blend     | `BlendTarget`       |
//!
//! Image sources are always checked against `SourceRead`.

use core::fmt;

use kurbo::Rect;

use crate::buffer::Surface;
use crate::config::UnitConfig;
use crate::error::UnsupportedFormat;
use crate::format::{ColorFormat, OperationKind, is_supported};
use crate::mode::{HardwareMode, try_to_hardware_mode};
use crate::task::{Color32, DrawTask, FillTask, ImageTask, OPA_COVER, OPA_MIN, PixelRect, SCALE_NONE};

/// Why a task is left to the software renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The accelerator has no operation for this kind of task.
    NotAccelerated,
    /// Nothing of the task is visible after clipping.
    EmptyArea,
    /// The visible area is below the configured offload threshold.
    AreaTooSmall,
    /// The task is fully transparent.
    Transparent,
    /// Rounded corners need per-pixel coverage.
    RoundedCorners,
    /// Gradients are not a solid color.
    Gradient,
    /// Recoloring is not an accelerator operation.
    Recolor,
    /// Rotation is not a multiple of 90 degrees.
    UnsupportedRotation,
    /// A scale factor is zero.
    InvalidScale,
    /// A scaled or rotated image would need blending or clipping as well.
    TransformNeedsComposite,
    /// The scaled and rotated source does not exactly cover the task area.
    TransformSizeMismatch,
    /// The visible part of the image lies outside the source surface.
    SourceOutOfBounds,
    /// A surface's stride or length does not describe its pixels.
    MalformedSurface,
    /// A buffer's base address is not on the configured alignment.
    Misaligned,
    /// An operand's format is not supported for its role.
    Format(UnsupportedFormat),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAccelerated => f.write_str("no accelerator operation for this task"),
            Self::EmptyArea => f.write_str("nothing visible after clipping"),
            Self::AreaTooSmall => f.write_str("area below offload threshold"),
            Self::Transparent => f.write_str("fully transparent"),
            Self::RoundedCorners => f.write_str("rounded corners"),
            Self::Gradient => f.write_str("gradient fill"),
            Self::Recolor => f.write_str("image recolor"),
            Self::UnsupportedRotation => f.write_str("rotation not a multiple of 90 degrees"),
            Self::InvalidScale => f.write_str("zero scale factor"),
            Self::TransformNeedsComposite => {
                f.write_str("transformed image needs blending or clipping")
            }
            Self::TransformSizeMismatch => {
                f.write_str("transformed image size does not match its area")
            }
            Self::SourceOutOfBounds => f.write_str("visible area outside source image"),
            Self::MalformedSurface => f.write_str("malformed surface"),
            Self::Misaligned => f.write_str("buffer not aligned for cache maintenance"),
            Self::Format(err) => write!(f, "{err}"),
        }
    }
}

impl From<UnsupportedFormat> for RejectReason {
    fn from(err: UnsupportedFormat) -> Self {
        Self::Format(err)
    }
}

/// Clockwise SRM rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// No rotation.
    #[default]
    Deg0,
    /// 90 degrees.
    Deg90,
    /// 180 degrees.
    Deg180,
    /// 270 degrees.
    Deg270,
}

impl Rotation {
    /// Converts tenths of a degree; `None` unless a multiple of 90 degrees.
    #[must_use]
    pub const fn from_decidegrees(angle: i32) -> Option<Self> {
        match angle.rem_euclid(3600) {
            0 => Some(Self::Deg0),
            900 => Some(Self::Deg90),
            1800 => Some(Self::Deg180),
            2700 => Some(Self::Deg270),
            _ => None,
        }
    }
}

/// A solid fill for the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillOp {
    /// Surface written.
    pub target: Surface,
    /// `FillTarget` mode of `target`.
    pub target_mode: HardwareMode,
    /// Region of `target` to fill.
    pub region: PixelRect,
    /// Fill color.
    pub color: Color32,
}

/// How a blend foreground's per-pixel alpha combines with the global opacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ForegroundAlpha {
    /// Per-pixel alpha, multiplied by the global opacity.
    Scaled,
    /// The global opacity for every pixel. Any stored alpha byte is ignored.
    Fixed,
}

impl ForegroundAlpha {
    /// The alpha handling for a foreground stored as `format`.
    ///
    /// Formats without a meaningful alpha channel use [`Self::Fixed`]; for
    /// XRGB8888 the byte read in the alpha position is garbage.
    #[must_use]
    pub const fn for_format(format: ColorFormat) -> Self {
        if format.has_alpha() {
            Self::Scaled
        } else {
            Self::Fixed
        }
    }
}

/// Foreground of a [`BlendOp`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendSource {
    /// A constant color.
    Color(Color32),
    /// A block of an image, the same size as the blend region.
    Image {
        /// Surface read.
        surface: Surface,
        /// `SourceRead` mode of `surface`.
        mode: HardwareMode,
        /// How the surface's alpha byte is used.
        alpha: ForegroundAlpha,
        /// Top-left of the block within `surface`.
        x: u32,
        /// Top-left of the block within `surface`.
        y: u32,
    },
}

/// A foreground-over-target alpha blend for the driver.
///
/// The target is both the background input and the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendOp {
    /// Surface read as background and written.
    pub target: Surface,
    /// `BlendTarget` mode of `target`.
    pub target_mode: HardwareMode,
    /// Region of `target` blended.
    pub region: PixelRect,
    /// What is blended on top.
    pub foreground: BlendSource,
    /// Global foreground opacity.
    pub opacity: u8,
}

/// A scale/rotate/mirror transfer for the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SrmOp {
    /// Surface read.
    pub source: Surface,
    /// `SourceRead` mode of `source`.
    pub source_mode: HardwareMode,
    /// Block of `source` transferred.
    pub source_block: PixelRect,
    /// Surface written.
    pub target: Surface,
    /// `ScaleRotateTarget` mode of `target`.
    pub target_mode: HardwareMode,
    /// Top-left of the output within `target`.
    pub x: u32,
    /// Top-left of the output within `target`.
    pub y: u32,
    /// Horizontal scale (8.8 fixed point).
    pub scale_x: u32,
    /// Vertical scale (8.8 fixed point).
    pub scale_y: u32,
    /// Rotation.
    pub rotation: Rotation,
}

impl SrmOp {
    /// Size of the written block: the source block scaled along its own
    /// axes, then rotated.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "output size is bounded by the target surface in practice; saturates otherwise"
    )]
    pub const fn output_size(&self) -> (u32, u32) {
        let w = self.source_block.width as u64 * self.scale_x as u64 / SCALE_NONE as u64;
        let h = self.source_block.height as u64 * self.scale_y as u64 / SCALE_NONE as u64;
        let w = if w > u32::MAX as u64 { u32::MAX } else { w as u32 };
        let h = if h > u32::MAX as u64 { u32::MAX } else { h as u32 };
        match self.rotation {
            Rotation::Deg0 | Rotation::Deg180 => (w, h),
            Rotation::Deg90 | Rotation::Deg270 => (h, w),
        }
    }
}

/// An accelerator operation, ready to dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccelOp {
    /// Solid fill.
    Fill(FillOp),
    /// Alpha blend.
    Blend(BlendOp),
    /// Scale/rotate/mirror.
    Srm(SrmOp),
}

impl AccelOp {
    /// The target row this operation was checked against.
    #[must_use]
    pub const fn operation(&self) -> OperationKind {
        match self {
            Self::Fill(_) => OperationKind::FillTarget,
            Self::Blend(_) => OperationKind::BlendTarget,
            Self::Srm(_) => OperationKind::ScaleRotateTarget,
        }
    }

    /// The translated mode of the target.
    #[must_use]
    pub const fn target_mode(&self) -> HardwareMode {
        match self {
            Self::Fill(op) => op.target_mode,
            Self::Blend(op) => op.target_mode,
            Self::Srm(op) => op.target_mode,
        }
    }

    /// The surface the operation writes.
    #[must_use]
    pub const fn target(&self) -> &Surface {
        match self {
            Self::Fill(op) => &op.target,
            Self::Blend(op) => &op.target,
            Self::Srm(op) => &op.target,
        }
    }

    /// The surface the operation reads besides its target, if any.
    #[must_use]
    pub const fn source(&self) -> Option<&Surface> {
        match self {
            Self::Fill(_) => None,
            Self::Blend(BlendOp {
                foreground: BlendSource::Image { surface, .. },
                ..
            }) => Some(surface),
            Self::Blend(_) => None,
            Self::Srm(op) => Some(&op.source),
        }
    }

    /// Region of the target written.
    #[must_use]
    pub const fn region(&self) -> PixelRect {
        match self {
            Self::Fill(op) => op.region,
            Self::Blend(op) => op.region,
            Self::Srm(op) => {
                let (width, height) = op.output_size();
                PixelRect::new(op.x, op.y, width, height)
            }
        }
    }
}

/// Outcome of [`evaluate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Evaluation {
    /// Run on the accelerator.
    Accept(AccelOp),
    /// Render in software.
    Reject(RejectReason),
}

impl Evaluation {
    /// Returns `true` for [`Evaluation::Accept`].
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accept(_))
    }

    /// Converts into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the [`RejectReason`] of a rejected task.
    pub const fn into_result(self) -> Result<AccelOp, RejectReason> {
        match self {
            Self::Accept(op) => Ok(op),
            Self::Reject(reason) => Err(reason),
        }
    }
}

/// Decides whether `task`, drawn into `target` through `clip`, can run on
/// the accelerator, and if so describes the operation.
#[must_use]
pub fn evaluate(task: &DrawTask, target: &Surface, clip: Rect, config: &UnitConfig) -> Evaluation {
    let planned = match task {
        DrawTask::Fill(fill) => plan_fill(fill, target, clip, config),
        DrawTask::Image(image) => plan_image(image, target, clip, config),
        DrawTask::Other => Err(RejectReason::NotAccelerated),
    };
    match planned {
        Ok(op) => Evaluation::Accept(op),
        Err(reason) => Evaluation::Reject(reason),
    }
}

fn mode_for(format: ColorFormat, operation: OperationKind) -> Result<HardwareMode, RejectReason> {
    try_to_hardware_mode(format, operation).map_err(RejectReason::from)
}

/// Intersects `area` with `clip` and the target bounds, applying the area
/// threshold.
fn visible_region(
    area: Rect,
    target: &Surface,
    clip: Rect,
    config: &UnitConfig,
) -> Result<PixelRect, RejectReason> {
    let bounds = Rect::new(0.0, 0.0, f64::from(target.width), f64::from(target.height));
    let visible = area.abs().intersect(clip.abs()).intersect(bounds);
    if visible.is_zero_area() {
        return Err(RejectReason::EmptyArea);
    }
    if visible.area() < config.min_offload_area {
        return Err(RejectReason::AreaTooSmall);
    }
    PixelRect::from_rect(visible).ok_or(RejectReason::EmptyArea)
}

fn plan_fill(
    fill: &FillTask,
    target: &Surface,
    clip: Rect,
    config: &UnitConfig,
) -> Result<AccelOp, RejectReason> {
    if fill.opacity <= OPA_MIN {
        return Err(RejectReason::Transparent);
    }
    if fill.radius > 0 {
        return Err(RejectReason::RoundedCorners);
    }
    if fill.gradient {
        return Err(RejectReason::Gradient);
    }
    if !target.is_well_formed() {
        return Err(RejectReason::MalformedSurface);
    }
    if !target.buffer.is_aligned_to(config.buffer_align) {
        return Err(RejectReason::Misaligned);
    }

    if fill.opacity >= OPA_COVER {
        let target_mode = mode_for(target.format, OperationKind::FillTarget)?;
        let region = visible_region(fill.area, target, clip, config)?;
        Ok(AccelOp::Fill(FillOp {
            target: *target,
            target_mode,
            region,
            color: fill.color,
        }))
    } else {
        let target_mode = mode_for(target.format, OperationKind::BlendTarget)?;
        let region = visible_region(fill.area, target, clip, config)?;
        Ok(AccelOp::Blend(BlendOp {
            target: *target,
            target_mode,
            region,
            foreground: BlendSource::Color(fill.color),
            opacity: fill.opacity,
        }))
    }
}

fn plan_image(
    image: &ImageTask,
    target: &Surface,
    clip: Rect,
    config: &UnitConfig,
) -> Result<AccelOp, RejectReason> {
    if image.opacity <= OPA_MIN {
        return Err(RejectReason::Transparent);
    }
    if image.recolor_opacity > OPA_MIN {
        return Err(RejectReason::Recolor);
    }
    let rotation =
        Rotation::from_decidegrees(image.rotation).ok_or(RejectReason::UnsupportedRotation)?;
    if image.scale_x == 0 || image.scale_y == 0 {
        return Err(RejectReason::InvalidScale);
    }
    if !target.is_well_formed() || !image.source.is_well_formed() {
        return Err(RejectReason::MalformedSurface);
    }
    if !target.buffer.is_aligned_to(config.buffer_align)
        || !image.source.buffer.is_aligned_to(config.buffer_align)
    {
        return Err(RejectReason::Misaligned);
    }
    let source_mode = mode_for(image.source.format, OperationKind::SourceRead)?;
    let region = visible_region(image.area, target, clip, config)?;

    if image.is_transformed() {
        let unclipped = PixelRect::from_rect(image.area);
        let opaque = image.opacity >= OPA_COVER && !image.source.format.has_alpha();
        if unclipped != Some(region) || !opaque {
            return Err(RejectReason::TransformNeedsComposite);
        }
        let target_mode = mode_for(target.format, OperationKind::ScaleRotateTarget)?;
        let op = SrmOp {
            source: image.source,
            source_mode,
            source_block: PixelRect::new(0, 0, image.source.width, image.source.height),
            target: *target,
            target_mode,
            x: region.x,
            y: region.y,
            scale_x: image.scale_x,
            scale_y: image.scale_y,
            rotation,
        };
        // `region` lies inside the target, so a matching output does too.
        if op.output_size() != (region.width, region.height) {
            return Err(RejectReason::TransformSizeMismatch);
        }
        return Ok(AccelOp::Srm(op));
    }

    let block = source_block(image, region)?;
    let plain_copy = image.opacity >= OPA_COVER
        && !image.source.format.has_alpha()
        && is_supported(target.format, OperationKind::ScaleRotateTarget);
    if plain_copy {
        let target_mode = mode_for(target.format, OperationKind::ScaleRotateTarget)?;
        return Ok(AccelOp::Srm(SrmOp {
            source: image.source,
            source_mode,
            source_block: block,
            target: *target,
            target_mode,
            x: region.x,
            y: region.y,
            scale_x: SCALE_NONE,
            scale_y: SCALE_NONE,
            rotation: Rotation::Deg0,
        }));
    }

    let target_mode = mode_for(target.format, OperationKind::BlendTarget)?;
    Ok(AccelOp::Blend(BlendOp {
        target: *target,
        target_mode,
        region,
        foreground: BlendSource::Image {
            surface: image.source,
            mode: source_mode,
            alpha: ForegroundAlpha::for_format(image.source.format),
            x: block.x,
            y: block.y,
        },
        opacity: image.opacity,
    }))
}

/// The block of an untransformed image's source that lands on `region`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "offsets are rounded and bounds-checked against the source size"
)]
fn source_block(image: &ImageTask, region: PixelRect) -> Result<PixelRect, RejectReason> {
    let origin = image.area.abs().origin();
    let dx = (f64::from(region.x) - origin.x).round();
    let dy = (f64::from(region.y) - origin.y).round();
    if dx < 0.0 || dy < 0.0 {
        return Err(RejectReason::SourceOutOfBounds);
    }
    let (x, y) = (dx as u64, dy as u64);
    let fits_x = x + u64::from(region.width) <= u64::from(image.source.width);
    let fits_y = y + u64::from(region.height) <= u64::from(image.source.height);
    if !fits_x || !fits_y {
        return Err(RejectReason::SourceOutOfBounds);
    }
    Ok(PixelRect::new(x as u32, y as u32, region.width, region.height))
}
