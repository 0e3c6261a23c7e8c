// Copyright 2026 the PPA Offload Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The accelerator draw unit.
//!
//! A [`DrawUnit`] is what the toolkit's draw-unit dispatcher talks to. The
//! dispatcher asks [`DrawUnit::evaluate`] whether a task can run on the
//! accelerator, renders rejected tasks in software, and hands accepted ones
//! to [`DrawUnit::dispatch`].
//!
//! # Dispatch sequence
//!
//! ```text
//!   evaluate ──► flush source (if read by DMA) ──► flush target
//!       │                                              │
//!       ▼                                              ▼
//!   Reject ──► software                     Accelerator::{fill,blend,srm}
//!                                                      │
//!                                                      ▼
//!                                     invalidate target (if configured)
//! ```
//!
//! Cache maintenance covers exactly the surfaces the operation touches, and
//! happens here rather than in any buffer-lifecycle hook; see
//! [`coherency`](crate::coherency).
//!
//! The driver and its client handles are the caller's [`Accelerator`]
//! implementation. The unit passes operations to it and never looks inside.

use kurbo::Rect;

use crate::buffer::{DrawBuffer, Surface};
use crate::coherency::{
    CacheMaintenance, SyncDirection, sync_after_hardware_access, sync_before_hardware_access,
};
use crate::config::UnitConfig;
use crate::error::{AccelError, ConfigError, DispatchError};
use crate::format::OperationKind;
use crate::mode::HardwareMode;
use crate::plan::{AccelOp, BlendOp, Evaluation, FillOp, SrmOp, evaluate};
use crate::task::{DrawTask, PixelRect};
use crate::trace::{CacheSyncEvent, DispatchBeginEvent, DispatchEndEvent, EvaluateEvent, Tracer};

/// Runs accelerator operations.
///
/// Implemented by the platform's driver glue, which owns the accelerator
/// client handles. Each call blocks until the operation has completed; the
/// unit relies on that when it invalidates the target afterwards.
pub trait Accelerator {
    /// Runs a solid fill.
    fn fill(&mut self, op: &FillOp) -> Result<(), AccelError>;

    /// Runs an alpha blend.
    fn blend(&mut self, op: &BlendOp) -> Result<(), AccelError>;

    /// Runs a scale/rotate/mirror transfer.
    fn srm(&mut self, op: &SrmOp) -> Result<(), AccelError>;
}

impl<T: Accelerator + ?Sized> Accelerator for &mut T {
    #[inline]
    fn fill(&mut self, op: &FillOp) -> Result<(), AccelError> {
        (**self).fill(op)
    }

    #[inline]
    fn blend(&mut self, op: &BlendOp) -> Result<(), AccelError> {
        (**self).blend(op)
    }

    #[inline]
    fn srm(&mut self, op: &SrmOp) -> Result<(), AccelError> {
        (**self).srm(op)
    }
}

/// Summary of a completed dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatch {
    /// Dispatch counter of the unit.
    pub dispatch_index: u64,
    /// Target operation that ran.
    pub operation: OperationKind,
    /// Mode the target was programmed with.
    pub mode: HardwareMode,
    /// Region of the target written.
    pub region: PixelRect,
    /// Number of buffers flushed before the operation.
    pub flushed: u32,
}

/// Accelerator draw unit: evaluation plus cache-bracketed dispatch.
#[derive(Debug)]
pub struct DrawUnit<A, C> {
    config: UnitConfig,
    accel: A,
    cache: C,
    dispatches: u64,
}

impl<A: Accelerator, C: CacheMaintenance> DrawUnit<A, C> {
    /// Creates a draw unit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails [`UnitConfig::validate`].
    pub fn new(config: UnitConfig, accel: A, cache: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            accel,
            cache,
            dispatches: 0,
        })
    }

    /// The unit's configuration.
    #[must_use]
    pub fn config(&self) -> &UnitConfig {
        &self.config
    }

    /// The accelerator driver.
    #[must_use]
    pub fn accelerator(&self) -> &A {
        &self.accel
    }

    /// The cache maintenance primitive.
    #[must_use]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Number of dispatch attempts so far.
    #[must_use]
    pub fn dispatch_count(&self) -> u64 {
        self.dispatches
    }

    /// Consumes the unit, returning the driver and cache primitive.
    pub fn into_parts(self) -> (A, C) {
        (self.accel, self.cache)
    }

    /// Decides whether `task` can run on the accelerator. Pure.
    #[must_use]
    pub fn evaluate(&self, task: &DrawTask, target: &Surface, clip: Rect) -> Evaluation {
        evaluate(task, target, clip, &self.config)
    }

    /// Runs `task` on the accelerator, bracketed by cache maintenance on the
    /// buffers it touches.
    ///
    /// A rejected task makes no cache or driver call.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Rejected`] if the task is not eligible; render it
    ///   in software instead.
    /// - [`DispatchError::Accelerator`] if the driver fails. The flushes
    ///   have already run; the target's contents are unspecified.
    pub fn dispatch(
        &mut self,
        task: &DrawTask,
        target: &Surface,
        clip: Rect,
        tracer: &mut Tracer<'_>,
    ) -> Result<Dispatch, DispatchError> {
        let dispatch_index = self.dispatches;
        self.dispatches = self.dispatches.wrapping_add(1);

        let evaluation = self.evaluate(task, target, clip).into_result();
        tracer.evaluate(&EvaluateEvent {
            dispatch_index,
            task: task.kind(),
            outcome: evaluation.map(|op| op.operation()),
        });
        let op = evaluation?;

        let target_buffer = op.target().buffer;
        let mut flushed = 0;
        if let Some(source) = op.source()
            && source.buffer != target_buffer
        {
            flushed += self.sync(source.buffer, SyncDirection::CacheToMemory, dispatch_index, tracer);
        }
        flushed += self.sync(target_buffer, SyncDirection::CacheToMemory, dispatch_index, tracer);

        let operation = op.operation();
        let mode = op.target_mode();
        let region = op.region();
        tracer.dispatch_begin(&DispatchBeginEvent {
            dispatch_index,
            operation,
            mode,
            region,
        });
        let result = match &op {
            AccelOp::Fill(fill) => self.accel.fill(fill),
            AccelOp::Blend(blend) => self.accel.blend(blend),
            AccelOp::Srm(srm) => self.accel.srm(srm),
        };
        tracer.dispatch_end(&DispatchEndEvent {
            dispatch_index,
            operation,
            result,
        });
        result?;

        if self.config.invalidate_after_dispatch {
            self.sync(target_buffer, SyncDirection::MemoryToCache, dispatch_index, tracer);
        }

        Ok(Dispatch {
            dispatch_index,
            operation,
            mode,
            region,
            flushed,
        })
    }

    /// Runs one boundary call and reports whether it reached the platform.
    fn sync(
        &mut self,
        buffer: DrawBuffer,
        direction: SyncDirection,
        dispatch_index: u64,
        tracer: &mut Tracer<'_>,
    ) -> u32 {
        match direction {
            SyncDirection::CacheToMemory => sync_before_hardware_access(&mut self.cache, buffer),
            SyncDirection::MemoryToCache => sync_after_hardware_access(&mut self.cache, buffer),
        }
        if buffer.is_empty() {
            return 0;
        }
        tracer.cache_sync(&CacheSyncEvent {
            dispatch_index,
            buffer,
            direction,
        });
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ColorFormat;
    use crate::mode::to_hardware_mode;
    use crate::plan::RejectReason;
    use crate::task::{Color32, FillTask, ImageTask};
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Call {
        Sync(DrawBuffer, SyncDirection),
        Fill(PixelRect),
        Blend(PixelRect),
        Srm(PixelRect),
    }

    struct Accel<'a> {
        log: &'a RefCell<Vec<Call>>,
        fail: Option<AccelError>,
    }

    impl Accelerator for Accel<'_> {
        fn fill(&mut self, op: &FillOp) -> Result<(), AccelError> {
            self.log.borrow_mut().push(Call::Fill(op.region));
            self.fail.map_or(Ok(()), Err)
        }

        fn blend(&mut self, op: &BlendOp) -> Result<(), AccelError> {
            self.log.borrow_mut().push(Call::Blend(op.region));
            self.fail.map_or(Ok(()), Err)
        }

        fn srm(&mut self, op: &SrmOp) -> Result<(), AccelError> {
            self.log.borrow_mut().push(Call::Srm(op.source_block));
            self.fail.map_or(Ok(()), Err)
        }
    }

    struct Cache<'a> {
        log: &'a RefCell<Vec<Call>>,
    }

    impl CacheMaintenance for Cache<'_> {
        fn msync(&mut self, region: DrawBuffer, direction: SyncDirection) {
            self.log.borrow_mut().push(Call::Sync(region, direction));
        }
    }

    const TARGET_BUF: DrawBuffer = DrawBuffer::new(0x4800_0000, 100 * 100 * 2);
    const SOURCE_BUF: DrawBuffer = DrawBuffer::new(0x4900_0000, 20 * 20 * 4);

    fn target() -> Surface {
        Surface::packed(TARGET_BUF, 100, 100, ColorFormat::Rgb565)
    }

    fn unit<'a>(log: &'a RefCell<Vec<Call>>, config: UnitConfig) -> DrawUnit<Accel<'a>, Cache<'a>> {
        DrawUnit::new(config, Accel { log, fail: None }, Cache { log }).unwrap()
    }

    fn everything() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn fill_flushes_only_the_target() {
        let log = RefCell::new(Vec::new());
        let mut unit = unit(&log, UnitConfig::default());
        let task = DrawTask::Fill(FillTask::solid(
            Rect::new(0.0, 0.0, 50.0, 50.0),
            Color32::rgb(1, 2, 3),
        ));
        let done = unit
            .dispatch(&task, &target(), everything(), &mut Tracer::none())
            .unwrap();
        assert_eq!(
            *log.borrow(),
            [
                Call::Sync(TARGET_BUF, SyncDirection::CacheToMemory),
                Call::Fill(PixelRect::new(0, 0, 50, 50)),
            ]
        );
        assert_eq!(done.operation, OperationKind::FillTarget);
        assert_eq!(done.mode, to_hardware_mode(ColorFormat::Rgb565, OperationKind::FillTarget));
        assert_eq!(done.flushed, 1);
        assert_eq!(done.dispatch_index, 0);
    }

    #[test]
    fn image_flushes_source_then_target() {
        let log = RefCell::new(Vec::new());
        let mut unit = unit(&log, UnitConfig::default());
        let src = Surface::packed(SOURCE_BUF, 20, 20, ColorFormat::Argb8888);
        let task = DrawTask::Image(ImageTask::blit(src, 10.0, 10.0));
        let done = unit
            .dispatch(&task, &target(), everything(), &mut Tracer::none())
            .unwrap();
        assert_eq!(
            *log.borrow(),
            [
                Call::Sync(SOURCE_BUF, SyncDirection::CacheToMemory),
                Call::Sync(TARGET_BUF, SyncDirection::CacheToMemory),
                Call::Blend(PixelRect::new(10, 10, 20, 20)),
            ]
        );
        assert_eq!(done.flushed, 2);
    }

    #[test]
    fn rejected_task_touches_nothing() {
        let log = RefCell::new(Vec::new());
        let mut unit = unit(&log, UnitConfig::default());
        let task = DrawTask::Fill(FillTask {
            radius: 8,
            ..FillTask::solid(everything(), Color32::default())
        });
        let err = unit
            .dispatch(&task, &target(), everything(), &mut Tracer::none())
            .unwrap_err();
        assert_eq!(err, DispatchError::Rejected(RejectReason::RoundedCorners));
        assert!(log.borrow().is_empty(), "no cache or driver calls");
        assert_eq!(unit.dispatch_count(), 1);
    }

    #[test]
    fn xrgb_fill_target_is_rejected_before_any_sync() {
        let log = RefCell::new(Vec::new());
        let mut unit = unit(&log, UnitConfig::default());
        let target = Surface::packed(
            DrawBuffer::new(0x4800_0000, 100 * 100 * 4),
            100,
            100,
            ColorFormat::Xrgb8888,
        );
        let task = DrawTask::Fill(FillTask::solid(everything(), Color32::default()));
        let err = unit
            .dispatch(&task, &target, everything(), &mut Tracer::none())
            .unwrap_err();
        assert!(matches!(err, DispatchError::Rejected(RejectReason::Format(_))), "{err:?}");
        assert!(log.borrow().is_empty(), "no cache or driver calls");
    }

    #[test]
    fn misaligned_target_is_rejected_before_any_sync() {
        let log = RefCell::new(Vec::new());
        let mut unit = unit(&log, UnitConfig::default());
        let target = Surface::packed(
            DrawBuffer::new(0x4800_0040, 100 * 100 * 2),
            100,
            100,
            ColorFormat::Rgb565,
        );
        let task = DrawTask::Fill(FillTask::solid(everything(), Color32::default()));
        let err = unit
            .dispatch(&task, &target, everything(), &mut Tracer::none())
            .unwrap_err();
        assert_eq!(err, DispatchError::Rejected(RejectReason::Misaligned));
        assert!(log.borrow().is_empty(), "no cache or driver calls");
    }

    #[test]
    fn driver_error_propagates_after_flush() {
        let log = RefCell::new(Vec::new());
        let mut unit = DrawUnit::new(
            UnitConfig {
                invalidate_after_dispatch: true,
                ..UnitConfig::default()
            },
            Accel {
                log: &log,
                fail: Some(AccelError::Timeout),
            },
            Cache { log: &log },
        )
        .unwrap();
        let task = DrawTask::Fill(FillTask::solid(everything(), Color32::default()));
        let err = unit
            .dispatch(&task, &target(), everything(), &mut Tracer::none())
            .unwrap_err();
        assert_eq!(err, DispatchError::Accelerator(AccelError::Timeout));
        // Flushed, ran, and did not invalidate a target the driver failed on.
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn invalidate_after_dispatch_when_configured() {
        let log = RefCell::new(Vec::new());
        let mut unit = unit(
            &log,
            UnitConfig {
                invalidate_after_dispatch: true,
                ..UnitConfig::default()
            },
        );
        let task = DrawTask::Fill(FillTask::solid(everything(), Color32::default()));
        unit.dispatch(&task, &target(), everything(), &mut Tracer::none())
            .unwrap();
        assert_eq!(
            log.borrow().last(),
            Some(&Call::Sync(TARGET_BUF, SyncDirection::MemoryToCache))
        );
    }

    #[test]
    fn shared_source_buffer_is_flushed_once() {
        let log = RefCell::new(Vec::new());
        let mut unit = unit(&log, UnitConfig::default());
        let src = Surface::packed(TARGET_BUF, 20, 20, ColorFormat::Rgb565);
        let task = DrawTask::Image(ImageTask::blit(src, 50.0, 50.0));
        let done = unit
            .dispatch(&task, &target(), everything(), &mut Tracer::none())
            .unwrap();
        assert_eq!(done.flushed, 1, "shared buffer flushed once");
        assert_eq!(done.operation, OperationKind::ScaleRotateTarget);
    }

    #[test]
    fn bad_config_is_refused() {
        let log = RefCell::new(Vec::new());
        let result = DrawUnit::new(
            UnitConfig {
                buffer_align: 16,
                ..UnitConfig::default()
            },
            Accel {
                log: &log,
                fail: None,
            },
            Cache { log: &log },
        );
        assert!(matches!(result, Err(ConfigError::AlignmentTooSmall { .. })), "refused");
    }

    #[test]
    fn evaluate_is_side_effect_free() {
        let log = RefCell::new(Vec::new());
        let unit = unit(&log, UnitConfig::default());
        let task = DrawTask::Fill(FillTask::solid(everything(), Color32::default()));
        assert!(unit.evaluate(&task, &target(), everything()).is_accepted());
        assert!(log.borrow().is_empty(), "evaluation syncs nothing");
        assert_eq!(unit.dispatch_count(), 0);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn dispatch_emits_trace_events_in_order() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Names(Vec<&'static str>);
        impl TraceSink for Names {
            fn on_evaluate(&mut self, _: &EvaluateEvent) {
                self.0.push("evaluate");
            }
            fn on_cache_sync(&mut self, _: &CacheSyncEvent) {
                self.0.push("sync");
            }
            fn on_dispatch_begin(&mut self, _: &DispatchBeginEvent) {
                self.0.push("begin");
            }
            fn on_dispatch_end(&mut self, _: &DispatchEndEvent) {
                self.0.push("end");
            }
        }

        let log = RefCell::new(Vec::new());
        let mut unit = unit(&log, UnitConfig::default());
        let mut names = Names::default();
        let task = DrawTask::Fill(FillTask::solid(everything(), Color32::default()));
        unit.dispatch(&task, &target(), everything(), &mut Tracer::new(&mut names))
            .unwrap();
        assert_eq!(names.0, ["evaluate", "sync", "begin", "end"]);
    }
}
