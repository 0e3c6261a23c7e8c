// Copyright 2026 the PPA Offload Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use core::fmt;

use crate::format::{ColorFormat, OperationKind};
use crate::plan::RejectReason;

/// A format/operation pair the accelerator cannot handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnsupportedFormat {
    /// The requested format.
    pub format: ColorFormat,
    /// The operation it was requested for.
    pub operation: OperationKind,
}

impl fmt::Display for UnsupportedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} is not supported by the accelerator for {:?}",
            self.format, self.operation
        )
    }
}

impl core::error::Error for UnsupportedFormat {}

/// Failure reported by the accelerator driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccelError {
    /// The driver refused the operation's parameters.
    InvalidArgument,
    /// The accelerator did not complete in time.
    Timeout,
    /// Driver-specific error code.
    Driver(i32),
}

impl fmt::Display for AccelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => f.write_str("accelerator rejected operation arguments"),
            Self::Timeout => f.write_str("accelerator operation timed out"),
            Self::Driver(code) => write!(f, "accelerator driver error ({code})"),
        }
    }
}

impl core::error::Error for AccelError {}

/// Errors from [`DrawUnit::dispatch`](crate::unit::DrawUnit::dispatch).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// The task is not eligible for the accelerator; render it in software.
    Rejected(RejectReason),
    /// The driver failed after cache maintenance ran.
    Accelerator(AccelError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(reason) => write!(f, "task rejected for accelerator: {reason}"),
            Self::Accelerator(err) => write!(f, "{err}"),
        }
    }
}

impl core::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Rejected(_) => None,
            Self::Accelerator(err) => Some(err),
        }
    }
}

impl From<UnsupportedFormat> for DispatchError {
    fn from(err: UnsupportedFormat) -> Self {
        Self::Rejected(RejectReason::Format(err))
    }
}

impl From<AccelError> for DispatchError {
    fn from(err: AccelError) -> Self {
        Self::Accelerator(err)
    }
}

impl From<RejectReason> for DispatchError {
    fn from(reason: RejectReason) -> Self {
        Self::Rejected(reason)
    }
}

/// Invalid [`UnitConfig`](crate::config::UnitConfig).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigError {
    /// The cache line size is zero or not a power of two.
    BadCacheLine(usize),
    /// The buffer alignment is not a power of two.
    AlignmentNotPowerOfTwo(usize),
    /// The buffer alignment is smaller than the required minimum.
    AlignmentTooSmall {
        /// Configured alignment.
        align: usize,
        /// Smallest acceptable alignment.
        required: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadCacheLine(size) => {
                write!(f, "cache line size {size} is not a non-zero power of two")
            }
            Self::AlignmentNotPowerOfTwo(align) => {
                write!(f, "draw buffer alignment {align} is not a power of two")
            }
            Self::AlignmentTooSmall { align, required } => write!(
                f,
                "draw buffer alignment {align} is below the required {required} bytes"
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use core::error::Error;

    #[test]
    fn dispatch_error_sources() {
        let unsupported = UnsupportedFormat {
            format: ColorFormat::Xrgb8888,
            operation: OperationKind::FillTarget,
        };
        let err = DispatchError::from(unsupported);
        assert_eq!(err, DispatchError::Rejected(RejectReason::Format(unsupported)));
        assert!(err.to_string().ends_with(&unsupported.to_string()), "got: {err}");

        let err = DispatchError::from(AccelError::Driver(-1));
        assert!(err.source().is_some(), "driver error is the source");
        assert_eq!(err.to_string(), "accelerator driver error (-1)");

        let err = DispatchError::from(RejectReason::RoundedCorners);
        assert!(err.source().is_none(), "rejections carry no source");
    }

    #[test]
    fn unsupported_message_names_pair() {
        let msg = UnsupportedFormat {
            format: ColorFormat::Xrgb8888,
            operation: OperationKind::FillTarget,
        }
        .to_string();
        assert!(msg.contains("XRGB8888"), "got: {msg}");
        assert!(msg.contains("FillTarget"), "got: {msg}");
    }
}
