// src/common/error.rs

use core::fmt;

use super::command::Command;
use super::frame::FrameError;

/// Identifies the logical bus operation a failure belongs to, so retry
/// diagnostics and exhaustion errors can name what was being attempted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    /// A single-byte command write.
    Send(Command),
    /// The 7-byte frame read that follows `READ_MEASUREMENT`.
    ReadSample,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Send(command) => write!(f, "send command {}", command),
            Operation::ReadSample => write!(f, "read measurement data"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Mlx90393Error<E = ()>
where
    E: core::fmt::Debug, // Need Debug for the generic transport error
{
    /// Recoverable transport failure (timeout, NACK) from the bus HAL.
    /// The retry layer's input; callers normally see it only from the
    /// unretried shutdown path.
    #[error("bus error: {0:?}")]
    Bus(E),

    /// Retry budget exhausted for one logical operation. Carries the
    /// last underlying cause; propagates to the caller, never swallowed.
    #[error("{op} failed after {attempts} attempts, last error: {cause:?}")]
    Communication {
        op: Operation,
        attempts: u8,
        cause: E,
    },

    /// The sample frame violated the fixed 7-byte layout. A defect in
    /// the transport framing, surfaced immediately and never retried.
    #[error(transparent)]
    Framing(#[from] FrameError),

    /// Provided byte is not a usable 7-bit bus address.
    #[error("invalid 7-bit bus address: {0:#04x}")]
    InvalidAddress(u8),
}

// Note: For the Bus(E)/Communication variants' messages to work even in
// no_std, the transport error type `E` only needs `core::fmt::Debug`.
