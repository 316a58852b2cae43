//! MLX90393 command definitions.
//!
//! The device speaks a single-byte command set; the measurement opcodes
//! carry the axis-select bits pre-folded for a full three-axis magnetic
//! measurement. Issuing a command is a side-effecting bus write, not a
//! query.

use core::fmt;
use core::time::Duration;

use super::timing;

/// Represents an MLX90393 command.
///
/// Some commands require a settle time to elapse before any dependent
/// bus operation; see [`Command::settle_time`]. The driver applies the
/// settle once, after the (possibly retried) write succeeds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Returns the device to a known idle state. Must complete before
    /// any measurement traffic.
    Reset,

    /// Arms a single three-axis measurement. The result is signalled on
    /// the data-ready line, not returned on the bus.
    StartMeasurement,

    /// Requests the 7-byte measurement frame for the armed axes.
    ReadMeasurement,

    /// Leaves burst/wake-up modes; issued best-effort at shutdown.
    Exit,
}

impl Command {
    /// The single command byte written to the bus.
    pub const fn opcode(&self) -> u8 {
        match self {
            Command::Reset => 0x60,
            Command::StartMeasurement => 0x3E,
            Command::ReadMeasurement => 0x4E,
            Command::Exit => 0x80,
        }
    }

    /// Settle time that must elapse after this command before any
    /// dependent operation is issued.
    ///
    /// `ReadMeasurement` is answered directly on the bus and `Exit` is a
    /// fire-and-forget shutdown path, so neither settles.
    pub const fn settle_time(&self) -> Option<Duration> {
        match self {
            Command::Reset => Some(timing::RESET_SETTLE),
            Command::StartMeasurement => Some(timing::START_MEASUREMENT_SETTLE),
            Command::ReadMeasurement | Command::Exit => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Command::Reset => "RESET",
            Command::StartMeasurement => "START_MEASUREMENT",
            Command::ReadMeasurement => "READ_MEASUREMENT",
            Command::Exit => "EXIT",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#04x})", self.name(), self.opcode())
    }
}
