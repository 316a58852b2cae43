// src/driver/sync_driver/mod.rs

mod io_helpers;

use crate::common::{
    address::Mlx90393Addr,
    command::Command,
    error::{Mlx90393Error, Operation},
    frame::{decode_sample, SAMPLE_FRAME_LEN},
    hal_traits::{Mlx90393I2c, Mlx90393Timer, SCAN_CAPACITY},
    reporter::Reporter,
    timing,
    types::MagSample,
};
use arrayvec::ArrayVec;
use core::fmt::Debug;
use core::time::Duration;

/// Attempt budget and inter-attempt delay for one logical bus
/// operation. Every retried call draws on a fresh budget.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u8,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: timing::DEFAULT_RETRY_ATTEMPTS,
            delay: timing::RETRY_DELAY,
        }
    }
}

/// Represents the MLX90393 command/transaction layer for SYNCHRONOUS
/// operation.
///
/// Owns the bus interface and is the only component that addresses the
/// device. Command writes and frame reads each run under the retry
/// policy; settle times are applied once, after the retried write
/// succeeds, so a dependent operation never runs early.
#[derive(Debug)]
pub struct SyncDriver<IF, R> {
    interface: IF,
    address: Mlx90393Addr,
    retry: RetryPolicy,
    reporter: R,
}

impl<IF, R> SyncDriver<IF, R>
where
    IF: Mlx90393I2c + Mlx90393Timer,
    IF::Error: Debug,
    R: Reporter<IF::Error>,
{
    pub fn new(interface: IF, address: Mlx90393Addr, reporter: R) -> Self {
        SyncDriver {
            interface,
            address,
            retry: RetryPolicy::default(),
            reporter,
        }
    }

    /// Replaces the default retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn address(&self) -> Mlx90393Addr {
        self.address
    }

    // --- Public Blocking Operations ---

    /// Issues one single-byte command under the retry policy, then lets
    /// the command's mandated settle time elapse.
    pub fn send_command(&mut self, command: Command) -> Result<(), Mlx90393Error<IF::Error>> {
        self.with_retry(Operation::Send(command), |iface, address| {
            iface.write(address, &[command.opcode()])
        })?;

        if let Some(settle) = command.settle_time() {
            self.interface.delay_ms(settle.as_millis() as u32);
        }

        Ok(())
    }

    /// Brings the device to a known idle state. No acknowledgement byte
    /// is read; success means the retried write went through.
    pub fn reset(&mut self) -> Result<(), Mlx90393Error<IF::Error>> {
        self.send_command(Command::Reset)
    }

    /// Arms a single three-axis measurement. Completion is signalled on
    /// the data-ready line, never returned by this call.
    pub fn start_measurement(&mut self) -> Result<(), Mlx90393Error<IF::Error>> {
        self.send_command(Command::StartMeasurement)
    }

    /// Retrieves and decodes one measurement frame.
    ///
    /// Sequence: `READ_MEASUREMENT` under retry, then the 7-byte frame
    /// read under its own independent budget, then the pure decode.
    pub fn read_sample(&mut self) -> Result<MagSample, Mlx90393Error<IF::Error>> {
        self.send_command(Command::ReadMeasurement)?;

        let mut frame = [0u8; SAMPLE_FRAME_LEN];
        self.with_retry(Operation::ReadSample, |iface, address| {
            iface.read(address, &mut frame)
        })?;

        Ok(decode_sample(&frame)?)
    }

    /// Issues `EXIT` exactly once. Shutdown path: best-effort, no retry
    /// budget, no settle.
    pub fn exit(&mut self) -> Result<(), Mlx90393Error<IF::Error>> {
        self.interface
            .write(self.address, &[Command::Exit.opcode()])
            .map_err(Mlx90393Error::Bus)
    }

    /// Probes the bus and reports every responding address.
    pub fn scan_bus(&mut self) -> ArrayVec<Mlx90393Addr, SCAN_CAPACITY> {
        let found = self.interface.scan();
        self.reporter.scan_results(&found);
        found
    }

    // --- Crate-internal access for the acquisition layer ---

    pub(crate) fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    pub(crate) fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    /// Releases the bus interface.
    pub fn release(self) -> IF {
        self.interface
    }
}
