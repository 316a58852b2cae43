// src/acquisition/sync_loop.rs

use super::drdy::{DrdyEvent, DrdyListener};
use crate::common::{
    error::Mlx90393Error,
    hal_traits::{Mlx90393I2c, Mlx90393Timer},
    reporter::Reporter,
    timing,
};
use crate::driver::sync_driver::SyncDriver;
use core::fmt::Debug;
use core::sync::atomic::{AtomicBool, Ordering};

/// Acquisition state, advanced by `initialize` and `run`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopState {
    /// No bus traffic has happened yet.
    Uninitialized,
    /// The startup reset is in flight.
    Resetting,
    /// Steady state: re-arming the device and draining data-ready
    /// events.
    Armed,
    /// The startup reset exhausted its retry budget. Terminal.
    Error,
}

/// External stop request for the acquisition loop.
///
/// Polled between cycles; the data-ready path has no cancellation of
/// its own and drains together with the loop.
pub trait ShutdownSignal {
    fn is_shutdown(&self) -> bool;
}

impl ShutdownSignal for AtomicBool {
    fn is_shutdown(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<S: ShutdownSignal + ?Sized> ShutdownSignal for &S {
    fn is_shutdown(&self) -> bool {
        (**self).is_shutdown()
    }
}

/// The steady-state driver of the device: keeps re-arming measurements
/// and drains data-ready events as the single bus owner.
///
/// Measurement results never flow through the arm path; they arrive
/// exclusively through the data-ready queue and are read back by
/// [`AcquisitionLoop::service`]. Running the read-out here, instead of
/// in the edge callback, is what serializes all bus traffic.
pub struct AcquisitionLoop<'q, IF, R> {
    driver: SyncDriver<IF, R>,
    drdy: DrdyListener<'q>,
    state: LoopState,
}

impl<'q, IF, R> AcquisitionLoop<'q, IF, R>
where
    IF: Mlx90393I2c + Mlx90393Timer,
    IF::Error: Debug,
    R: Reporter<IF::Error>,
{
    pub fn new(driver: SyncDriver<IF, R>, drdy: DrdyListener<'q>) -> Self {
        AcquisitionLoop {
            driver,
            drdy,
            state: LoopState::Uninitialized,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Brings the device out of an unknown state with a retried reset.
    ///
    /// Exhaustion is terminal: the loop enters [`LoopState::Error`] and
    /// the communication failure is handed back to the caller, which
    /// decides whether it is fatal to the process.
    pub fn initialize(&mut self) -> Result<(), Mlx90393Error<IF::Error>> {
        self.state = LoopState::Resetting;
        match self.driver.reset() {
            Ok(()) => {
                self.state = LoopState::Armed;
                Ok(())
            }
            Err(error) => {
                self.state = LoopState::Error;
                self.driver.reporter_mut().init_failed(&error);
                Err(error)
            }
        }
    }

    /// Drains pending data-ready events.
    ///
    /// Errors are contained per event; one bad read-out never stops the
    /// remaining events from being handled and never escapes this call.
    pub fn service(&mut self) {
        while let Ok(event) = self.drdy.poll() {
            self.handle_data_ready(event);
        }
    }

    /// The data-ready reaction: read, decode, report.
    fn handle_data_ready(&mut self, _event: DrdyEvent) {
        match self.driver.read_sample() {
            Ok(sample) => self.driver.reporter_mut().sample(sample),
            Err(error) => self.driver.reporter_mut().handler_error(&error),
        }
    }

    /// One armed cycle: re-arm, wait out the cycle period, drain
    /// events.
    ///
    /// A failed `START_MEASUREMENT` is reported and the cycle completes
    /// anyway; a single bad cycle is never fatal to the loop.
    pub fn cycle(&mut self) {
        if let Err(error) = self.driver.start_measurement() {
            self.driver.reporter_mut().cycle_failed(&error);
        }

        let period = timing::MEASUREMENT_CYCLE_PERIOD.as_millis() as u32;
        self.driver.interface_mut().delay_ms(period);

        self.service();
    }

    /// Runs until `shutdown` fires, then issues the best-effort `EXIT`.
    ///
    /// Initialization failure is returned as-is; a clean shutdown
    /// returns `Ok` even when the final `EXIT` write is refused (that
    /// failure is only reported).
    pub fn run<S: ShutdownSignal>(&mut self, shutdown: &S) -> Result<(), Mlx90393Error<IF::Error>> {
        if self.state == LoopState::Uninitialized {
            self.initialize()?;
        }

        while self.state == LoopState::Armed && !shutdown.is_shutdown() {
            self.cycle();
        }

        // Shutdown path: one attempt, failures reported but not returned.
        if let Err(error) = self.driver.exit() {
            self.driver.reporter_mut().handler_error(&error);
        }

        Ok(())
    }

    /// Hands the driver back, e.g. to release the bus interface.
    pub fn into_driver(self) -> SyncDriver<IF, R> {
        self.driver
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::drdy::{split, DrdyNotifier, DrdyQueue};
    use crate::common::{
        address::Mlx90393Addr,
        error::Operation,
        frame::SAMPLE_FRAME_LEN,
        types::MagSample,
    };
    use core::cell::Cell;

    const REFERENCE_FRAME: [u8; SAMPLE_FRAME_LEN] = [0x00, 0x00, 0x0A, 0x00, 0x14, 0x00, 0x1E];

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    struct MockBusError;

    struct MockInterface {
        fail_writes: u32,
        fail_reads: u32,
        write_log: [Option<u8>; 32],
        write_pos: usize,
        staged_frame: [u8; SAMPLE_FRAME_LEN],
        delay_total_ms: u64,
    }

    impl MockInterface {
        fn new() -> Self {
            MockInterface {
                fail_writes: 0,
                fail_reads: 0,
                write_log: [None; 32],
                write_pos: 0,
                staged_frame: REFERENCE_FRAME,
                delay_total_ms: 0,
            }
        }

        fn written(&self) -> &[Option<u8>] {
            &self.write_log[..self.write_pos]
        }

        fn written_opcodes(&self, opcode: u8) -> usize {
            self.written().iter().filter(|b| **b == Some(opcode)).count()
        }
    }

    impl Mlx90393I2c for MockInterface {
        type Error = MockBusError;

        fn write(&mut self, _address: Mlx90393Addr, bytes: &[u8]) -> Result<(), MockBusError> {
            if self.fail_writes > 0 {
                self.fail_writes -= 1;
                return Err(MockBusError);
            }
            if let Some(byte) = bytes.first() {
                if self.write_pos < self.write_log.len() {
                    self.write_log[self.write_pos] = Some(*byte);
                    self.write_pos += 1;
                }
            }
            Ok(())
        }

        fn read(&mut self, _address: Mlx90393Addr, buffer: &mut [u8]) -> Result<(), MockBusError> {
            if self.fail_reads > 0 {
                self.fail_reads -= 1;
                return Err(MockBusError);
            }
            buffer.copy_from_slice(&self.staged_frame[..buffer.len()]);
            Ok(())
        }
    }

    impl Mlx90393Timer for MockInterface {
        fn delay_us(&mut self, us: u32) {
            self.delay_total_ms += (us / 1000) as u64;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.delay_total_ms += ms as u64;
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        samples: [Option<MagSample>; 8],
        sample_pos: usize,
        attempts: u32,
        init_failures: u32,
        cycle_failures: u32,
        handler_errors: u32,
    }

    impl Reporter<MockBusError> for RecordingReporter {
        fn sample(&mut self, sample: MagSample) {
            if self.sample_pos < self.samples.len() {
                self.samples[self.sample_pos] = Some(sample);
                self.sample_pos += 1;
            }
        }

        fn attempt_failed(&mut self, _op: Operation, _attempt: u8, _cause: &MockBusError) {
            self.attempts += 1;
        }

        fn init_failed(&mut self, _error: &Mlx90393Error<MockBusError>) {
            self.init_failures += 1;
        }

        fn cycle_failed(&mut self, _error: &Mlx90393Error<MockBusError>) {
            self.cycle_failures += 1;
        }

        fn handler_error(&mut self, _error: &Mlx90393Error<MockBusError>) {
            self.handler_errors += 1;
        }

        fn scan_results(&mut self, _found: &[Mlx90393Addr]) {}
    }

    // Fires after a fixed number of polls, standing in for the operator
    // interrupt.
    struct CountdownShutdown {
        remaining: Cell<u32>,
    }

    impl CountdownShutdown {
        fn after(cycles: u32) -> Self {
            CountdownShutdown {
                remaining: Cell::new(cycles),
            }
        }
    }

    impl ShutdownSignal for CountdownShutdown {
        fn is_shutdown(&self) -> bool {
            let remaining = self.remaining.get();
            if remaining == 0 {
                return true;
            }
            self.remaining.set(remaining - 1);
            false
        }
    }

    fn acquisition(
        interface: MockInterface,
        queue: &mut DrdyQueue,
    ) -> (DrdyNotifier<'_>, AcquisitionLoop<'_, MockInterface, RecordingReporter>) {
        let (notifier, listener) = split(queue);
        let driver = SyncDriver::new(
            interface,
            Mlx90393Addr::DEFAULT_ADDRESS,
            RecordingReporter::default(),
        );
        (notifier, AcquisitionLoop::new(driver, listener))
    }

    #[test]
    fn test_initialize_arms_after_reset() {
        let mut queue = DrdyQueue::new();
        let (_notifier, mut acq) = acquisition(MockInterface::new(), &mut queue);

        assert_eq!(acq.state(), LoopState::Uninitialized);
        acq.initialize().unwrap();
        assert_eq!(acq.state(), LoopState::Armed);
    }

    #[test]
    fn test_reset_exhaustion_is_terminal() {
        let mut interface = MockInterface::new();
        interface.fail_writes = u32::MAX;
        let mut queue = DrdyQueue::new();
        let (_notifier, mut acq) = acquisition(interface, &mut queue);

        let result = acq.initialize();

        assert!(matches!(
            result,
            Err(Mlx90393Error::Communication { attempts: 5, .. })
        ));
        assert_eq!(acq.state(), LoopState::Error);
        assert_eq!(acq.driver.reporter_mut().init_failures, 1);
        assert_eq!(acq.driver.reporter_mut().attempts, 5);
    }

    #[test]
    fn test_loop_survives_failing_measurement_starts() {
        let mut queue = DrdyQueue::new();
        let (_notifier, mut acq) = acquisition(MockInterface::new(), &mut queue);
        acq.initialize().unwrap();

        // Every START_MEASUREMENT from now on exhausts its budget.
        acq.driver.interface_mut().fail_writes = u32::MAX;

        let shutdown = CountdownShutdown::after(3);
        acq.run(&shutdown).unwrap();

        // Three failed cycles, still armed, never terminal.
        assert_eq!(acq.state(), LoopState::Armed);
        assert_eq!(acq.driver.reporter_mut().cycle_failures, 3);
        // The best-effort EXIT also failed and was only reported.
        assert_eq!(acq.driver.reporter_mut().handler_errors, 1);
    }

    #[test]
    fn test_data_ready_event_produces_sample() {
        let mut queue = DrdyQueue::new();
        let (mut notifier, mut acq) = acquisition(MockInterface::new(), &mut queue);
        acq.initialize().unwrap();

        assert!(notifier.notify(1));
        let shutdown = CountdownShutdown::after(1);
        acq.run(&shutdown).unwrap();

        let reporter = acq.driver.reporter_mut();
        assert_eq!(reporter.sample_pos, 1);
        assert_eq!(reporter.samples[0], Some(MagSample { x: 1.0, y: 2.0, z: 3.0 }));
        assert_eq!(reporter.handler_errors, 0);
    }

    #[test]
    fn test_handler_contains_read_errors() {
        let mut queue = DrdyQueue::new();
        let (mut notifier, mut acq) = acquisition(MockInterface::new(), &mut queue);
        acq.initialize().unwrap();

        acq.driver.interface_mut().fail_reads = u32::MAX;
        assert!(notifier.notify(1));

        // Must not panic or propagate; the error stays at the handler
        // boundary.
        acq.service();

        let reporter = acq.driver.reporter_mut();
        assert_eq!(reporter.handler_errors, 1);
        assert_eq!(reporter.sample_pos, 0);
    }

    #[test]
    fn test_service_drains_all_pending_events() {
        let mut queue = DrdyQueue::new();
        let (mut notifier, mut acq) = acquisition(MockInterface::new(), &mut queue);
        acq.initialize().unwrap();

        assert!(notifier.notify(1));
        assert!(notifier.notify(1));
        assert!(notifier.notify(1));
        acq.service();

        assert_eq!(acq.driver.reporter_mut().sample_pos, 3);
    }

    #[test]
    fn test_shutdown_sends_exit_once() {
        let mut queue = DrdyQueue::new();
        let (_notifier, mut acq) = acquisition(MockInterface::new(), &mut queue);

        // Already-fired shutdown: initialize, no cycles, exit.
        let shutdown = CountdownShutdown::after(0);
        acq.run(&shutdown).unwrap();

        let interface = acq.driver.interface_mut();
        assert_eq!(interface.written_opcodes(0x60), 1);
        assert_eq!(interface.written_opcodes(0x3E), 0);
        assert_eq!(interface.written_opcodes(0x80), 1);
    }

    #[test]
    fn test_atomic_bool_shutdown() {
        let mut queue = DrdyQueue::new();
        let (_notifier, mut acq) = acquisition(MockInterface::new(), &mut queue);

        let shutdown = AtomicBool::new(true);
        acq.run(&shutdown).unwrap();

        assert_eq!(acq.driver.interface_mut().written_opcodes(0x80), 1);
    }

    #[test]
    fn test_cycle_waits_out_the_period() {
        let mut queue = DrdyQueue::new();
        let (_notifier, mut acq) = acquisition(MockInterface::new(), &mut queue);
        acq.initialize().unwrap();

        let before = acq.driver.interface_mut().delay_total_ms;
        acq.cycle();
        let elapsed = acq.driver.interface_mut().delay_total_ms - before;

        // Start settle (100) + cycle period (500).
        assert_eq!(elapsed, 600);
    }
}
