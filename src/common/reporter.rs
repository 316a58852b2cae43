// src/common/reporter.rs

use core::fmt::Debug;

use super::address::Mlx90393Addr;
use super::error::{Mlx90393Error, Operation};
use super::types::MagSample;

/// One-way reporting seam for samples and diagnostics.
///
/// The driver and the acquisition loop push everything user-visible
/// through this trait: decoded samples, per-attempt retry failures,
/// per-cycle arm failures, contained handler errors and bus scan
/// results. Implementations should return promptly; the data-ready path
/// runs between bus transactions.
pub trait Reporter<E: Debug> {
    /// A decoded sample, one per handled data-ready event.
    fn sample(&mut self, sample: MagSample);

    /// One failed attempt inside a retry budget, 1-based.
    fn attempt_failed(&mut self, op: Operation, attempt: u8, cause: &E);

    /// The startup reset exhausted its budget; the loop is terminal.
    fn init_failed(&mut self, error: &Mlx90393Error<E>);

    /// A measurement-start cycle gave up; the loop keeps running.
    fn cycle_failed(&mut self, error: &Mlx90393Error<E>);

    /// The data-ready handler contained an error instead of letting it
    /// escape its context.
    fn handler_error(&mut self, error: &Mlx90393Error<E>);

    /// Result of a bus scan, possibly empty.
    fn scan_results(&mut self, found: &[Mlx90393Addr]);
}

/// Discards everything. Useful when the caller only wants the `Result`
/// values.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullReporter;

impl<E: Debug> Reporter<E> for NullReporter {
    fn sample(&mut self, _sample: MagSample) {}
    fn attempt_failed(&mut self, _op: Operation, _attempt: u8, _cause: &E) {}
    fn init_failed(&mut self, _error: &Mlx90393Error<E>) {}
    fn cycle_failed(&mut self, _error: &Mlx90393Error<E>) {}
    fn handler_error(&mut self, _error: &Mlx90393Error<E>) {}
    fn scan_results(&mut self, _found: &[Mlx90393Addr]) {}
}

#[cfg(feature = "std")]
mod console {
    use super::*;
    use std::{print, println};

    /// Prints samples and diagnostics in the fixed console format: one
    /// labelled line per axis with two-decimal precision and the unit
    /// suffix, plus one line per diagnostic.
    #[derive(Debug, Default, Copy, Clone)]
    pub struct ConsoleReporter;

    impl<E: Debug> Reporter<E> for ConsoleReporter {
        fn sample(&mut self, sample: MagSample) {
            println!("X: {:.2} uT", sample.x);
            println!("Y: {:.2} uT", sample.y);
            println!("Z: {:.2} uT", sample.z);
        }

        fn attempt_failed(&mut self, op: Operation, attempt: u8, cause: &E) {
            println!("Attempt {}: failed to {}: {:?}", attempt, op, cause);
        }

        fn init_failed(&mut self, error: &Mlx90393Error<E>) {
            println!("Initialization failed: {}", error);
        }

        fn cycle_failed(&mut self, error: &Mlx90393Error<E>) {
            println!("Error starting measurement: {}", error);
        }

        fn handler_error(&mut self, error: &Mlx90393Error<E>) {
            println!("Error in data-ready handler: {}", error);
        }

        fn scan_results(&mut self, found: &[Mlx90393Addr]) {
            if found.is_empty() {
                println!("No bus devices detected. Check wiring!");
            } else {
                print!("Bus devices found:");
                for address in found {
                    print!(" {}", address);
                }
                println!();
            }
        }
    }
}

#[cfg(feature = "std")]
pub use console::ConsoleReporter;
