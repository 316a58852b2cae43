// src/acquisition/mod.rs

// Declare the modules within the acquisition directory.

pub mod drdy;      // Bounded data-ready event handoff out of interrupt context
pub mod sync_loop; // The steady-state acquisition state machine

// --- Public Re-exports ---

pub use drdy::{split, DrdyEvent, DrdyListener, DrdyNotifier, DrdyQueue, DRDY_QUEUE_DEPTH};
pub use sync_loop::{AcquisitionLoop, LoopState, ShutdownSignal};
