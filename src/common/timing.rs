// src/common/timing.rs

use core::time::Duration;

// Nominal values; the timer service only guarantees "at least this
// long", which is all the device requires.

// === Settle Times ===

/// Settle time after `RESET` before any further command is issued.
pub const RESET_SETTLE: Duration = Duration::from_millis(500);
/// Settle time after `START_MEASUREMENT` before `READ_MEASUREMENT`.
pub const START_MEASUREMENT_SETTLE: Duration = Duration::from_millis(100);

// === Retry Timing ===

/// Default attempt budget for one logical bus operation. Each retried
/// call gets a fresh budget; budgets are never shared across operations.
pub const DEFAULT_RETRY_ATTEMPTS: u8 = 5;
/// Fixed delay between attempts of one retried operation.
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

// === Acquisition Loop ===

/// Fixed delay between measurement-start cycles while armed.
pub const MEASUREMENT_CYCLE_PERIOD: Duration = Duration::from_millis(500);
