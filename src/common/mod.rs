// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod command;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod reporter;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::Mlx90393Addr;

// From command.rs
pub use command::Command;

// From error.rs
pub use error::{Mlx90393Error, Operation};

// From frame.rs
pub use frame::{decode_sample, FrameError, SAMPLE_FRAME_LEN};

// From hal_traits.rs
pub use hal_traits::{Mlx90393I2c, Mlx90393Timer, SCAN_CAPACITY}; // Core sync traits

// From reporter.rs
pub use reporter::{NullReporter, Reporter};

// From timing.rs (constants - users access via common::timing::*)

// From types.rs
pub use types::{MagSample, GAIN_UT_PER_LSB};

// --- Feature-gated re-exports ---

// Async traits (from hal_traits.rs)
#[cfg(feature = "async")]
pub use hal_traits::Mlx90393I2cAsync;

// embedded-hal adapter (from hal_traits.rs)
#[cfg(feature = "impl-ehal")]
pub use hal_traits::EhalInterface;

// Console reporter (from reporter.rs)
#[cfg(feature = "std")]
pub use reporter::ConsoleReporter;
