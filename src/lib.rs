// src/lib.rs

#![no_std] // Specify no_std at the crate root

#[cfg(feature = "std")]
extern crate std;

pub mod acquisition;
pub mod common;
pub mod driver;

// Re-export key types for convenience
pub use acquisition::AcquisitionLoop;
pub use common::Command;
pub use common::MagSample;
pub use common::Mlx90393Addr;
pub use common::Mlx90393Error;
pub use driver::SyncDriver;
