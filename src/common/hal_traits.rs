// src/common/hal_traits.rs

use super::address::Mlx90393Addr;
use arrayvec::ArrayVec;
use core::fmt::Debug;

/// Number of addresses in the probeable 7-bit range, sizing scan
/// results. Covers `FIRST_VALID..=LAST_VALID` exactly.
pub const SCAN_CAPACITY: usize = 112;

/// Abstraction for the timer/delay operations required by the protocol.
///
/// Every settle, retry and inter-cycle delay goes through this trait so
/// tests can substitute virtual time.
pub trait Mlx90393Timer {
    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Abstraction for blocking two-wire transfers at a target address.
pub trait Mlx90393I2c {
    /// Associated error type for recoverable transfer failures
    /// (timeout, NACK). Exhausting a retry budget turns these into a
    /// fatal `Communication` error at the driver layer.
    type Error: Debug;

    /// Writes `bytes` to `address` in one bus transaction.
    fn write(&mut self, address: Mlx90393Addr, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Fills `buffer` from `address` in one bus transaction.
    fn read(&mut self, address: Mlx90393Addr, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Probes the usable 7-bit range and collects responding addresses.
    ///
    /// The default implementation issues an empty write per address; a
    /// NACK marks the address as absent, so probe failures are neither
    /// errors nor retried.
    fn scan(&mut self) -> ArrayVec<Mlx90393Addr, SCAN_CAPACITY> {
        let mut found = ArrayVec::new();
        for raw in Mlx90393Addr::FIRST_VALID..=Mlx90393Addr::LAST_VALID {
            let address = match Mlx90393Addr::new(raw) {
                Ok(address) => address,
                Err(_) => continue,
            };
            if self.write(address, &[]).is_ok() {
                found.push(address);
            }
        }
        found
    }
}

/// Abstraction for asynchronous two-wire transfers (requires the
/// 'async' feature).
#[cfg(feature = "async")]
pub trait Mlx90393I2cAsync {
    /// Associated error type for recoverable transfer failures.
    type Error: Debug;

    /// Asynchronously writes `bytes` to `address`.
    async fn write(&mut self, address: Mlx90393Addr, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Asynchronously fills `buffer` from `address`.
    async fn read(&mut self, address: Mlx90393Addr, buffer: &mut [u8])
        -> Result<(), Self::Error>;
}

/// Bundles an `embedded-hal` 1.0 I2C bus with its delay provider so the
/// pair satisfies both driver-facing traits.
///
/// Requires the `impl-ehal` feature.
#[cfg(feature = "impl-ehal")]
#[derive(Debug)]
pub struct EhalInterface<I2C, D> {
    i2c: I2C,
    delay: D,
}

#[cfg(feature = "impl-ehal")]
impl<I2C, D> EhalInterface<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        EhalInterface { i2c, delay }
    }

    /// Releases the wrapped peripherals.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

#[cfg(feature = "impl-ehal")]
impl<I2C, D> Mlx90393I2c for EhalInterface<I2C, D>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Error = I2C::Error;

    fn write(&mut self, address: Mlx90393Addr, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address.as_u8(), bytes)
    }

    fn read(&mut self, address: Mlx90393Addr, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(address.as_u8(), buffer)
    }
}

#[cfg(feature = "impl-ehal")]
impl<I2C, D> Mlx90393Timer for EhalInterface<I2C, D>
where
    D: embedded_hal::delay::DelayNs,
{
    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
