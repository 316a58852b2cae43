// src/common/address.rs

use super::error::Mlx90393Error;
use core::convert::TryFrom;
use core::fmt;

/// A validated 7-bit bus address.
///
/// The device is addressed exclusively through one of these; raw bytes
/// never reach the transport without passing the range check.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mlx90393Addr(u8);

impl Mlx90393Addr {
    /// Power-on default address of the MLX90393 (A0/A1 strapped low).
    pub const DEFAULT_ADDRESS: Mlx90393Addr = Mlx90393Addr(0x0C);

    /// First address of the usable 7-bit range (below is reserved).
    pub const FIRST_VALID: u8 = 0x08;
    /// Last address of the usable 7-bit range (above is reserved).
    pub const LAST_VALID: u8 = 0x77;

    /// Creates a new `Mlx90393Addr` if the given byte is a usable 7-bit
    /// address. Returns `Result<Self, Mlx90393Error<()>>` because
    /// validation itself cannot cause an I/O error.
    pub fn new(address: u8) -> Result<Self, Mlx90393Error<()>> {
        if Self::is_valid_address(address) {
            Ok(Mlx90393Addr(address))
        } else {
            Err(Mlx90393Error::InvalidAddress(address))
        }
    }

    /// Constructs without the range check.
    ///
    /// # Safety
    /// The caller must guarantee `address` is within the usable 7-bit
    /// range; an out-of-range address would target reserved bus space.
    pub const unsafe fn new_unchecked(address: u8) -> Self {
        Mlx90393Addr(address)
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT_ADDRESS.0
    }

    #[inline]
    pub const fn is_valid_address(address: u8) -> bool {
        address >= Self::FIRST_VALID && address <= Self::LAST_VALID
    }
}

impl Default for Mlx90393Addr {
    fn default() -> Self {
        Self::DEFAULT_ADDRESS
    }
}

impl TryFrom<u8> for Mlx90393Addr {
    // The error type here is specific: no I/O error possibility.
    type Error = Mlx90393Error<()>;

    /// Attempts to convert a raw byte into an `Mlx90393Addr`.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Mlx90393Addr> for u8 {
    fn from(value: Mlx90393Addr) -> Self {
        value.0
    }
}

impl fmt::Display for Mlx90393Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}
