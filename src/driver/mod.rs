// src/driver/mod.rs

// Declare the sync sub-module
pub mod sync_driver;

// Re-export the public driver surface
pub use sync_driver::{RetryPolicy, SyncDriver};

// Async driver stub: raw command writes only, no retry/settle layer yet
#[cfg(feature = "async")]
use crate::common::{
    address::Mlx90393Addr, command::Command, error::Mlx90393Error,
    hal_traits::Mlx90393I2cAsync,
};
#[cfg(feature = "async")]
use core::fmt::Debug;

#[cfg(feature = "async")]
pub struct AsyncDriver<IF> {
    interface: IF,
    address: Mlx90393Addr,
}

#[cfg(feature = "async")]
impl<IF> AsyncDriver<IF>
where
    IF: Mlx90393I2cAsync,
    IF::Error: Debug,
{
    pub fn new(interface: IF, address: Mlx90393Addr) -> Self {
        AsyncDriver { interface, address }
    }

    /// Issues one raw command write. The caller owns settle timing until
    /// an async timer seam lands here.
    pub async fn send_command(&mut self, command: Command) -> Result<(), Mlx90393Error<IF::Error>> {
        self.interface
            .write(self.address, &[command.opcode()])
            .await
            .map_err(Mlx90393Error::Bus)
    }
}
