// src/driver/sync_driver/io_helpers.rs

use super::SyncDriver;
use crate::common::{
    address::Mlx90393Addr,
    error::{Mlx90393Error, Operation},
    hal_traits::{Mlx90393I2c, Mlx90393Timer},
    reporter::Reporter,
};
use core::fmt::Debug;

// Implementation block for the retry helper
impl<IF, R> SyncDriver<IF, R>
where
    IF: Mlx90393I2c + Mlx90393Timer,
    IF::Error: Debug,
    R: Reporter<IF::Error>,
{
    /// Runs one raw bus operation under the driver's retry policy.
    ///
    /// Each recoverable failure is reported with its 1-based attempt
    /// number and followed by the fixed retry delay. The budget is fresh
    /// for every call; exhaustion yields `Communication` carrying the
    /// operation identifier and the last underlying cause.
    pub(super) fn with_retry<T, F>(
        &mut self,
        op: Operation,
        mut f: F,
    ) -> Result<T, Mlx90393Error<IF::Error>>
    where
        F: FnMut(&mut IF, Mlx90393Addr) -> Result<T, IF::Error>,
    {
        let attempts = self.retry.attempts.max(1);
        let delay_ms = self.retry.delay.as_millis() as u32;

        let mut attempt = 1;
        loop {
            match f(&mut self.interface, self.address) {
                Ok(value) => return Ok(value),
                Err(cause) => {
                    self.reporter.attempt_failed(op, attempt, &cause);
                    // NOTE: The delay also follows the final failed attempt.
                    self.interface.delay_ms(delay_ms);

                    if attempt >= attempts {
                        return Err(Mlx90393Error::Communication {
                            op,
                            attempts,
                            cause,
                        });
                    }
                    attempt += 1;
                }
            }
        }
    }
}
