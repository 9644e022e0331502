//! Debug console configuration and driver seam.

use crate::clock::Hertz;
use crate::error::HalStatus;

/// Console transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleType {
    /// UART console.
    Uart,
}

/// Configuration handed to the console driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsoleConfig {
    /// Transport.
    pub console_type: ConsoleType,
    /// Register base of the console peripheral.
    pub base: u32,
    /// Functional clock of the peripheral as read back after configuration.
    pub src_freq: Hertz,
    /// Line rate.
    pub baudrate: u32,
}

/// Console driver seam (`hpm_debug_console`).
///
/// After a successful [`ConsoleDriver::console_init`] the implementor is
/// also the console's byte sink (`embedded_io::Write`).
pub trait ConsoleDriver {
    /// Bring up the console with `cfg`.
    fn console_init(&mut self, cfg: &ConsoleConfig) -> Result<(), HalStatus>;
}
