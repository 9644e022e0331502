//! Build configuration of the board.
//!
//! The compile-time switches of the board (console presence, boot prints,
//! external RAM, image type) are resolved once into a [`BoardConfig`], and
//! bring-up branches on its fields rather than on `cfg!` scattered through
//! the routines. Tests build whichever configuration they need directly.

use hpm_platform::config::{BOARD_CONSOLE_BAUDRATE, BOARD_CONSOLE_UART};
use hpm_platform::Uart;

/// Debug console selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleSetup {
    /// Console on a UART.
    Uart {
        /// Console UART instance.
        uart: Uart,
        /// Line rate.
        baudrate: u32,
    },
    /// No console. Bring-up refuses to continue without one.
    Absent,
}

impl ConsoleSetup {
    /// The board console: UART0 at 115200.
    pub const BOARD_UART: Self = Self::Uart {
        uart: BOARD_CONSOLE_UART,
        baudrate: BOARD_CONSOLE_BAUDRATE,
    };
}

/// What [`crate::boot::board_init`] does beyond the mandatory steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct BoardConfig {
    /// Debug console.
    pub console: ConsoleSetup,
    /// Print the clock summary once the clocks are up.
    pub show_clock_summary: bool,
    /// Print the banner.
    pub show_banner: bool,
    /// Bring up the external SDRAM.
    pub ext_ram: bool,
    /// Image executes in place from the NOR flash.
    pub flash_xip: bool,
    /// Image carries a UF2 signature.
    pub flash_uf2: bool,
}

impl Default for BoardConfig {
    /// UART console, no optional steps.
    fn default() -> Self {
        Self {
            console: ConsoleSetup::BOARD_UART,
            show_clock_summary: false,
            show_banner: false,
            ext_ram: false,
            flash_xip: false,
            flash_uf2: false,
        }
    }
}

impl BoardConfig {
    /// Configuration selected by the cargo features of this build.
    pub const fn from_features() -> Self {
        Self {
            console: if cfg!(feature = "console-uart") {
                ConsoleSetup::BOARD_UART
            } else {
                ConsoleSetup::Absent
            },
            show_clock_summary: cfg!(feature = "show-clock"),
            show_banner: cfg!(feature = "show-banner"),
            ext_ram: cfg!(feature = "ext-ram"),
            flash_xip: cfg!(feature = "flash-xip"),
            flash_uf2: cfg!(feature = "flash-uf2"),
        }
    }

    /// Short name of the boot image type.
    pub const fn image_kind(&self) -> &'static str {
        match (self.flash_xip, self.flash_uf2) {
            (true, true) => "flash-xip+uf2",
            (true, false) => "flash-xip",
            (false, true) => "uf2",
            (false, false) => "ram",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_uart_console() {
        let cfg = BoardConfig::default();
        assert_eq!(
            cfg.console,
            ConsoleSetup::Uart { uart: Uart::Uart0, baudrate: 115_200 }
        );
        assert!(!cfg.show_banner);
        assert_eq!(cfg.image_kind(), "ram");
    }

    #[test]
    fn test_from_features_tracks_console_feature() {
        let cfg = BoardConfig::from_features();
        assert_eq!(
            matches!(cfg.console, ConsoleSetup::Uart { .. }),
            cfg!(feature = "console-uart")
        );
        assert_eq!(cfg.ext_ram, cfg!(feature = "ext-ram"));
    }
}
