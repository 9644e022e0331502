//! Board constants for the HPM6300EVK.
//!
//! Every board-specific number (console, LED, chip selects, SDRAM geometry,
//! callback timer) is defined here, and all routines refer to these
//! constants rather than hardcoding values.

use crate::gpio::{GpioPin, PinLevel};
use crate::peripheral::{Gptmr, Uart};
use crate::timer::TimerChannel;

/// Board name, as printed in logs.
pub const BOARD_NAME: &str = "hpm6300evk";

/// Crate version (synchronized with Cargo.toml).
pub const BSP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ── Console ─────────────────────────────────────────────────────────────────

/// Console UART.
pub const BOARD_CONSOLE_UART: Uart = Uart::Uart0;

/// Console line rate.
pub const BOARD_CONSOLE_BAUDRATE: u32 = 115_200;

// ── GPIO ────────────────────────────────────────────────────────────────────

/// User LED (PA07).
pub const BOARD_LED_PIN: GpioPin = GpioPin::from_pad(7);

/// Level that lights the LED.
pub const BOARD_LED_ON_LEVEL: PinLevel = PinLevel::High;

/// SPI chip select pad when CS is driven as GPIO (PC18).
pub const BOARD_SPI_CS_PAD: u32 = 82;

/// Level that selects the SPI device.
pub const BOARD_SPI_CS_ACTIVE_LEVEL: PinLevel = PinLevel::Low;

/// USB0 ID pin (PA31).
pub const BOARD_USB0_ID_PIN: GpioPin = GpioPin::from_pad(31);

// ── Board timer ─────────────────────────────────────────────────────────────

/// Timer backing `timer_create`.
pub const BOARD_CALLBACK_TIMER: Gptmr = Gptmr::Gptmr3;

/// Channel of [`BOARD_CALLBACK_TIMER`] used for the callback.
pub const BOARD_CALLBACK_TIMER_CH: TimerChannel = TimerChannel::Ch1;

/// Interrupt priority of the callback timer.
pub const BOARD_CALLBACK_TIMER_PRIORITY: u8 = 1;

// ── SDRAM (16-bit bus) ──────────────────────────────────────────────────────

/// SDRAM window in the CPU address map.
pub const BOARD_SDRAM_ADDRESS: u32 = 0x4000_0000;

/// SDRAM size: 32 MiB.
pub const BOARD_SDRAM_SIZE: u32 = 0x0200_0000;

/// Chip select the SDRAM hangs off.
pub const BOARD_SDRAM_CS: u8 = 0;

/// SDRAM data bus width in bytes.
pub const BOARD_SDRAM_DATA_WIDTH_IN_BYTE: u8 = 2;

/// Rows refreshed per refresh period.
pub const BOARD_SDRAM_REFRESH_COUNT: u32 = 8192;

/// Refresh period in milliseconds.
pub const BOARD_SDRAM_REFRESH_IN_MS: u32 = 64;

// ── Boot image ──────────────────────────────────────────────────────────────

/// Family ID written to `.uf2_signature` for UF2 bootloaders.
pub const BOARD_UF2_SIGNATURE: u32 = 0x0A4D_5048;
