//! Board platform layer for the HPM6300EVK (HPMicro HPM6360, RV32).
//!
//! This crate holds everything about the board that can be computed or
//! checked without touching silicon: register-value encodings, the clock
//! plan, peripheral-instance tables, and the trait seams behind which the
//! vendor peripheral drivers sit.
//!
//! # Architecture Layers
//!
//! ```text
//! Board bring-up sequencer (hpm6300evk crate)
//!         ↓
//! Platform layer (this crate: encodings, tables, driver seams)
//!         ↓
//! Vendor drivers (clock, sysctl, pcfg, gpio, gptmr, sdxc, dram, console)
//! ```
//!
//! ## Driver seams
//! - [`ClockControl`] / [`SystemControl`] - clock tree and power/sysctl
//! - [`PinMux`] - pin-mux tables per peripheral instance
//! - [`GpioControl`] - the GPIO controller
//! - [`PmpControl`] - PMP/PMA CSR programming
//! - [`SdxcControl`], [`DramControl`], [`GptmrControl`], [`InterruptControl`]
//! - [`ConsoleDriver`] - debug console
//!
//! # Features
//!
//! - `std`: Expose the simulated SoC ([`mocks::SimSoc`]) to dependent crates
//! - `hardware`: Physical hardware target marker
//! - `defmt`: Enable `defmt::Format` derives
//!
//! # Example
//!
//! ```
//! use hpm_platform::pmp::{napot_addr, NoncacheableRegion, board_pmp_entries};
//!
//! assert_eq!(napot_addr(0x0000_0000, 0x8000_0000), 0x0FFF_FFFF);
//! let region = NoncacheableRegion::new(0x0108_0000, 0x0110_0000);
//! let entries = board_pmp_entries(region).unwrap().unwrap();
//! assert_eq!(entries.len(), 3);
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this board crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // register accessors: callers decide
#![allow(clippy::match_same_arms)] // instance tables read better one arm per instance
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod clock;
pub mod clock_config;
pub mod config;
pub mod console;
pub mod error;
pub mod flash_config;
pub mod gpio;
pub mod interrupt;
pub mod peripheral;
pub mod pmp;
pub mod sdram;
pub mod sdxc;
pub mod timer;

pub mod mocks;

pub use clock::{
    AdcClockSource, ClockControl, ClockName, ClockSource, CpuLpMode, DacClockSource, Hertz,
    SystemControl,
};
pub use console::{ConsoleConfig, ConsoleDriver, ConsoleType};
pub use error::{BoardError, HalStatus};
pub use gpio::{GpioControl, GpioPin, PinLevel};
pub use interrupt::{InterruptControl, Irq};
pub use peripheral::{Adc, Can, Dac, Enet, Gptmr, I2c, PinGroup, PinMux, Sdxc, Spi, Uart};
pub use pmp::{NoncacheableRegion, PmpControl, PmpEntry, PmpError};
pub use sdram::{DramConfig, DramControl, SdramConfig, SdramConfigError};
pub use sdxc::SdxcControl;
pub use timer::{ChannelConfig, GptmrControl, TimerChannel, TimerDispatcher};
