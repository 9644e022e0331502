//! HPM6300EVK board support
//!
//! Board bring-up and the per-peripheral board routines for the HPM6300EVK
//! evaluation board (HPMicro HPM6360, single RV32 core).
//!
//! # Architecture
//!
//! ```text
//! Application (main.rs)
//!         ↓
//! Board routines (boot, clocks, pins, gpio, sd, timer, ext_ram)
//!         ↓
//! Driver seams (hpm_platform traits)
//!         ↓
//! Vendor drivers + CSRs (hardware module) | SimSoc (host tests)
//! ```
//!
//! Every routine is generic over the narrowest set of seams it touches, so
//! the same code runs against the silicon and against
//! [`hpm_platform::mocks::SimSoc`].
//!
//! # Features
//!
//! - `hardware` - Build for the HPM6360 (riscv CSRs, defmt over RTT)
//! - `console-uart` (default) - UART0 debug console
//! - `show-clock` / `show-banner` - print the clock summary / banner at boot
//! - `ext-ram` - bring up the SDRAM during boot
//! - `flash-xip` / `flash-uf2` - emit the boot-image header blocks
//! - `tracing` - route logs to `tracing` on the host
//!
//! # Example
//!
//! ```
//! use hpm6300evk::boot::board_init;
//! use hpm6300evk::config::BoardConfig;
//! use hpm_platform::mocks::SimSoc;
//! use hpm_platform::{ClockControl, ClockName, Hertz, NoncacheableRegion};
//!
//! let mut soc = SimSoc::new();
//! let region = NoncacheableRegion::new(0x0108_0000, 0x0110_0000);
//! let report = board_init(&mut soc, &BoardConfig::default(), region).unwrap();
//! assert_eq!(report.cpu0, Hertz::mhz(480));
//! assert_eq!(soc.frequency(ClockName::Ahb), Hertz::mhz(200));
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]

// Must come first: the logging macros are used by every module below.
#[macro_use]
mod fmt;

pub mod boot;
pub mod clocks;
pub mod config;
pub mod delay;
pub mod ext_ram;
pub mod gpio;
pub mod image;
pub mod pins;
pub mod sd;
pub mod timer;

#[cfg(feature = "hardware")]
pub mod hardware;

pub use boot::{board_init, BoardSoc, BootReport};
pub use config::{BoardConfig, ConsoleSetup};
pub use delay::BoardDelay;
pub use gpio::Led;
