//! External SDRAM bring-up.
//!
//! Sequence: SDRAM pins, DRAM clock, controller init with the DQS strobe
//! looped back internally, then the device configuration. A structurally
//! bad table is rejected before the first register write. Timings are then
//! converted to cycles at the DRAM clock actually achieved, and a table
//! that does not fit the controller at that clock is rejected before the
//! controller is touched.

use hpm_platform::sdram::DqsMode;
use hpm_platform::{BoardError, ClockControl, DramControl, Hertz, PinMux, SdramConfig};

use crate::{clocks, pins};

/// Bring up the board SDRAM (32 MiB at `0x4000_0000`).
///
/// Returns the DRAM controller clock.
pub fn init_ext_ram<S: PinMux + ClockControl + DramControl>(soc: &mut S) -> Result<Hertz, BoardError> {
    init_ext_ram_with(soc, &SdramConfig::board())
}

/// Bring up the SDRAM with an explicit device configuration.
pub fn init_ext_ram_with<S: PinMux + ClockControl + DramControl>(
    soc: &mut S,
    sdram: &SdramConfig,
) -> Result<Hertz, BoardError> {
    sdram.validate()?;

    pins::init_sdram_pins(soc);
    let clk = clocks::init_dram_clock(soc);
    sdram.validate_at(clk).inspect_err(|_| {
        error!("sdram timing does not fit at {} Hz", clk.raw());
    })?;

    let mut config = soc.default_config();
    config.dqs = DqsMode::Internal;
    DramControl::init(soc, &config);

    soc.config_sdram(clk, sdram).map_err(|status| {
        error!("dram controller rejected sdram config: status {}", status.0);
        BoardError::Dram(status.0)
    })?;

    info!(
        "sdram: {} bytes at {}, {} Hz",
        sdram.size_in_byte,
        sdram.base_address,
        clk.raw()
    );
    Ok(clk)
}
