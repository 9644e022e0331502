//! Per-peripheral clock routines.
//!
//! Each routine programs the functional clock of one peripheral instance and
//! returns the frequency read back from the clock controller. Only routines
//! whose instance type is wider than the set the board clocks (UART, SPI)
//! are fallible: those reject the extra instances with
//! [`BoardError::UnsupportedInstance`] before any register is touched.

use hpm_platform::clock_config::{
    ADC_ANA_CLOCK, BOARD_CLOCK_GROUP_ID, CAN_CLOCK, DAC_ANA_CLOCK, DRAM_CLOCK, ENET_PTP_CLOCK,
    ENET_RMII_CLOCK, SPI_CLOCK, UART_CLOCK,
};
use hpm_platform::{
    Adc, AdcClockSource, BoardError, Can, ClockControl, ClockName, Dac, DacClockSource, Enet,
    Hertz, Spi, Uart,
};

/// Clock UART0..=UART2 from `osc24m / 1` (24 MHz).
pub fn init_uart_clock<C: ClockControl>(soc: &mut C, uart: Uart) -> Result<Hertz, BoardError> {
    match uart {
        Uart::Uart0 | Uart::Uart1 | Uart::Uart2 => {
            soc.set_source_divider(uart.clock(), UART_CLOCK.source, UART_CLOCK.divider);
            Ok(soc.frequency(uart.clock()))
        }
        _ => Err(BoardError::UnsupportedInstance),
    }
}

/// Clock SPI3 from `osc24m / 1`. Only SPI3 reaches the board headers.
pub fn init_spi_clock<C: ClockControl>(soc: &mut C, spi: Spi) -> Result<Hertz, BoardError> {
    match spi {
        Spi::Spi3 => {
            soc.add_to_group(spi.clock(), BOARD_CLOCK_GROUP_ID);
            soc.set_source_divider(spi.clock(), SPI_CLOCK.source, SPI_CLOCK.divider);
            Ok(soc.frequency(spi.clock()))
        }
        _ => Err(BoardError::UnsupportedInstance),
    }
}

/// Clock a CAN controller at `pll0_clk0 / 5` (80 MHz).
pub fn init_can_clock<C: ClockControl>(soc: &mut C, can: Can) -> Hertz {
    soc.set_source_divider(can.clock(), CAN_CLOCK.source, CAN_CLOCK.divider);
    soc.frequency(can.clock())
}

/// Feed an ADC16 from the analog clock `ana0 = pll1_clk1 / 2` (200 MHz).
///
/// `ana0` is shared by all three converters.
pub fn init_adc16_clock<C: ClockControl>(soc: &mut C, adc: Adc) -> Hertz {
    soc.set_adc_source(adc.clock(), AdcClockSource::Ana);
    soc.set_source_divider(ClockName::Ana0, ADC_ANA_CLOCK.source, ADC_ANA_CLOCK.divider);
    soc.frequency(adc.clock())
}

/// Clock the DAC from the AHB, or from `ana3 = pll0_clk1 / 2` (~166 MHz).
pub fn init_dac_clock<C: ClockControl>(soc: &mut C, dac: Dac, source: DacClockSource) -> Hertz {
    match source {
        DacClockSource::Ahb => soc.set_dac_source(dac.clock(), DacClockSource::Ahb),
        DacClockSource::Ana => {
            soc.set_dac_source(dac.clock(), DacClockSource::Ana);
            soc.set_source_divider(ClockName::Ana3, DAC_ANA_CLOCK.source, DAC_ANA_CLOCK.divider);
        }
    }
    soc.frequency(dac.clock())
}

/// Clock the DRAM controller at `pll0_clk1 / 2` (~166 MHz).
pub fn init_dram_clock<C: ClockControl>(soc: &mut C) -> Hertz {
    soc.add_to_group(ClockName::Dram, BOARD_CLOCK_GROUP_ID);
    soc.set_source_divider(ClockName::Dram, DRAM_CLOCK.source, DRAM_CLOCK.divider);
    soc.frequency(ClockName::Dram)
}

/// Clock the PTP timer of the MAC at `pll0_clk0 / 4` (100 MHz).
pub fn init_enet_ptp_clock<C: ClockControl>(soc: &mut C, enet: Enet) -> Hertz {
    let ptp = match enet {
        Enet::Enet0 => ClockName::Ptp0,
    };
    soc.set_source_divider(ptp, ENET_PTP_CLOCK.source, ENET_PTP_CLOCK.divider);
    soc.frequency(ptp)
}

/// Drive the 50 MHz RMII reference clock from `pll0_clk2 / 5`.
///
/// With `internal == false` the PHY supplies the reference clock and
/// nothing is written.
pub fn init_enet_rmii_reference_clock<C: ClockControl>(
    soc: &mut C,
    enet: Enet,
    internal: bool,
) {
    if !internal {
        return;
    }
    soc.set_source_divider(enet.clock(), ENET_RMII_CLOCK.source, ENET_RMII_CLOCK.divider);
    debug!("rmii ref clock {} Hz", soc.frequency(enet.clock()).raw());
}

/// Current DAO clock. The board leaves it at its default.
pub fn init_dao_clock<C: ClockControl>(soc: &C) -> Hertz {
    soc.frequency(ClockName::Dao)
}

/// Current PDM clock. The board leaves it at its default.
pub fn init_pdm_clock<C: ClockControl>(soc: &C) -> Hertz {
    soc.frequency(ClockName::Pdm)
}

/// I2S clocking needs an audio PLL this board does not configure.
pub fn init_i2s_clock() -> Result<Hertz, BoardError> {
    Err(BoardError::NotSupported)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hpm_platform::mocks::SimSoc;
    use hpm_platform::ClockSource;

    #[test]
    fn test_can_runs_at_80mhz() {
        let mut soc = SimSoc::new();
        assert_eq!(init_can_clock(&mut soc, Can::Can1), Hertz::mhz(80));
        assert_eq!(soc.clock_setting(ClockName::Can1), (ClockSource::Pll0Clk0, 5));
    }

    #[test]
    fn test_uart3_rejected_without_writes() {
        let mut soc = SimSoc::new();
        assert_eq!(init_uart_clock(&mut soc, Uart::Uart3), Err(BoardError::UnsupportedInstance));
        assert_eq!(soc.write_count(), 0);
    }

    #[test]
    fn test_spi0_rejected_spi3_grouped() {
        let mut soc = SimSoc::new();
        assert_eq!(init_spi_clock(&mut soc, Spi::Spi0), Err(BoardError::UnsupportedInstance));
        assert_eq!(soc.write_count(), 0);
        assert_eq!(init_spi_clock(&mut soc, Spi::Spi3), Ok(Hertz::mhz(24)));
        assert_eq!(soc.clock_group(ClockName::Spi3), Some(0));
    }

    #[test]
    fn test_dac_sources() {
        let mut soc = SimSoc::new();
        // AHB at reset runs from osc24m
        assert_eq!(init_dac_clock(&mut soc, Dac::Dac0, DacClockSource::Ahb), Hertz::mhz(24));
        let ana = init_dac_clock(&mut soc, Dac::Dac0, DacClockSource::Ana);
        assert_eq!(ana, Hertz(333_333_333 / 2));
    }

    #[test]
    fn test_rmii_external_writes_nothing() {
        let mut soc = SimSoc::new();
        init_enet_rmii_reference_clock(&mut soc, Enet::Enet0, false);
        assert_eq!(soc.write_count(), 0);
        init_enet_rmii_reference_clock(&mut soc, Enet::Enet0, true);
        assert_eq!(soc.frequency(ClockName::Eth0), Hertz::mhz(50));
    }

    #[test]
    fn test_ptp_runs_at_100mhz() {
        let mut soc = SimSoc::new();
        assert_eq!(init_enet_ptp_clock(&mut soc, Enet::Enet0), Hertz::mhz(100));
        assert_eq!(soc.clock_setting(ClockName::Ptp0), (ClockSource::Pll0Clk0, 4));
    }

    #[test]
    fn test_i2s_not_supported() {
        assert_eq!(init_i2s_clock(), Err(BoardError::NotSupported));
    }
}
