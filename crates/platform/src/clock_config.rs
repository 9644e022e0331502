//! Board clock plan for the HPM6300EVK.
//!
//! Encodes which clock node runs from which source and divider, plus the
//! set of clocks placed in clock group 0 at boot. The bring-up sequencer
//! applies these values; tests check them against divider arithmetic.
//!
//! # Background
//!
//! Out of reset `cpu0` runs straight from the 24 MHz PLL reference. The
//! PLLs only reach the frequencies below after sysctl preset 2 has been
//! applied, and that preset must be applied once: re-applying it while the
//! CPU already runs from a PLL glitches the core clock. The configurator
//! uses `cpu0 == 24 MHz` as the "not yet applied" test.

use crate::clock::{ClockName, ClockSource, Hertz};

/// A source/divider pair for one clock node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockSetting {
    /// Root source.
    pub source: ClockSource,
    /// Integer divider (1-based).
    pub divider: u32,
}

impl ClockSetting {
    /// Build a setting.
    pub const fn new(source: ClockSource, divider: u32) -> Self {
        Self { source, divider }
    }

    /// Frequency this setting yields with the nominal PLL outputs.
    pub const fn nominal_hz(&self) -> Hertz {
        self.source.nominal_hz().div(self.divider)
    }
}

/// A board clock node and its intended setting, with the reason it is set.
pub struct BoardClockSetting {
    /// Consumer of the clock (e.g. `"CAN0/1"`).
    pub peripheral: &'static str,
    /// Clock node programmed.
    pub clock: ClockName,
    /// Source and divider written.
    pub setting: ClockSetting,
    /// Why this particular frequency.
    pub note: &'static str,
}

/// PLL reference frequency; `cpu0` reads this before the preset is applied.
pub const PLL_REFCLK_HZ: Hertz = Hertz(24_000_000);

/// Crystal ramp-up time in oscillator cycles (~9 ms at 32 kHz sampling).
pub const XTAL_RAMPUP_CYCLES: u32 = 288_000; // 32 * 1000 * 9

/// Sysctl PLL preset selected at boot.
pub const CLOCK_PRESET: u8 = 2;

/// Clock group used for every board clock.
pub const BOARD_CLOCK_GROUP_ID: u8 = 0;

/// Hart that runs the board.
pub const BOARD_RUNNING_CORE: u8 = 0;

/// Core DC-DC voltage set before the clock tree is raised.
pub const BOARD_DCDC_MILLIVOLTS: u16 = 1100;

/// `cpu0` ← `pll1_clk0 / 1` (480 MHz).
pub const CPU0_CLOCK: ClockSetting = ClockSetting::new(ClockSource::Pll1Clk0, 1);
/// `ahb` ← `pll1_clk1 / 2` (200 MHz).
pub const AHB_CLOCK: ClockSetting = ClockSetting::new(ClockSource::Pll1Clk1, 2);
/// UART and console ← `osc24m / 1`.
pub const UART_CLOCK: ClockSetting = ClockSetting::new(ClockSource::Osc24m, 1);
/// SPI3 ← `osc24m / 1`.
pub const SPI_CLOCK: ClockSetting = ClockSetting::new(ClockSource::Osc24m, 1);
/// CAN0/1 ← `pll0_clk0 / 5` (80 MHz).
pub const CAN_CLOCK: ClockSetting = ClockSetting::new(ClockSource::Pll0Clk0, 5);
/// `dram` ← `pll0_clk1 / 2` (~166 MHz).
pub const DRAM_CLOCK: ClockSetting = ClockSetting::new(ClockSource::Pll0Clk1, 2);
/// `ana0` (ADC analog clock) ← `pll1_clk1 / 2` (200 MHz).
pub const ADC_ANA_CLOCK: ClockSetting = ClockSetting::new(ClockSource::Pll1Clk1, 2);
/// `ana3` (DAC analog clock) ← `pll0_clk1 / 2` (~166 MHz).
pub const DAC_ANA_CLOCK: ClockSetting = ClockSetting::new(ClockSource::Pll0Clk1, 2);
/// `ptp0` ← `pll0_clk0 / 4` (100 MHz).
pub const ENET_PTP_CLOCK: ClockSetting = ClockSetting::new(ClockSource::Pll0Clk0, 4);
/// `eth0` ← `pll0_clk2 / 5` (50 MHz RMII reference).
pub const ENET_RMII_CLOCK: ClockSetting = ClockSetting::new(ClockSource::Pll0Clk2, 5);
/// `sdxc0` ← `pll0_clk0 / 2` (200 MHz card-clock source).
pub const SDXC_CLOCK: ClockSetting = ClockSetting::new(ClockSource::Pll0Clk0, 2);

/// Every clock placed in group 0 by the configurator, in programming order.
pub const BOARD_CLOCK_GROUP: [ClockName; 56] = [
    ClockName::Cpu0,
    ClockName::Ahbp,
    ClockName::Axic,
    ClockName::Axis,
    ClockName::Mchtmr0,
    ClockName::Dram,
    ClockName::Xpi0,
    ClockName::Xpi1,
    ClockName::Gptmr0,
    ClockName::Gptmr1,
    ClockName::Gptmr2,
    ClockName::Gptmr3,
    ClockName::Uart0,
    ClockName::Uart1,
    ClockName::Uart2,
    ClockName::Uart3,
    ClockName::I2c0,
    ClockName::I2c1,
    ClockName::I2c2,
    ClockName::I2c3,
    ClockName::Spi0,
    ClockName::Spi1,
    ClockName::Spi2,
    ClockName::Spi3,
    ClockName::Can0,
    ClockName::Can1,
    ClockName::Sdxc0,
    ClockName::Ptpc,
    ClockName::Ref0,
    ClockName::Ref1,
    ClockName::Watchdog0,
    ClockName::Eth0,
    ClockName::Sdp,
    ClockName::Xdma,
    ClockName::Ram0,
    ClockName::Usb0,
    ClockName::Kman,
    ClockName::Gpio,
    ClockName::Mbx0,
    ClockName::Hdma,
    ClockName::Rng,
    ClockName::Mot0,
    ClockName::Mot1,
    ClockName::Acmp,
    ClockName::Dao,
    ClockName::Msyn,
    ClockName::Lmm0,
    ClockName::Pdm,
    ClockName::Adc0,
    ClockName::Adc1,
    ClockName::Adc2,
    ClockName::Dac0,
    ClockName::I2s0,
    ClockName::I2s1,
    ClockName::Ffa0,
    ClockName::Tsns,
];

/// Clocks printed by the boot clock summary, in print order.
pub const CLOCK_SUMMARY: [ClockName; 7] = [
    ClockName::Cpu0,
    ClockName::Axi,
    ClockName::Ahb,
    ClockName::Mchtmr0,
    ClockName::Xpi0,
    ClockName::Xpi1,
    ClockName::Dram,
];

/// The board clock plan as one table, for review and boot-time logging.
pub const BOARD_CLOCK_PLAN: &[BoardClockSetting] = &[
    BoardClockSetting {
        peripheral: "CPU0",
        clock: ClockName::Cpu0,
        setting: CPU0_CLOCK,
        note: "480 MHz core; requires preset 2 so that pll1_clk0 is running",
    },
    BoardClockSetting {
        peripheral: "AHB",
        clock: ClockName::Ahb,
        setting: AHB_CLOCK,
        note: "200 MHz bus; set after the console so early output survives",
    },
    BoardClockSetting {
        peripheral: "CAN0/1",
        clock: ClockName::Can0,
        setting: CAN_CLOCK,
        note: "80 MHz divides evenly into every standard CAN bit rate",
    },
    BoardClockSetting {
        peripheral: "DRAM",
        clock: ClockName::Dram,
        setting: DRAM_CLOCK,
        note: "~166 MHz SDRAM clock; timing is programmed in ns against the read-back rate",
    },
    BoardClockSetting {
        peripheral: "ADC0-2",
        clock: ClockName::Ana0,
        setting: ADC_ANA_CLOCK,
        note: "ADC16 converter clock through the ana0 node, 200 MHz maximum",
    },
    BoardClockSetting {
        peripheral: "DAC",
        clock: ClockName::Ana3,
        setting: DAC_ANA_CLOCK,
        note: "used only when the DAC is not clocked from AHB",
    },
    BoardClockSetting {
        peripheral: "ENET0 PTP",
        clock: ClockName::Ptp0,
        setting: ENET_PTP_CLOCK,
        note: "100 MHz PTP timestamp clock",
    },
    BoardClockSetting {
        peripheral: "ENET0 RMII",
        clock: ClockName::Eth0,
        setting: ENET_RMII_CLOCK,
        note: "50 MHz RMII reference, driven only when the PHY takes its clock from the SoC",
    },
    BoardClockSetting {
        peripheral: "SDXC0",
        clock: ClockName::Sdxc0,
        setting: SDXC_CLOCK,
        note: "200 MHz card clock source; the SDXC divider picks the bus rate",
    },
];

// ─── Tests ───────────────────────────────────────────────────────────────────
