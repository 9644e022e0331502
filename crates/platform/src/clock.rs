//! Clock identifiers, sources and the clock-controller seam.
//!
//! Every clock output of the HPM6360 is named by a [`ClockName`]. A clock is
//! driven by a [`ClockSource`] through an integer divider; the achieved
//! frequency is always read back from the controller rather than computed
//! from the request, because the controller may clamp or round.
//!
//! # PLL outputs after preset 2
//!
//! | Source      | Nominal       |
//! |-------------|---------------|
//! | `osc24m`    | 24 MHz        |
//! | `pll0_clk0` | 400 MHz       |
//! | `pll0_clk1` | 333.33 MHz    |
//! | `pll0_clk2` | 250 MHz       |
//! | `pll1_clk0` | 480 MHz       |
//! | `pll1_clk1` | 400 MHz       |
//! | `pll2_clk0` | 516.096 MHz   |
//! | `pll2_clk1` | 451.584 MHz   |

use core::fmt;

/// A frequency in hertz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hertz(pub u32);

impl Hertz {
    /// Zero hertz: what a gated or unsupported clock reads back as.
    pub const ZERO: Self = Self(0);

    /// Construct from hertz.
    pub const fn hz(hz: u32) -> Self {
        Self(hz)
    }

    /// Construct from kilohertz (saturating).
    pub const fn khz(khz: u32) -> Self {
        Self(khz.saturating_mul(1_000))
    }

    /// Construct from megahertz (saturating).
    pub const fn mhz(mhz: u32) -> Self {
        Self(mhz.saturating_mul(1_000_000))
    }

    /// Raw value in hertz.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Integer division by a clock divider. A zero divider yields zero.
    pub const fn div(self, divider: u32) -> Self {
        match self.0.checked_div(divider) {
            Some(v) => Self(v),
            None => Self::ZERO,
        }
    }
}

impl fmt::Display for Hertz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz", self.0)
    }
}

/// Root clock sources selectable by a clock node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// 24 MHz crystal oscillator. Also the PLL reference.
    Osc24m,
    /// PLL0 output 0.
    Pll0Clk0,
    /// PLL0 output 1.
    Pll0Clk1,
    /// PLL0 output 2.
    Pll0Clk2,
    /// PLL1 output 0.
    Pll1Clk0,
    /// PLL1 output 1.
    Pll1Clk1,
    /// PLL2 output 0 (audio family).
    Pll2Clk0,
    /// PLL2 output 1 (audio family).
    Pll2Clk1,
}

impl ClockSource {
    /// Every source, in controller mux order.
    pub const ALL: [Self; 8] = [
        Self::Osc24m,
        Self::Pll0Clk0,
        Self::Pll0Clk1,
        Self::Pll0Clk2,
        Self::Pll1Clk0,
        Self::Pll1Clk1,
        Self::Pll2Clk0,
        Self::Pll2Clk1,
    ];

    /// Output frequency once clock preset 2 has been applied.
    pub const fn nominal_hz(self) -> Hertz {
        match self {
            Self::Osc24m => Hertz(24_000_000),
            Self::Pll0Clk0 => Hertz(400_000_000),
            Self::Pll0Clk1 => Hertz(333_333_333),
            Self::Pll0Clk2 => Hertz(250_000_000),
            Self::Pll1Clk0 => Hertz(480_000_000),
            Self::Pll1Clk1 => Hertz(400_000_000),
            Self::Pll2Clk0 => Hertz(516_096_000),
            Self::Pll2Clk1 => Hertz(451_584_000),
        }
    }

    /// Vendor-style lowercase name (`pll0_clk0`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Osc24m => "osc24m",
            Self::Pll0Clk0 => "pll0_clk0",
            Self::Pll0Clk1 => "pll0_clk1",
            Self::Pll0Clk2 => "pll0_clk2",
            Self::Pll1Clk0 => "pll1_clk0",
            Self::Pll1Clk1 => "pll1_clk1",
            Self::Pll2Clk0 => "pll2_clk0",
            Self::Pll2Clk1 => "pll2_clk1",
        }
    }
}

/// ADC converter clock selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcClockSource {
    /// Analog clock node (`ana0`).
    Ana,
    /// AHB bus clock.
    Ahb,
}

/// DAC converter clock selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DacClockSource {
    /// Analog clock node (`ana3`).
    Ana,
    /// AHB bus clock.
    Ahb,
}

/// CPU behaviour on `wfi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CpuLpMode {
    /// Gate the CPU clock while waiting.
    GateCpuClock,
    /// Request system low-power mode.
    TriggerSystemLp,
    /// Keep the CPU clock running, so machine-timer interrupts still fire.
    UngateCpuClock,
}

macro_rules! clock_names {
    ($($variant:ident => $name:literal,)+) => {
        /// Clock outputs of the HPM6360 clock tree.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[repr(u8)]
        #[allow(missing_docs)]
        pub enum ClockName {
            $($variant,)+
        }

        impl ClockName {
            /// Every clock, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Number of clocks.
            pub const COUNT: usize = Self::ALL.len();

            /// Vendor-style lowercase name (`clock_uart0` → `"uart0"`).
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }
    };
}

clock_names! {
    Cpu0 => "cpu0",
    Mchtmr0 => "mchtmr0",
    Axi => "axi",
    Ahb => "ahb",
    Ahbp => "ahbp",
    Axic => "axic",
    Axis => "axis",
    Dram => "dram",
    Xpi0 => "xpi0",
    Xpi1 => "xpi1",
    Gptmr0 => "gptmr0",
    Gptmr1 => "gptmr1",
    Gptmr2 => "gptmr2",
    Gptmr3 => "gptmr3",
    Uart0 => "uart0",
    Uart1 => "uart1",
    Uart2 => "uart2",
    Uart3 => "uart3",
    Uart4 => "uart4",
    Uart5 => "uart5",
    Uart6 => "uart6",
    Uart7 => "uart7",
    I2c0 => "i2c0",
    I2c1 => "i2c1",
    I2c2 => "i2c2",
    I2c3 => "i2c3",
    Spi0 => "spi0",
    Spi1 => "spi1",
    Spi2 => "spi2",
    Spi3 => "spi3",
    Can0 => "can0",
    Can1 => "can1",
    Sdxc0 => "sdxc0",
    Ptpc => "ptpc",
    Ref0 => "ref0",
    Ref1 => "ref1",
    Watchdog0 => "watchdog0",
    Eth0 => "eth0",
    Ptp0 => "ptp0",
    Sdp => "sdp",
    Xdma => "xdma",
    Ram0 => "ram0",
    Usb0 => "usb0",
    Kman => "kman",
    Gpio => "gpio",
    Mbx0 => "mbx0",
    Hdma => "hdma",
    Rng => "rng",
    Mot0 => "mot0",
    Mot1 => "mot1",
    Acmp => "acmp",
    Dao => "dao",
    Msyn => "msyn",
    Lmm0 => "lmm0",
    Pdm => "pdm",
    Adc0 => "adc0",
    Adc1 => "adc1",
    Adc2 => "adc2",
    Dac0 => "dac0",
    I2s0 => "i2s0",
    I2s1 => "i2s1",
    Ffa0 => "ffa0",
    Tsns => "tsns",
    Ana0 => "ana0",
    Ana1 => "ana1",
    Ana2 => "ana2",
    Ana3 => "ana3",
}

impl ClockName {
    /// Position in [`ClockName::ALL`]; usable as a dense table index.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Clock controller seam (`hpm_clock_drv`).
pub trait ClockControl {
    /// Achieved output frequency of `clock`.
    fn frequency(&self, clock: ClockName) -> Hertz;

    /// Select `source` and `divider` for `clock`.
    fn set_source_divider(&mut self, clock: ClockName, source: ClockSource, divider: u32);

    /// Select the converter clock of an ADC.
    fn set_adc_source(&mut self, clock: ClockName, source: AdcClockSource);

    /// Select the converter clock of a DAC.
    fn set_dac_source(&mut self, clock: ClockName, source: DacClockSource);

    /// Add `clock` to clock group `group`.
    fn add_to_group(&mut self, clock: ClockName, group: u8);

    /// Let CPU `cpu` control clock group `group`.
    fn connect_group_to_cpu(&mut self, group: u8, cpu: u8);

    /// Refresh the cached core clock after changing `cpu0`.
    fn update_core_clock(&mut self);

    /// Busy-wait for `us` microseconds using the core clock.
    fn cpu_delay_us(&mut self, us: u32);
}

/// System control and power-configuration seam (`hpm_sysctl_drv`, `hpm_pcfg_drv`).
pub trait SystemControl {
    /// Apply a PLL frequency preset.
    fn set_clock_preset(&mut self, preset: u8);

    /// Program the crystal oscillator ramp-up time in oscillator cycles.
    fn xtal_set_rampup_time(&mut self, cycles: u32);

    /// Choose what CPU `core` does with its clock on `wfi`.
    fn set_cpu_lp_mode(&mut self, core: u8, mode: CpuLpMode);

    /// Set the core DC-DC regulator output.
    fn dcdc_set_voltage(&mut self, millivolts: u16);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_index_matches_all_position() {
        for (i, c) in ClockName::ALL.iter().enumerate() {
            assert_eq!(c.index(), i, "{} out of place", c.as_str());
        }
    }

    #[test]
    fn test_clock_names_are_unique() {
        for (i, a) in ClockName::ALL.iter().enumerate() {
            for b in ClockName::ALL.iter().skip(i + 1) {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }

    #[test]
    fn test_hertz_div_by_zero_is_zero() {
        assert_eq!(Hertz::mhz(400).div(0), Hertz::ZERO);
        assert_eq!(Hertz::mhz(400).div(5), Hertz::mhz(80));
    }

    #[test]
    fn test_hertz_display() {
        assert_eq!(Hertz::mhz(24).to_string(), "24000000Hz");
    }

    #[test]
    fn test_pll_nominals() {
        assert_eq!(ClockSource::Pll1Clk0.nominal_hz(), Hertz::mhz(480));
        assert_eq!(ClockSource::Pll0Clk2.nominal_hz().div(5), Hertz::mhz(50));
    }
}
