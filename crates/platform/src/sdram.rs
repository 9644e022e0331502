//! External SDRAM configuration for the HPM6360 DRAM controller.
//!
//! The vendor DRAM driver takes its timing in nanoseconds and converts to
//! controller cycles against the DRAM clock it is handed, so the board
//! passes the *read-back* DRAM clock, not the nominal one.
//!
//! # Memory layout
//!
//! ```text
//! 0x4000_0000  ┌─────────────────────┐
//!              │  SDRAM, CS0, 32 MiB │  16-bit bus, 4 banks, 9 column bits
//! 0x4200_0000  └─────────────────────┘
//! ```
//!
//! # Timing (ns)
//!
//! | Parameter               | Value |
//! |-------------------------|-------|
//! | tRP  precharge → act    | 18    |
//! | tRCD act → r/w          | 18    |
//! | tRFC refresh recover    | 70    |
//! | tWR  write recover      | 12    |
//! | CKE off                 | 42    |
//! | tRAS act → precharge    | 42    |
//! | tXSR self-refresh exit  | 66    |
//! | refresh → refresh       | 66    |
//! | tRRD act → act          | 12    |
//! | idle timeout            | 6     |

use thiserror_no_std::Error;

use crate::clock::Hertz;
use crate::config::{
    BOARD_SDRAM_ADDRESS, BOARD_SDRAM_CS, BOARD_SDRAM_DATA_WIDTH_IN_BYTE, BOARD_SDRAM_REFRESH_COUNT,
    BOARD_SDRAM_REFRESH_IN_MS, BOARD_SDRAM_SIZE,
};
use crate::error::HalStatus;

/// Number of internal banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SdramBankNum {
    /// Two banks.
    Two,
    /// Four banks.
    Four,
}

/// SDRAM data bus width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SdramPortSize {
    /// 8-bit bus.
    Bits8,
    /// 16-bit bus.
    Bits16,
    /// 32-bit bus.
    Bits32,
}

impl SdramPortSize {
    /// Width in bytes.
    pub const fn bytes(self) -> u8 {
        match self {
            Self::Bits8 => 1,
            Self::Bits16 => 2,
            Self::Bits32 => 4,
        }
    }
}

/// Column address width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SdramColumnAddr {
    /// 8 column bits.
    Bits8,
    /// 9 column bits.
    Bits9,
    /// 10 column bits.
    Bits10,
    /// 11 column bits.
    Bits11,
    /// 12 column bits.
    Bits12,
}

/// CAS latency in clock cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SdramCasLatency {
    /// CL1.
    Cl1,
    /// CL2.
    Cl2,
    /// CL3.
    Cl3,
}

/// Where the controller samples read data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DqsMode {
    /// Internal loopback of the DQS strobe.
    Internal,
    /// DQS taken from the pad.
    FromPad,
}

/// DRAM controller configuration (`dram_config_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DramConfig {
    /// DQS source.
    pub dqs: DqsMode,
    /// Command timeout in controller cycles.
    pub cmd_timeout: u8,
    /// AXI bus timeout in controller cycles.
    pub bus_timeout: u8,
}

/// SDRAM timing in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SdramTimingNs {
    /// tRP: precharge to activate.
    pub t_rp: u8,
    /// tRCD: activate to read/write.
    pub t_rcd: u8,
    /// tRFC: refresh recovery.
    pub refresh_recover: u8,
    /// tWR: write recovery.
    pub t_wr: u8,
    /// CKE low time.
    pub cke_off: u8,
    /// tRAS: activate to precharge.
    pub t_ras: u8,
    /// tXSR: self-refresh exit.
    pub t_xsr: u8,
    /// Refresh to refresh.
    pub refresh_to_refresh: u8,
    /// tRRD: activate to activate, different bank.
    pub t_rrd: u8,
    /// Idle time before the controller precharges.
    pub idle_timeout: u8,
}

/// Largest cycle count each timing field of the controller holds, in
/// [`SdramTimingNs::fields`] order (4-bit, 5-bit, 3-bit and 8-bit fields).
pub const TIMING_MAX_CYCLES: [u32; 10] = [15, 15, 31, 7, 15, 15, 255, 255, 255, 255];

impl SdramTimingNs {
    /// Every field with its name, in register order.
    pub fn fields(&self) -> [(&'static str, u8); 10] {
        [
            ("t_rp", self.t_rp),
            ("t_rcd", self.t_rcd),
            ("refresh_recover", self.refresh_recover),
            ("t_wr", self.t_wr),
            ("cke_off", self.cke_off),
            ("t_ras", self.t_ras),
            ("t_xsr", self.t_xsr),
            ("refresh_to_refresh", self.refresh_to_refresh),
            ("t_rrd", self.t_rrd),
            ("idle_timeout", self.idle_timeout),
        ]
    }
}

/// Convert nanoseconds to DRAM clock cycles (ceiling division).
///
/// Formula: `cycles = ceil(ns * clk_hz / 1_000_000_000)`, in integer
/// arithmetic so it is usable in `no_std`.
pub fn ns_to_cycles(ns: u32, clk: Hertz) -> u32 {
    let numer = u64::from(ns).saturating_mul(u64::from(clk.raw()));
    let cycles = numer.div_ceil(1_000_000_000);
    u32::try_from(cycles).unwrap_or(u32::MAX)
}

/// SDRAM configuration validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SdramConfigError {
    /// A timing parameter is zero. The `field` string names it.
    #[error("timing {field} is zero")]
    TimingZero {
        /// Name of the offending field.
        field: &'static str,
    },
    /// Device size is not a power of two.
    #[error("size is not a power of two")]
    SizeNotPowerOfTwo,
    /// Base address is not aligned to the device size.
    #[error("base address not aligned to size")]
    BaseMisaligned,
    /// Burst length is not 1, 2, 4 or 8 bytes.
    #[error("unsupported burst length")]
    BurstLength,
    /// Data width disagrees with the port size.
    #[error("data width does not match port size")]
    DataWidthMismatch,
    /// Refresh count or period is zero.
    #[error("refresh count or period is zero")]
    RefreshZero,
    /// A timing parameter needs more cycles than its controller field holds
    /// at the DRAM clock. The `field` string names it.
    #[error("timing {field} does not fit its cycle field")]
    TimingTooLong {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The refresh interval is shorter than one DRAM clock cycle.
    #[error("refresh interval rounds to zero cycles")]
    RefreshIntervalZero,
}

/// SDRAM device configuration (`dram_sdram_config_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SdramConfig {
    /// Internal banks.
    pub bank_num: SdramBankNum,
    /// Refresh timer prescaler.
    pub prescaler: u8,
    /// Burst length in bytes.
    pub burst_len_in_byte: u8,
    /// Auto-refresh commands per refresh burst.
    pub auto_refresh_count_in_one_burst: u8,
    /// Column address width.
    pub col_addr_bits: SdramColumnAddr,
    /// CAS latency.
    pub cas_latency: SdramCasLatency,
    /// Timing in nanoseconds.
    pub timing: SdramTimingNs,
    /// Chip select.
    pub cs: u8,
    /// Pin muxed as an extra CS, if any.
    pub cs_mux_pin: Option<u8>,
    /// Base address in the CPU map.
    pub base_address: u32,
    /// Device size in bytes.
    pub size_in_byte: u32,
    /// Bus width.
    pub port_size: SdramPortSize,
    /// Rows refreshed per refresh period.
    pub refresh_count: u32,
    /// Refresh period in milliseconds.
    pub refresh_in_ms: u32,
    /// Data width in bytes.
    pub data_width_in_byte: u8,
    /// Read-data delay cell setting.
    pub delay_cell_value: u8,
}

impl SdramConfig {
    /// The HPM6300EVK SDRAM configuration.
    pub const fn board() -> Self {
        Self {
            bank_num: SdramBankNum::Four,
            prescaler: 0x3,
            burst_len_in_byte: 8,
            auto_refresh_count_in_one_burst: 1,
            col_addr_bits: SdramColumnAddr::Bits9,
            cas_latency: SdramCasLatency::Cl3,
            timing: SdramTimingNs {
                t_rp: 18,
                t_rcd: 18,
                refresh_recover: 70,
                t_wr: 12,
                cke_off: 42,
                t_ras: 42,
                t_xsr: 66,
                refresh_to_refresh: 66,
                t_rrd: 12,
                idle_timeout: 6,
            },
            cs: BOARD_SDRAM_CS,
            cs_mux_pin: None,
            base_address: BOARD_SDRAM_ADDRESS,
            size_in_byte: BOARD_SDRAM_SIZE,
            port_size: SdramPortSize::Bits16,
            refresh_count: BOARD_SDRAM_REFRESH_COUNT,
            refresh_in_ms: BOARD_SDRAM_REFRESH_IN_MS,
            data_width_in_byte: BOARD_SDRAM_DATA_WIDTH_IN_BYTE,
            delay_cell_value: 29,
        }
    }

    /// Check the configuration before it reaches the controller.
    ///
    /// # Errors
    ///
    /// The first [`SdramConfigError`] found, checking timing fields first.
    pub fn validate(&self) -> Result<(), SdramConfigError> {
        if let Some((field, _)) = self.timing.fields().into_iter().find(|&(_, ns)| ns == 0) {
            return Err(SdramConfigError::TimingZero { field });
        }
        if !self.size_in_byte.is_power_of_two() {
            return Err(SdramConfigError::SizeNotPowerOfTwo);
        }
        if !self.base_address.is_multiple_of(self.size_in_byte) {
            return Err(SdramConfigError::BaseMisaligned);
        }
        if !matches!(self.burst_len_in_byte, 1 | 2 | 4 | 8) {
            return Err(SdramConfigError::BurstLength);
        }
        if self.data_width_in_byte != self.port_size.bytes() {
            return Err(SdramConfigError::DataWidthMismatch);
        }
        if self.refresh_count == 0 || self.refresh_in_ms == 0 {
            return Err(SdramConfigError::RefreshZero);
        }
        Ok(())
    }

    /// Check the configuration against the DRAM clock it will run at.
    ///
    /// Runs [`validate`](Self::validate), then converts every timing to
    /// controller cycles at `clk` and checks the refresh interval.
    ///
    /// # Errors
    ///
    /// The first [`SdramConfigError`] found.
    pub fn validate_at(&self, clk: Hertz) -> Result<(), SdramConfigError> {
        self.validate()?;
        let too_long = self
            .timing
            .fields()
            .into_iter()
            .zip(TIMING_MAX_CYCLES)
            .find(|&((_, ns), max)| ns_to_cycles(u32::from(ns), clk) > max);
        if let Some(((field, _), _)) = too_long {
            return Err(SdramConfigError::TimingTooLong { field });
        }
        if self.refresh_interval_cycles(clk) == 0 {
            return Err(SdramConfigError::RefreshIntervalZero);
        }
        Ok(())
    }

    /// DRAM clock cycles between two auto-refresh commands.
    ///
    /// `clk * refresh_in_ms / 1000 / refresh_count`; zero if the refresh
    /// count is zero.
    pub fn refresh_interval_cycles(&self, clk: Hertz) -> u32 {
        let period_cycles = u64::from(clk.raw())
            .saturating_mul(u64::from(self.refresh_in_ms))
            / 1000;
        let interval = period_cycles
            .checked_div(u64::from(self.refresh_count))
            .unwrap_or(0);
        u32::try_from(interval).unwrap_or(u32::MAX)
    }
}

/// DRAM controller seam (`hpm_dram_drv`).
pub trait DramControl {
    /// Vendor default controller configuration.
    fn default_config(&self) -> DramConfig;

    /// Initialise the controller.
    fn init(&mut self, cfg: &DramConfig);

    /// Program an SDRAM device on the controller; `clk` is the DRAM clock.
    fn config_sdram(&mut self, clk: Hertz, cfg: &SdramConfig) -> Result<(), HalStatus>;
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Test A ────────────────────────────────────────────────────────────────
    /// The board configuration is internally consistent.
    #[test]
    fn test_board_config_validates() {
        assert_eq!(SdramConfig::board().validate(), Ok(()));
    }

    // ── Test B ────────────────────────────────────────────────────────────────
    /// Board geometry and timing constants.
    #[test]
    fn test_board_config_values() {
        let c = SdramConfig::board();
        assert_eq!(c.bank_num, SdramBankNum::Four);
        assert_eq!(c.prescaler, 3);
        assert_eq!(c.burst_len_in_byte, 8);
        assert_eq!(c.col_addr_bits, SdramColumnAddr::Bits9);
        assert_eq!(c.cas_latency, SdramCasLatency::Cl3);
        assert_eq!(c.timing.refresh_recover, 70);
        assert_eq!(c.timing.idle_timeout, 6);
        assert_eq!(c.cs_mux_pin, None);
        assert_eq!(c.delay_cell_value, 29);
    }

    // ── Test C ────────────────────────────────────────────────────────────────
    /// ceil(18 ns * 166.67 MHz) = 3 cycles.
    #[test]
    fn test_ns_to_cycles_rounds_up() {
        assert_eq!(ns_to_cycles(18, Hertz(166_666_666)), 3);
        assert_eq!(ns_to_cycles(70, Hertz(166_666_666)), 12);
        assert_eq!(ns_to_cycles(0, Hertz(166_666_666)), 0);
        assert_eq!(ns_to_cycles(10, Hertz(100_000_000)), 1);
    }

    // ── Test D ────────────────────────────────────────────────────────────────
    #[test]
    fn test_zero_timing_named() {
        let mut c = SdramConfig::board();
        c.timing.t_xsr = 0;
        assert_eq!(c.validate(), Err(SdramConfigError::TimingZero { field: "t_xsr" }));
    }

    #[test]
    fn test_geometry_errors() {
        let mut c = SdramConfig::board();
        c.size_in_byte = 0x0180_0000;
        assert_eq!(c.validate(), Err(SdramConfigError::SizeNotPowerOfTwo));

        let mut c = SdramConfig::board();
        c.base_address = 0x4100_0000;
        assert_eq!(c.validate(), Err(SdramConfigError::BaseMisaligned));

        let mut c = SdramConfig::board();
        c.data_width_in_byte = 4;
        assert_eq!(c.validate(), Err(SdramConfigError::DataWidthMismatch));

        let mut c = SdramConfig::board();
        c.burst_len_in_byte = 3;
        assert_eq!(c.validate(), Err(SdramConfigError::BurstLength));
    }

    /// 64 ms / 8192 rows at 166.67 MHz = 1302 cycles per refresh.
    #[test]
    fn test_refresh_interval() {
        let c = SdramConfig::board();
        assert_eq!(c.refresh_interval_cycles(Hertz(166_666_666)), 1302);
    }

    #[test]
    fn test_board_config_fits_at_dram_clock() {
        assert_eq!(SdramConfig::board().validate_at(Hertz(166_666_666)), Ok(()));
    }

    /// tRFC has a 5-bit field: 200 ns at 166.67 MHz is 34 cycles.
    #[test]
    fn test_timing_too_long_for_field() {
        let mut c = SdramConfig::board();
        c.timing.refresh_recover = 200;
        assert_eq!(
            c.validate_at(Hertz(166_666_666)),
            Err(SdramConfigError::TimingTooLong { field: "refresh_recover" })
        );
        // The same timing fits at a slow enough clock
        assert_eq!(c.validate_at(Hertz::mhz(100)), Ok(()));
    }

    #[test]
    fn test_refresh_interval_below_one_cycle() {
        let mut c = SdramConfig::board();
        c.refresh_in_ms = 1;
        c.refresh_count = 1_000_000;
        assert_eq!(
            c.validate_at(Hertz(166_666_666)),
            Err(SdramConfigError::RefreshIntervalZero)
        );
    }

    /// Structural errors are reported ahead of clock-dependent ones.
    #[test]
    fn test_validate_at_checks_structure_first() {
        let mut c = SdramConfig::board();
        c.timing.t_rp = 0;
        c.refresh_count = u32::MAX;
        assert_eq!(
            c.validate_at(Hertz(166_666_666)),
            Err(SdramConfigError::TimingZero { field: "t_rp" })
        );
    }
}
