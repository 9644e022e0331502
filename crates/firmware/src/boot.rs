//! Board bring-up sequence for the HPM6300EVK.
//!
//! Initialization order (MUST be respected, later steps depend on earlier):
//!   0. Core DC-DC to 1100 mV, ahead of any clock increase
//!   1. Clock tree: preset, clock group 0, CPU0 at 480 MHz
//!   2. Debug console on UART0 (24 MHz functional clock)
//!   3. PMP/PMA: non-cacheable window, before anything touches it
//!   4. AHB at 200 MHz
//!   5. External SDRAM (optional)
//!   6. Clock summary and banner (optional)
//!
//! Any failure aborts the sequence with nothing further written; the
//! hardware entry point turns that into a halt.

use core::fmt::Write as _;

use embedded_io::Write;
use hpm_platform::clock_config::{
    AHB_CLOCK, BOARD_CLOCK_GROUP, BOARD_CLOCK_GROUP_ID, BOARD_DCDC_MILLIVOLTS, BOARD_RUNNING_CORE,
    CLOCK_PRESET, CLOCK_SUMMARY, CPU0_CLOCK, PLL_REFCLK_HZ, UART_CLOCK, XTAL_RAMPUP_CYCLES,
};
use hpm_platform::config::BOARD_NAME;
use hpm_platform::pmp::board_pmp_entries;
use hpm_platform::{
    BoardError, ClockControl, ClockName, ConsoleConfig, ConsoleDriver, ConsoleType, CpuLpMode,
    DramControl, Hertz, NoncacheableRegion, PinMux, PmpControl, SystemControl,
};

use crate::config::{BoardConfig, ConsoleSetup};
use crate::{ext_ram, pins};

/// Ordered list of bring-up steps, for logs and tests.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "0. DC-DC: core rail to 1100 mV",
    "1. Clock: preset 2 if on the reference clock, group 0, cpu0 = pll1_clk0",
    "2. Console: UART0 at osc24m, 115200 baud",
    "3. PMP/PMA: 4 GiB RWX, non-cacheable window",
    "4. AHB: pll1_clk1 / 2",
    "5. SDRAM: pins, dram clock, controller, device (ext-ram)",
    "6. Clock summary and banner (show-clock, show-banner)",
];

const BANNER: &str = r"
----------------------------------------------------------------------
$$\   $$\ $$$$$$$\  $$\      $$\ $$\
$$ |  $$ |$$  __$$\ $$$\    $$$ |\__|
$$ |  $$ |$$ |  $$ |$$$$\  $$$$ |$$\  $$$$$$$\  $$$$$$\   $$$$$$\
$$$$$$$$ |$$$$$$$  |$$\$$\$$ $$ |$$ |$$  _____|$$  __$$\ $$  __$$\
$$  __$$ |$$  ____/ $$ \$$$  $$ |$$ |$$ /      $$ |  \__|$$ /  $$ |
$$ |  $$ |$$ |      $$ |\$  /$$ |$$ |$$ |      $$ |      $$ |  $$ |
$$ |  $$ |$$ |      $$ | \_/ $$ |$$ |\$$$$$$$\ $$ |      \$$$$$$  |
\__|  \__|\__|      \__|     \__|\__| \_______|\__|       \______/
----------------------------------------------------------------------
";

const SUMMARY_RULE: &str = "==============================\n";

/// Every seam [`board_init`] drives.
pub trait BoardSoc:
    ClockControl + SystemControl + PinMux + ConsoleDriver + PmpControl + DramControl + Write
{
}

impl<T> BoardSoc for T where
    T: ClockControl + SystemControl + PinMux + ConsoleDriver + PmpControl + DramControl + Write
{
}

/// What bring-up configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    /// CPU0 clock after the tree is set up.
    pub cpu0: Hertz,
    /// AHB clock.
    pub ahb: Hertz,
    /// Configuration the console came up with.
    pub console: ConsoleConfig,
    /// PMP entries committed (0 when the non-cacheable window is empty).
    pub pmp_entries: usize,
    /// DRAM clock, when the SDRAM was brought up.
    pub ext_ram: Option<Hertz>,
}

/// Run the board bring-up sequence.
///
/// `region` is the linker's non-cacheable window
/// (`__noncacheable_start__..__noncacheable_end__`).
pub fn board_init<S: BoardSoc>(
    soc: &mut S,
    cfg: &BoardConfig,
    region: NoncacheableRegion,
) -> Result<BootReport, BoardError> {
    soc.dcdc_set_voltage(BOARD_DCDC_MILLIVOLTS);
    let cpu0 = init_clock(soc);
    let console = init_console(soc, &cfg.console)?;
    let pmp_entries = init_pmp(soc, region)?;
    let ahb = init_ahb(soc);

    let ext_ram = if cfg.ext_ram {
        Some(ext_ram::init_ext_ram(soc)?)
    } else {
        None
    };

    if cfg.show_clock_summary {
        print_clock_freq(soc)?;
    }
    if cfg.show_banner {
        print_banner(soc)?;
    }

    info!(
        "{} up: cpu0 {} Hz, ahb {} Hz, image {}",
        BOARD_NAME,
        cpu0.raw(),
        ahb.raw(),
        cfg.image_kind()
    );
    Ok(BootReport { cpu0, ahb, console, pmp_entries, ext_ram })
}

/// Bring the clock tree to its running configuration.
///
/// The preset is only applied while CPU0 still runs from the PLL
/// reference, so calling this again changes nothing. Returns the CPU0 clock.
pub fn init_clock<S: ClockControl + SystemControl>(soc: &mut S) -> Hertz {
    if soc.frequency(ClockName::Cpu0) == PLL_REFCLK_HZ {
        // External OSC ramp-up: ~9 ms
        soc.xtal_set_rampup_time(XTAL_RAMPUP_CYCLES);
        soc.set_clock_preset(CLOCK_PRESET);
    }

    for &clock in &BOARD_CLOCK_GROUP {
        soc.add_to_group(clock, BOARD_CLOCK_GROUP_ID);
    }
    soc.connect_group_to_cpu(BOARD_CLOCK_GROUP_ID, BOARD_RUNNING_CORE);

    soc.set_source_divider(ClockName::Cpu0, CPU0_CLOCK.source, CPU0_CLOCK.divider);
    soc.update_core_clock();

    let cpu0 = soc.frequency(ClockName::Cpu0);
    debug!("cpu0 at {} Hz", cpu0.raw());
    cpu0
}

/// Bring up the debug console.
///
/// # Errors
///
/// - [`BoardError::ConsoleAbsent`] when the build has no console; nothing
///   is written
/// - [`BoardError::Console`] when the console driver fails
pub fn init_console<S: ClockControl + PinMux + ConsoleDriver>(
    soc: &mut S,
    setup: &ConsoleSetup,
) -> Result<ConsoleConfig, BoardError> {
    let (uart, baudrate) = match *setup {
        ConsoleSetup::Uart { uart, baudrate } => (uart, baudrate),
        ConsoleSetup::Absent => return Err(BoardError::ConsoleAbsent),
    };

    soc.set_source_divider(uart.clock(), UART_CLOCK.source, UART_CLOCK.divider);
    let cfg = ConsoleConfig {
        console_type: ConsoleType::Uart,
        base: uart.base(),
        src_freq: soc.frequency(uart.clock()),
        baudrate,
    };

    pins::init_uart_pins(soc, uart);

    soc.console_init(&cfg).map_err(|status| {
        error!("console init failed: status {}", status.0);
        BoardError::Console
    })?;
    Ok(cfg)
}

/// Install the PMP/PMA entries of the board.
///
/// An empty non-cacheable window installs nothing. Otherwise three entries
/// are committed in one call: both 2 GiB halves RWX, then the window as
/// RWX, non-cacheable and bufferable. Returns the number of entries.
pub fn init_pmp<P: PmpControl>(soc: &mut P, region: NoncacheableRegion) -> Result<usize, BoardError> {
    match board_pmp_entries(region)? {
        Some(entries) => {
            soc.pmp_config(&entries);
            Ok(entries.len())
        }
        None => Ok(0),
    }
}

/// Run the AHB at 200 MHz.
pub fn init_ahb<C: ClockControl>(soc: &mut C) -> Hertz {
    soc.set_source_divider(ClockName::Ahb, AHB_CLOCK.source, AHB_CLOCK.divider);
    soc.frequency(ClockName::Ahb)
}

/// Keep the CPU clock running in `wfi`, so the machine timer keeps firing.
pub fn ungate_mchtmr_at_lp_mode<S: SystemControl>(soc: &mut S) {
    soc.set_cpu_lp_mode(BOARD_RUNNING_CORE, CpuLpMode::UngateCpuClock);
}

struct ConsoleFmt<'a, W: Write>(&'a mut W);

impl<W: Write> core::fmt::Write for ConsoleFmt<'_, W> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.0.write_all(s.as_bytes()).map_err(|_| core::fmt::Error)
    }
}

/// Print the frequencies of the main clocks to the console.
pub fn print_clock_freq<S: ClockControl + Write>(soc: &mut S) -> Result<(), BoardError> {
    let lines = CLOCK_SUMMARY.map(|clock| (clock, soc.frequency(clock)));
    write_clock_summary(&mut ConsoleFmt(soc), &lines).map_err(|_| BoardError::Console)
}

fn write_clock_summary<W: Write>(
    out: &mut ConsoleFmt<'_, W>,
    lines: &[(ClockName, Hertz)],
) -> core::fmt::Result {
    out.write_str(SUMMARY_RULE)?;
    writeln!(out, " {BOARD_NAME} clock summary")?;
    out.write_str(SUMMARY_RULE)?;
    for (clock, freq) in lines {
        let name = clock.as_str();
        // Values line up at the second tab stop
        let tabs = if name.len() >= 7 { "\t" } else { "\t\t" };
        writeln!(out, "{name}:{tabs} {freq}")?;
    }
    out.write_str(SUMMARY_RULE)
}

/// Print the HPMicro banner to the console.
pub fn print_banner<W: Write>(soc: &mut W) -> Result<(), BoardError> {
    soc.write_all(BANNER.as_bytes()).map_err(|_| BoardError::Console)
}
