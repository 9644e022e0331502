//! Vendor-driver bindings.
//!
//! The HPM SDK drivers (clock, sysctl, pcfg, pinmux, gpio, gptmr, sdxc,
//! dram, uart console) are compiled by the board's C glue library and
//! exported as flat `hpm_board_*` functions taking plain integers. Enum
//! arguments are passed as their declaration index; the glue maps them to
//! the SDK constants. A zero `u32` return is success.

use core::convert::Infallible;

use hpm_platform::peripheral::PinGroup;
use hpm_platform::{
    AdcClockSource, ClockControl, ClockName, ClockSource, ConsoleConfig, ConsoleDriver,
    CpuLpMode, DacClockSource, DramConfig, DramControl, GpioControl, GpioPin, GptmrControl,
    HalStatus, Hertz, InterruptControl, Irq, PinLevel, PinMux, PmpControl, PmpEntry, Sdxc,
    SdramConfig, SdxcControl, SystemControl, TimerChannel, ChannelConfig, Gptmr,
};
use hpm_platform::sdram::DqsMode;

use super::csr::{CsrPmp, Plic};

/// SDRAM device description in the layout the glue expects.
#[repr(C)]
struct RawSdramConfig {
    bank_num: u8,
    prescaler: u8,
    burst_len_in_byte: u8,
    auto_refresh_count_in_one_burst: u8,
    col_addr_bits: u8,
    cas_latency: u8,
    timing_ns: [u8; 10],
    cs: u8,
    cs_mux_pin: u8,
    has_cs_mux_pin: u8,
    port_size: u8,
    data_width_in_byte: u8,
    delay_cell_value: u8,
    base_address: u32,
    size_in_byte: u32,
    refresh_count: u32,
    refresh_in_ms: u32,
}

impl From<&SdramConfig> for RawSdramConfig {
    fn from(cfg: &SdramConfig) -> Self {
        Self {
            bank_num: cfg.bank_num as u8,
            prescaler: cfg.prescaler,
            burst_len_in_byte: cfg.burst_len_in_byte,
            auto_refresh_count_in_one_burst: cfg.auto_refresh_count_in_one_burst,
            col_addr_bits: cfg.col_addr_bits as u8,
            cas_latency: cfg.cas_latency as u8,
            timing_ns: cfg.timing.fields().map(|(_, ns)| ns),
            cs: cfg.cs,
            cs_mux_pin: cfg.cs_mux_pin.unwrap_or(0),
            has_cs_mux_pin: u8::from(cfg.cs_mux_pin.is_some()),
            port_size: cfg.port_size as u8,
            data_width_in_byte: cfg.data_width_in_byte,
            delay_cell_value: cfg.delay_cell_value,
            base_address: cfg.base_address,
            size_in_byte: cfg.size_in_byte,
            refresh_count: cfg.refresh_count,
            refresh_in_ms: cfg.refresh_in_ms,
        }
    }
}

#[repr(C)]
struct RawChannelConfig {
    reload: u32,
    cmp: [u32; 2],
    cmp_initial_polarity_high: u8,
    enable_cmp_output: u8,
    debug_mode: u8,
}

mod ffi {
    use super::{RawChannelConfig, RawSdramConfig};

    extern "C" {
        pub(super) fn hpm_board_clock_get_frequency(clock: u32) -> u32;
        pub(super) fn hpm_board_clock_set_source_divider(clock: u32, source: u32, divider: u32);
        pub(super) fn hpm_board_clock_set_adc_source(clock: u32, source: u32);
        pub(super) fn hpm_board_clock_set_dac_source(clock: u32, source: u32);
        pub(super) fn hpm_board_clock_add_to_group(clock: u32, group: u32);
        pub(super) fn hpm_board_clock_connect_group_to_cpu(group: u32, cpu: u32);
        pub(super) fn hpm_board_clock_update_core_clock();
        pub(super) fn hpm_board_clock_cpu_delay_us(us: u32);

        pub(super) fn hpm_board_sysctl_clock_preset(preset: u32);
        pub(super) fn hpm_board_pllctl_xtal_rampup(cycles: u32);
        pub(super) fn hpm_board_sysctl_cpu_lp_mode(core: u32, mode: u32);
        pub(super) fn hpm_board_pcfg_dcdc_set_voltage(millivolts: u32);

        pub(super) fn hpm_board_init_pins(group: u32, instance: u32, flag: u32);

        pub(super) fn hpm_board_gpio_set_output(port: u32, pin: u32);
        pub(super) fn hpm_board_gpio_set_output_with_initial(port: u32, pin: u32, level: u32);
        pub(super) fn hpm_board_gpio_set_input(port: u32, pin: u32);
        pub(super) fn hpm_board_gpio_write(port: u32, pin: u32, level: u32);
        pub(super) fn hpm_board_gpio_toggle(port: u32, pin: u32);
        pub(super) fn hpm_board_gpio_read(port: u32, pin: u32) -> u32;
        pub(super) fn hpm_board_gpio_output_level(port: u32, pin: u32) -> u32;

        pub(super) fn hpm_board_sdxc_enable_sd_clock(sdxc: u32, enable: u32);
        pub(super) fn hpm_board_sdxc_enable_freq_selection(sdxc: u32);
        pub(super) fn hpm_board_sdxc_set_clock_divider(sdxc: u32, divider: u32);
        pub(super) fn hpm_board_sdxc_clock_divider(sdxc: u32) -> u32;
        pub(super) fn hpm_board_sdxc_card_inserted(sdxc: u32) -> u32;

        pub(super) fn hpm_board_dram_default_config(dqs: *mut u32, cmd_timeout: *mut u32, bus_timeout: *mut u32);
        pub(super) fn hpm_board_dram_init(dqs: u32, cmd_timeout: u32, bus_timeout: u32);
        pub(super) fn hpm_board_dram_config_sdram(clk_hz: u32, cfg: *const RawSdramConfig) -> u32;

        pub(super) fn hpm_board_gptmr_default_config(tmr: u32, cfg: *mut RawChannelConfig);
        pub(super) fn hpm_board_gptmr_channel_config(tmr: u32, ch: u32, cfg: *const RawChannelConfig, enable: u32);
        pub(super) fn hpm_board_gptmr_enable_irq(tmr: u32, mask: u32);
        pub(super) fn hpm_board_gptmr_check_status(tmr: u32, mask: u32) -> u32;
        pub(super) fn hpm_board_gptmr_clear_status(tmr: u32, mask: u32);
        pub(super) fn hpm_board_gptmr_start_counter(tmr: u32, ch: u32);

        pub(super) fn hpm_board_console_init(console_type: u32, base: u32, src_freq: u32, baudrate: u32) -> u32;
        pub(super) fn hpm_board_console_write(buf: *const u8, len: usize) -> usize;
        pub(super) fn hpm_board_console_flush();
    }
}

fn status(raw: u32) -> Result<(), HalStatus> {
    if raw == 0 {
        Ok(())
    } else {
        Err(HalStatus(raw))
    }
}

fn clock_code(clock: ClockName) -> u32 {
    clock.index() as u32
}

/// `(group, instance, flag)` triple understood by `hpm_board_init_pins`.
fn pin_group_code(group: PinGroup) -> (u32, u32, u32) {
    match group {
        PinGroup::Uart(i) => (0, i as u32, 0),
        PinGroup::Spi(i) => (1, i as u32, 0),
        PinGroup::SpiWithGpioCs(i) => (1, i as u32, 1),
        PinGroup::I2c(i) => (2, i as u32, 0),
        PinGroup::I2cAsGpio(i) => (2, i as u32, 1),
        PinGroup::Can(i) => (3, i as u32, 0),
        PinGroup::Sdxc { sdxc, as_gpio } => (4, sdxc as u32, u32::from(as_gpio)),
        PinGroup::Enet(i) => (5, i as u32, 0),
        PinGroup::Adc => (6, 0, 0),
        PinGroup::Dac(i) => (7, i as u32, 0),
        PinGroup::Gpio => (8, 0, 0),
        PinGroup::Sdram => (9, 0, 0),
        PinGroup::Led => (10, 0, 0),
        PinGroup::Usb => (11, 0, 0),
    }
}

fn level(raw: u32) -> PinLevel {
    if raw == 0 {
        PinLevel::Low
    } else {
        PinLevel::High
    }
}

/// The SoC as seen through the vendor drivers and the CSR/PLIC glue.
pub struct VendorSoc {
    pmp: CsrPmp,
    plic: Plic,
}

impl VendorSoc {
    /// Take the SoC.
    ///
    /// # Safety
    ///
    /// At most one `VendorSoc` may be live at any time outside interrupt
    /// handlers, and handlers may only touch the blocks they own.
    pub unsafe fn steal() -> Self {
        Self {
            // SAFETY: forwarded to the caller's contract
            pmp: unsafe { CsrPmp::new() },
            // SAFETY: forwarded to the caller's contract
            plic: unsafe { Plic::new() },
        }
    }
}

// SAFETY (all blocks below): every `hpm_board_*` function takes plain
// integers or pointers to live locals, and `VendorSoc::steal` guarantees
// exclusive access to the blocks the glue drives.

impl ClockControl for VendorSoc {
    fn frequency(&self, clock: ClockName) -> Hertz {
        // SAFETY: see above
        Hertz(unsafe { ffi::hpm_board_clock_get_frequency(clock_code(clock)) })
    }

    fn set_source_divider(&mut self, clock: ClockName, source: ClockSource, divider: u32) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_clock_set_source_divider(clock_code(clock), source as u32, divider) }
    }

    fn set_adc_source(&mut self, clock: ClockName, source: AdcClockSource) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_clock_set_adc_source(clock_code(clock), source as u32) }
    }

    fn set_dac_source(&mut self, clock: ClockName, source: DacClockSource) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_clock_set_dac_source(clock_code(clock), source as u32) }
    }

    fn add_to_group(&mut self, clock: ClockName, group: u8) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_clock_add_to_group(clock_code(clock), u32::from(group)) }
    }

    fn connect_group_to_cpu(&mut self, group: u8, cpu: u8) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_clock_connect_group_to_cpu(u32::from(group), u32::from(cpu)) }
    }

    fn update_core_clock(&mut self) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_clock_update_core_clock() }
    }

    fn cpu_delay_us(&mut self, us: u32) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_clock_cpu_delay_us(us) }
    }
}

impl SystemControl for VendorSoc {
    fn set_clock_preset(&mut self, preset: u8) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_sysctl_clock_preset(u32::from(preset)) }
    }

    fn xtal_set_rampup_time(&mut self, cycles: u32) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_pllctl_xtal_rampup(cycles) }
    }

    fn set_cpu_lp_mode(&mut self, core: u8, mode: CpuLpMode) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_sysctl_cpu_lp_mode(u32::from(core), mode as u32) }
    }

    fn dcdc_set_voltage(&mut self, millivolts: u16) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_pcfg_dcdc_set_voltage(u32::from(millivolts)) }
    }
}

impl PinMux for VendorSoc {
    fn init_pins(&mut self, group: PinGroup) {
        let (kind, instance, flag) = pin_group_code(group);
        // SAFETY: see above
        unsafe { ffi::hpm_board_init_pins(kind, instance, flag) }
    }
}

impl GpioControl for VendorSoc {
    fn set_pin_output(&mut self, pin: GpioPin) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_gpio_set_output(u32::from(pin.port), u32::from(pin.pin)) }
    }

    fn set_pin_output_with_initial(&mut self, pin: GpioPin, initial: PinLevel) {
        // SAFETY: see above
        unsafe {
            ffi::hpm_board_gpio_set_output_with_initial(
                u32::from(pin.port),
                u32::from(pin.pin),
                u32::from(initial.bit()),
            );
        }
    }

    fn set_pin_input(&mut self, pin: GpioPin) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_gpio_set_input(u32::from(pin.port), u32::from(pin.pin)) }
    }

    fn write_pin(&mut self, pin: GpioPin, level: PinLevel) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_gpio_write(u32::from(pin.port), u32::from(pin.pin), u32::from(level.bit())) }
    }

    fn toggle_pin(&mut self, pin: GpioPin) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_gpio_toggle(u32::from(pin.port), u32::from(pin.pin)) }
    }

    fn read_pin(&self, pin: GpioPin) -> PinLevel {
        // SAFETY: see above
        level(unsafe { ffi::hpm_board_gpio_read(u32::from(pin.port), u32::from(pin.pin)) })
    }

    fn output_level(&self, pin: GpioPin) -> PinLevel {
        // SAFETY: see above
        level(unsafe { ffi::hpm_board_gpio_output_level(u32::from(pin.port), u32::from(pin.pin)) })
    }
}

impl PmpControl for VendorSoc {
    fn pmp_config(&mut self, entries: &[PmpEntry]) {
        self.pmp.pmp_config(entries);
    }
}

impl InterruptControl for VendorSoc {
    fn enable_irq_with_priority(&mut self, irq: Irq, priority: u8) {
        self.plic.enable_irq_with_priority(irq, priority);
    }
}

impl SdxcControl for VendorSoc {
    fn enable_sd_clock(&mut self, sdxc: Sdxc, enable: bool) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_sdxc_enable_sd_clock(sdxc as u32, u32::from(enable)) }
    }

    fn enable_freq_selection(&mut self, sdxc: Sdxc) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_sdxc_enable_freq_selection(sdxc as u32) }
    }

    fn set_clock_divider(&mut self, sdxc: Sdxc, divider: u32) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_sdxc_set_clock_divider(sdxc as u32, divider) }
    }

    fn clock_divider(&self, sdxc: Sdxc) -> u32 {
        // SAFETY: see above
        unsafe { ffi::hpm_board_sdxc_clock_divider(sdxc as u32) }
    }

    fn is_card_inserted(&self, sdxc: Sdxc) -> bool {
        // SAFETY: see above
        unsafe { ffi::hpm_board_sdxc_card_inserted(sdxc as u32) != 0 }
    }
}

impl DramControl for VendorSoc {
    fn default_config(&self) -> DramConfig {
        let (mut dqs, mut cmd_timeout, mut bus_timeout) = (0u32, 0u32, 0u32);
        // SAFETY: see above; the out-pointers are live locals
        unsafe { ffi::hpm_board_dram_default_config(&mut dqs, &mut cmd_timeout, &mut bus_timeout) }
        DramConfig {
            dqs: if dqs == 0 { DqsMode::Internal } else { DqsMode::FromPad },
            cmd_timeout: u8::try_from(cmd_timeout).unwrap_or(u8::MAX),
            bus_timeout: u8::try_from(bus_timeout).unwrap_or(u8::MAX),
        }
    }

    fn init(&mut self, cfg: &DramConfig) {
        // SAFETY: see above
        unsafe {
            ffi::hpm_board_dram_init(
                cfg.dqs as u32,
                u32::from(cfg.cmd_timeout),
                u32::from(cfg.bus_timeout),
            );
        }
    }

    fn config_sdram(&mut self, clk: Hertz, cfg: &SdramConfig) -> Result<(), HalStatus> {
        let raw = RawSdramConfig::from(cfg);
        // SAFETY: see above; `raw` outlives the call
        status(unsafe { ffi::hpm_board_dram_config_sdram(clk.raw(), &raw) })
    }
}

impl GptmrControl for VendorSoc {
    fn channel_default_config(&self, tmr: Gptmr) -> ChannelConfig {
        let defaults = ChannelConfig::default();
        let mut raw = RawChannelConfig {
            reload: defaults.reload,
            cmp: defaults.cmp,
            cmp_initial_polarity_high: u8::from(defaults.cmp_initial_polarity_high),
            enable_cmp_output: u8::from(defaults.enable_cmp_output),
            debug_mode: u8::from(defaults.debug_mode),
        };
        // SAFETY: see above; `raw` is a live local
        unsafe { ffi::hpm_board_gptmr_default_config(tmr.index() as u32, &mut raw) }
        ChannelConfig {
            reload: raw.reload,
            cmp: raw.cmp,
            cmp_initial_polarity_high: raw.cmp_initial_polarity_high != 0,
            enable_cmp_output: raw.enable_cmp_output != 0,
            debug_mode: raw.debug_mode != 0,
        }
    }

    fn channel_config(&mut self, tmr: Gptmr, ch: TimerChannel, cfg: &ChannelConfig, enable: bool) {
        let raw = RawChannelConfig {
            reload: cfg.reload,
            cmp: cfg.cmp,
            cmp_initial_polarity_high: u8::from(cfg.cmp_initial_polarity_high),
            enable_cmp_output: u8::from(cfg.enable_cmp_output),
            debug_mode: u8::from(cfg.debug_mode),
        };
        // SAFETY: see above; `raw` outlives the call
        unsafe { ffi::hpm_board_gptmr_channel_config(tmr.index() as u32, ch.index(), &raw, u32::from(enable)) }
    }

    fn enable_irq(&mut self, tmr: Gptmr, mask: u32) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_gptmr_enable_irq(tmr.index() as u32, mask) }
    }

    fn check_status(&self, tmr: Gptmr, mask: u32) -> bool {
        // SAFETY: see above
        unsafe { ffi::hpm_board_gptmr_check_status(tmr.index() as u32, mask) != 0 }
    }

    fn clear_status(&mut self, tmr: Gptmr, mask: u32) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_gptmr_clear_status(tmr.index() as u32, mask) }
    }

    fn start_counter(&mut self, tmr: Gptmr, ch: TimerChannel) {
        // SAFETY: see above
        unsafe { ffi::hpm_board_gptmr_start_counter(tmr.index() as u32, ch.index()) }
    }
}

impl ConsoleDriver for VendorSoc {
    fn console_init(&mut self, cfg: &ConsoleConfig) -> Result<(), HalStatus> {
        // SAFETY: see above
        status(unsafe {
            ffi::hpm_board_console_init(cfg.console_type as u32, cfg.base, cfg.src_freq.raw(), cfg.baudrate)
        })
    }
}

impl embedded_io::ErrorType for VendorSoc {
    type Error = Infallible;
}

impl embedded_io::Write for VendorSoc {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        // SAFETY: see above; `buf` is valid for `buf.len()` bytes
        Ok(unsafe { ffi::hpm_board_console_write(buf.as_ptr(), buf.len()) })
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        // SAFETY: see above
        unsafe { ffi::hpm_board_console_flush() }
        Ok(())
    }
}
