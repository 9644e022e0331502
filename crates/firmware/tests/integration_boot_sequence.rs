//! Integration test: the complete board bring-up on the simulated SoC.
//!
//! Tests that:
//!   1. The rail is raised before any clock moves
//!   2. PMP entries land before the AHB is sped up
//!   3. Every optional step runs, in order, when enabled
//!   4. The console carries the summary and banner text
//!   5. A failing step stops the sequence with nothing written after it
//!   6. Running the clock configurator twice leaves the state of one run
//!
//! Does NOT require physical hardware.
//!
//! Run with: cargo test -p hpm6300evk --test integration_boot_sequence

// Integration test file -- intentional test patterns permitted.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
)]

use hpm6300evk::boot::{board_init, init_clock, BOOT_SEQUENCE_STEPS};
use hpm6300evk::config::{BoardConfig, ConsoleSetup};
use hpm_platform::mocks::{Op, SimSoc};
use hpm_platform::{
    BoardError, ClockControl, ClockName, ClockSource, HalStatus, Hertz, NoncacheableRegion,
    PinGroup, PmpError, Uart,
};

const REGION: NoncacheableRegion = NoncacheableRegion::new(0x0108_0000, 0x0110_0000);

fn full_config() -> BoardConfig {
    BoardConfig {
        show_clock_summary: true,
        show_banner: true,
        ext_ram: true,
        ..BoardConfig::default()
    }
}

fn position(soc: &SimSoc, pred: impl Fn(&Op) -> bool) -> usize {
    soc.ops().iter().position(pred).expect("operation not logged")
}

#[test]
fn dcdc_is_the_first_write() {
    let mut soc = SimSoc::new();
    board_init(&mut soc, &BoardConfig::default(), REGION).unwrap();
    assert_eq!(soc.ops().first(), Some(&Op::DcdcVoltage(1100)));
}

#[test]
fn steps_run_in_documented_order() {
    let mut soc = SimSoc::new();
    board_init(&mut soc, &full_config(), REGION).unwrap();

    let dcdc = position(&soc, |op| matches!(op, Op::DcdcVoltage(_)));
    let preset = position(&soc, |op| matches!(op, Op::SetClockPreset(2)));
    let cpu = position(&soc, |op| {
        *op == Op::SetSourceDivider(ClockName::Cpu0, ClockSource::Pll1Clk0, 1)
    });
    let console = position(&soc, |op| matches!(op, Op::ConsoleInit(_)));
    let pmp = position(&soc, |op| matches!(op, Op::PmpConfig(3)));
    let ahb = position(&soc, |op| {
        *op == Op::SetSourceDivider(ClockName::Ahb, ClockSource::Pll1Clk1, 2)
    });
    let sdram = position(&soc, |op| matches!(op, Op::DramConfigSdram(_)));

    assert!(dcdc < preset);
    assert!(preset < cpu);
    assert!(cpu < console);
    assert!(console < pmp);
    assert!(pmp < ahb);
    assert!(ahb < sdram);
    assert_eq!(BOOT_SEQUENCE_STEPS.len(), 7);
}

#[test]
fn report_reflects_full_boot() {
    let mut soc = SimSoc::new();
    let report = board_init(&mut soc, &full_config(), REGION).unwrap();
    assert_eq!(report.cpu0, Hertz::mhz(480));
    assert_eq!(report.ahb, Hertz::mhz(200));
    assert_eq!(report.pmp_entries, 3);
    assert_eq!(report.ext_ram, Some(Hertz(166_666_666)));
    assert_eq!(report.console.base, Uart::Uart0.base());
    assert_eq!(report.console.src_freq, Hertz::mhz(24));
    assert_eq!(report.console.baudrate, 115_200);
}

#[test]
fn console_text_has_summary_then_banner() {
    let mut soc = SimSoc::new();
    board_init(&mut soc, &full_config(), REGION).unwrap();
    let text = soc.console_text();

    let summary = text.find("hpm6300evk clock summary").unwrap();
    let banner = text.find("$$\\   $$\\").unwrap();
    assert!(summary < banner);
    assert!(text.contains("cpu0:\t\t 480000000Hz\n"));
    assert!(text.contains("ahb:\t\t 200000000Hz\n"));
    // SDRAM is up by the time the summary prints
    assert!(text.contains("dram:\t\t 166666666Hz\n"));
}

#[test]
fn quiet_boot_prints_nothing() {
    let mut soc = SimSoc::new();
    let report = board_init(&mut soc, &BoardConfig::default(), REGION).unwrap();
    assert!(soc.console_text().is_empty());
    assert_eq!(report.ext_ram, None);
    assert!(!soc.ops().iter().any(|op| matches!(op, Op::InitPins(PinGroup::Sdram))));
}

#[test]
fn absent_console_stops_after_clocks() {
    let mut soc = SimSoc::new();
    let cfg = BoardConfig { console: ConsoleSetup::Absent, ..full_config() };
    assert_eq!(board_init(&mut soc, &cfg, REGION), Err(BoardError::ConsoleAbsent));
    assert_eq!(
        soc.ops().last(),
        Some(&Op::UpdateCoreClock),
        "nothing after the clock step"
    );
    assert!(soc.pmp_entries().is_empty());
}

#[test]
fn console_driver_failure_stops_before_pmp() {
    let mut soc = SimSoc::new();
    soc.fail_console(HalStatus::FAIL);
    assert_eq!(board_init(&mut soc, &full_config(), REGION), Err(BoardError::Console));
    assert!(soc.pmp_entries().is_empty());
    assert_eq!(soc.ahb_setting(), None);
}

#[test]
fn bad_window_stops_before_ahb() {
    let mut soc = SimSoc::new();
    let misaligned = NoncacheableRegion::new(0x0108_1000, 0x0110_1000);
    assert_eq!(
        board_init(&mut soc, &full_config(), misaligned),
        Err(BoardError::Pmp(PmpError::AddressMisaligned))
    );
    assert_eq!(soc.ahb_setting(), None);
}

#[test]
fn empty_window_boots_without_pmp() {
    let mut soc = SimSoc::new();
    let empty = NoncacheableRegion::new(0x0108_0000, 0x0108_0000);
    let report = board_init(&mut soc, &BoardConfig::default(), empty).unwrap();
    assert_eq!(report.pmp_entries, 0);
    assert!(!soc.ops().iter().any(|op| matches!(op, Op::PmpConfig(_))));
}

#[test]
fn dram_failure_surfaces_and_skips_prints() {
    let mut soc = SimSoc::new();
    soc.fail_dram(HalStatus::INVALID_ARGUMENT);
    assert_eq!(board_init(&mut soc, &full_config(), REGION), Err(BoardError::Dram(2)));
    assert!(soc.console_text().is_empty());
}

/// With the `tracing` back end the boot summary reaches the subscriber.
#[cfg(feature = "tracing")]
#[test]
fn boot_logs_through_tracing() {
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut soc = SimSoc::new();
        board_init(&mut soc, &full_config(), REGION).unwrap();
    });

    let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(log.contains("hpm6300evk up: cpu0 480000000 Hz"), "{log}");
    assert!(log.contains("sdram: 33554432 bytes"), "{log}");
}

/// AHB programming as logged, if any.
trait AhbSetting {
    fn ahb_setting(&self) -> Option<(ClockSource, u32)>;
}

impl AhbSetting for SimSoc {
    fn ahb_setting(&self) -> Option<(ClockSource, u32)> {
        self.ops().iter().find_map(|op| match *op {
            Op::SetSourceDivider(ClockName::Ahb, src, div) => Some((src, div)),
            _ => None,
        })
    }
}

// ── Clock configurator idempotence ───────────────────────────────────────────

#[test]
fn clock_configurator_twice_equals_once() {
    let mut once = SimSoc::new();
    let first = init_clock(&mut once);

    let mut twice = SimSoc::new();
    init_clock(&mut twice);
    let second = init_clock(&mut twice);

    assert_eq!(first, second);
    assert_eq!(once.preset(), twice.preset());
    assert_eq!(once.cpu_group(), twice.cpu_group());
    for &clock in ClockName::ALL {
        let name = clock.as_str();
        assert_eq!(once.clock_setting(clock), twice.clock_setting(clock), "{name} setting");
        assert_eq!(once.clock_group(clock), twice.clock_group(clock), "{name} group");
        assert_eq!(once.frequency(clock), twice.frequency(clock), "{name} frequency");
    }
    // The second run re-applies the group and CPU divider, not the preset
    assert!(twice.write_count() > once.write_count());
}
