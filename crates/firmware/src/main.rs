//! HPM6300EVK board bring-up demo
//!
//! Runs the board init sequence, then blinks the user LED from the board
//! timer callback.

#![no_std]
#![no_main]

use defmt_rtt as _;

use hpm6300evk::config::BoardConfig;
use hpm6300evk::gpio;
use hpm6300evk::hardware::{self, VendorSoc};

const BLINK_PERIOD_MS: u32 = 500;

#[panic_handler]
fn panic(_info: &core::panic::PanicInfo<'_>) -> ! {
    defmt::error!("panic");
    hardware::halt()
}

fn blink() {
    // SAFETY: the callback runs in the timer ISR and only touches the LED
    // pin, which thread mode leaves alone after init.
    let mut soc = unsafe { VendorSoc::steal() };
    gpio::led_toggle(&mut soc);
}

/// Entry point called by the SDK startup code.
#[no_mangle]
pub extern "C" fn main() -> ! {
    // SAFETY: first and only thread-mode handle
    let mut soc = unsafe { VendorSoc::steal() };
    let report = hardware::board_init_or_halt(&mut soc, &BoardConfig::from_features());
    defmt::info!(
        "cpu0 {=u32} Hz, ahb {=u32} Hz, {=usize} pmp entries",
        report.cpu0.raw(),
        report.ahb.raw(),
        report.pmp_entries
    );

    gpio::init_led_pins(&mut soc);
    if let Err(err) = hardware::timer_create(&mut soc, BLINK_PERIOD_MS, blink) {
        defmt::error!("blink timer: {=str}", err.as_str());
    }

    loop {
        // SAFETY: `wfi` has no memory effects
        unsafe { core::arch::asm!("wfi", options(nomem, nostack)) }
    }
}
