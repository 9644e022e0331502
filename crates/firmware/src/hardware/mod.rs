//! On-target glue (HPM6360 only).
//!
//! - [`VendorSoc`]: every driver seam, backed by the vendor drivers and CSRs
//! - [`timer_create`] / `board_timer_isr`: the board timer wired to a static
//!   handler table behind a `critical_section::Mutex`
//! - [`noncacheable_region`]: the linker's non-cacheable window
//!
//! The SDK startup code owns the trap vector. It calls `board_timer_isr`
//! for PLIC source 17 (GPTMR3) and `board_fault` for synchronous traps.

pub mod csr;
pub mod vendor;

use core::cell::RefCell;

use critical_section::Mutex;
use hpm_platform::timer::TimerHandler;
use hpm_platform::{BoardError, NoncacheableRegion};

pub use vendor::VendorSoc;

use crate::boot::{self, BootReport};
use crate::config::BoardConfig;
use crate::timer::{self, BoardTimerDispatcher};

static DISPATCHER: Mutex<RefCell<BoardTimerDispatcher>> =
    Mutex::new(RefCell::new(BoardTimerDispatcher::new()));

extern "C" {
    static __noncacheable_start__: u8;
    static __noncacheable_end__: u8;
}

/// `__noncacheable_start__..__noncacheable_end__` from the linker script.
pub fn noncacheable_region() -> NoncacheableRegion {
    // SAFETY: only the addresses of the linker symbols are taken, never
    // their contents.
    let (start, end) = unsafe {
        (
            core::ptr::addr_of!(__noncacheable_start__) as u32,
            core::ptr::addr_of!(__noncacheable_end__) as u32,
        )
    };
    NoncacheableRegion::new(start, end)
}

/// Park the core.
pub fn halt() -> ! {
    loop {
        // SAFETY: `wfi` has no memory effects
        unsafe { core::arch::asm!("wfi", options(nomem, nostack)) }
    }
}

/// Run [`boot::board_init`] and halt on failure.
pub fn board_init_or_halt(soc: &mut VendorSoc, cfg: &BoardConfig) -> BootReport {
    match boot::board_init(soc, cfg, noncacheable_region()) {
        Ok(report) => report,
        Err(err) => {
            error!("board init failed: {}", err.as_str());
            halt()
        }
    }
}

/// Start `cb` every `ms` milliseconds on the board timer.
pub fn timer_create(soc: &mut VendorSoc, ms: u32, cb: TimerHandler) -> Result<u32, BoardError> {
    critical_section::with(|cs| {
        let mut dispatcher = DISPATCHER.borrow_ref_mut(cs);
        timer::timer_create(soc, &mut *dispatcher, ms, cb)
    })
}

/// GPTMR3 interrupt entry, called by the SDK trap handler.
#[no_mangle]
pub extern "C" fn board_timer_isr() {
    // SAFETY: the ISR only touches GPTMR3 status, which no thread-mode code
    // writes after `timer_create`.
    let mut soc = unsafe { VendorSoc::steal() };
    critical_section::with(|cs| {
        let dispatcher = DISPATCHER.borrow_ref(cs);
        timer::timer_isr(&mut soc, &*dispatcher);
    });
}

/// Synchronous trap entry, called by the SDK trap handler. Never returns.
#[no_mangle]
pub extern "C" fn board_fault(mcause: u32, mepc: u32, mtval: u32) -> ! {
    error!("trap: mcause {} mepc {} mtval {}", mcause, mepc, mtval);
    halt()
}
