//! Direct CSR and PLIC access.
//!
//! PMP entries are written through the standard `pmpcfg`/`pmpaddr` CSRs;
//! the Andes PMA registers sit at `pmacfg0` (0xBC0) and `pmaaddr0..` (0xBD0).
//! CSR numbers are instruction immediates, so each index has its own arm.

use core::arch::asm;

use hpm_platform::{InterruptControl, Irq, PmpControl, PmpEntry};

/// Entries that fit `pmpcfg0`/`pmacfg0` on RV32.
const CFG_ENTRIES: usize = 4;

/// PMP/PMA programmer.
pub struct CsrPmp;

impl CsrPmp {
    /// # Safety
    ///
    /// Changing PMP attributes under running code can revoke access to it.
    /// Only call from boot, in machine mode, before caches are relied on.
    pub unsafe fn new() -> Self {
        Self
    }
}

macro_rules! csrw_indexed {
    ($idx:expr, $val:expr, [$($i:literal => $csr:literal),+ $(,)?]) => {
        match $idx {
            $(
                $i => {
                    // SAFETY: caller holds the CsrPmp handle, so boot context
                    unsafe { asm!(concat!("csrw ", $csr, ", {0}"), in(reg) $val) }
                }
            )+
            _ => {}
        }
    };
}

fn write_pmpaddr(idx: usize, val: usize) {
    csrw_indexed!(idx, val, [0 => "0x3B0", 1 => "0x3B1", 2 => "0x3B2", 3 => "0x3B3"]);
}

fn write_pmaaddr(idx: usize, val: usize) {
    csrw_indexed!(idx, val, [0 => "0xBD0", 1 => "0xBD1", 2 => "0xBD2", 3 => "0xBD3"]);
}

impl PmpControl for CsrPmp {
    fn pmp_config(&mut self, entries: &[PmpEntry]) {
        if entries.len() > CFG_ENTRIES {
            warn!("pmp: {} entries, only {} programmed", entries.len(), CFG_ENTRIES);
        }
        let mut pmp_cfg = [0u8; CFG_ENTRIES];
        let mut pma_cfg = [0u8; CFG_ENTRIES];
        for (i, (entry, (pmp, pma))) in entries
            .iter()
            .zip(pmp_cfg.iter_mut().zip(pma_cfg.iter_mut()))
            .enumerate()
        {
            write_pmpaddr(i, entry.pmp_addr as usize);
            write_pmaaddr(i, entry.pma_addr as usize);
            *pmp = entry.pmp_cfg.0;
            *pma = entry.pma_cfg.0;
        }
        let pmp_word = u32::from_le_bytes(pmp_cfg) as usize;
        let pma_word = u32::from_le_bytes(pma_cfg) as usize;
        // SAFETY: boot context (see `CsrPmp::new`); addresses are in place
        // before the cfg words enable the entries.
        unsafe {
            asm!("csrw 0xBC0, {0}", in(reg) pma_word);
            asm!("csrw 0x3A0, {0}", in(reg) pmp_word);
            asm!("fence.i", "fence rw, rw");
        }
    }
}

/// PLIC of the HPM6360.
pub const PLIC_BASE: usize = 0xE400_0000;
const PLIC_ENABLE_OFFSET: usize = 0x2000;

/// Machine-mode external interrupt enables.
pub struct Plic {
    base: usize,
}

impl Plic {
    /// # Safety
    ///
    /// One handle per PLIC; the PLIC registers must not be written elsewhere.
    pub const unsafe fn new() -> Self {
        Self { base: PLIC_BASE }
    }
}

impl InterruptControl for Plic {
    fn enable_irq_with_priority(&mut self, irq: Irq, priority: u8) {
        let n = usize::from(irq.0);
        let prio = self.base.wrapping_add(n.wrapping_mul(4)) as *mut u32;
        let enable = self
            .base
            .wrapping_add(PLIC_ENABLE_OFFSET)
            .wrapping_add((n / 32).wrapping_mul(4)) as *mut u32;
        let bit = 1u32.wrapping_shl((n % 32) as u32);
        // SAFETY: both addresses are PLIC registers for a valid source and
        // this handle is their only writer.
        unsafe {
            prio.write_volatile(u32::from(priority));
            enable.write_volatile(enable.read_volatile() | bit);
            riscv::register::mie::set_mext();
            riscv::interrupt::enable();
        }
    }
}
