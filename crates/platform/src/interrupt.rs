//! External interrupt controller seam (PLIC, machine mode).

/// External interrupt source number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Irq(pub u16);

/// Interrupt controller seam (`intc_m_*`).
pub trait InterruptControl {
    /// Enable `irq` for the machine-mode context at `priority` (1 = lowest enabled).
    fn enable_irq_with_priority(&mut self, irq: Irq, priority: u8);
}
