//! General-purpose timer seam and the timer handler table.
//!
//! Each GPTMR block has four channels. A channel's reload event sets bit
//! `channel * 4` of the block's status register and, when enabled, raises
//! the block's interrupt. One interrupt serves every channel of a block, so
//! the ISR walks a [`TimerDispatcher`] to find which handlers to run.
//!
//! # Dispatch contract
//!
//! - Handlers are registered before the timer interrupt is enabled.
//! - A channel holds at most one handler, for the lifetime of the table.
//! - [`TimerDispatcher::dispatch`] clears a channel's reload flag *before*
//!   calling its handler, and calls it exactly once per flag it observes.

use heapless::Vec;

use crate::clock::Hertz;
use crate::error::BoardError;
use crate::peripheral::Gptmr;

/// A channel of a GPTMR block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerChannel {
    /// Channel 0.
    Ch0,
    /// Channel 1.
    Ch1,
    /// Channel 2.
    Ch2,
    /// Channel 3.
    Ch3,
}

impl TimerChannel {
    /// Channel index (0..=3).
    pub const fn index(self) -> u32 {
        match self {
            Self::Ch0 => 0,
            Self::Ch1 => 1,
            Self::Ch2 => 2,
            Self::Ch3 => 3,
        }
    }

    /// Reload status bit, also the reload interrupt-enable bit.
    pub const fn reload_mask(self) -> u32 {
        1 << (self.index() * 4)
    }
}

/// Channel configuration (`gptmr_channel_config_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Reload value in timer ticks.
    pub reload: u32,
    /// Compare values.
    pub cmp: [u32; 2],
    /// Initial polarity of the compare output.
    pub cmp_initial_polarity_high: bool,
    /// Drive the compare output pin.
    pub enable_cmp_output: bool,
    /// Keep counting while the debugger halts the core.
    pub debug_mode: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            reload: u32::MAX,
            cmp: [u32::MAX, u32::MAX],
            cmp_initial_polarity_high: true,
            enable_cmp_output: true,
            debug_mode: true,
        }
    }
}

/// Reload value for a period of `ms` milliseconds at `freq`.
///
/// The frequency is divided down to ticks per millisecond first, as the
/// hardware counts; the product saturates rather than wrapping.
pub const fn reload_ticks(freq: Hertz, ms: u32) -> u32 {
    (freq.raw() / 1000).saturating_mul(ms)
}

/// GPTMR seam (`hpm_gptmr_drv`).
pub trait GptmrControl {
    /// Vendor default channel configuration.
    fn channel_default_config(&self, tmr: Gptmr) -> ChannelConfig;

    /// Configure `ch`; `enable` starts it immediately.
    fn channel_config(&mut self, tmr: Gptmr, ch: TimerChannel, cfg: &ChannelConfig, enable: bool);

    /// Enable the interrupts in `mask`.
    fn enable_irq(&mut self, tmr: Gptmr, mask: u32);

    /// True when any status bit in `mask` is set.
    fn check_status(&self, tmr: Gptmr, mask: u32) -> bool;

    /// Clear the status bits in `mask` (write-one-to-clear).
    fn clear_status(&mut self, tmr: Gptmr, mask: u32);

    /// Start counting on `ch`.
    fn start_counter(&mut self, tmr: Gptmr, ch: TimerChannel);
}

/// Timer handler signature. Runs in interrupt context.
pub type TimerHandler = fn();

#[derive(Clone, Copy)]
struct Slot {
    tmr: Gptmr,
    ch: TimerChannel,
    handler: TimerHandler,
}

/// Fixed-capacity table of timer channel handlers.
pub struct TimerDispatcher<const N: usize> {
    slots: Vec<Slot, N>,
}

impl<const N: usize> Default for TimerDispatcher<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TimerDispatcher<N> {
    /// Empty table.
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Register `handler` for reload events of `ch` on `tmr`.
    ///
    /// # Errors
    ///
    /// - [`BoardError::TimerChannelTaken`] if the channel already has a handler
    /// - [`BoardError::TimerTableFull`] if all `N` slots are used
    pub fn register(&mut self, tmr: Gptmr, ch: TimerChannel, handler: TimerHandler) -> Result<(), BoardError> {
        if self.is_registered(tmr, ch) {
            return Err(BoardError::TimerChannelTaken);
        }
        self.slots
            .push(Slot { tmr, ch, handler })
            .map_err(|_| BoardError::TimerTableFull)
    }

    /// True when `ch` on `tmr` has a handler.
    pub fn is_registered(&self, tmr: Gptmr, ch: TimerChannel) -> bool {
        self.slots.iter().any(|s| s.tmr == tmr && s.ch == ch)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Service the interrupt of `tmr`: clear and handle every pending reload.
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch<G: GptmrControl>(&self, hw: &mut G, tmr: Gptmr) -> usize {
        let mut fired = 0usize;
        for slot in self.slots.iter().filter(|s| s.tmr == tmr) {
            let mask = slot.ch.reload_mask();
            if hw.check_status(tmr, mask) {
                hw.clear_status(tmr, mask);
                (slot.handler)();
                fired = fired.saturating_add(1);
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() {}

    #[test]
    fn test_reload_masks() {
        assert_eq!(TimerChannel::Ch0.reload_mask(), 0x0001);
        assert_eq!(TimerChannel::Ch1.reload_mask(), 0x0010);
        assert_eq!(TimerChannel::Ch3.reload_mask(), 0x1000);
    }

    #[test]
    fn test_reload_ticks_divides_first() {
        // 100 MHz, 10 ms
        assert_eq!(reload_ticks(Hertz::mhz(100), 10), 1_000_000);
        // 24 MHz, 1 ms
        assert_eq!(reload_ticks(Hertz::mhz(24), 1), 24_000);
        // Sub-kHz clocks truncate to zero ticks per ms
        assert_eq!(reload_ticks(Hertz(999), 1000), 0);
        assert_eq!(reload_ticks(Hertz::mhz(100), u32::MAX), u32::MAX);
    }

    #[test]
    fn test_register_rejects_duplicate_channel() {
        let mut d = TimerDispatcher::<2>::new();
        d.register(Gptmr::Gptmr3, TimerChannel::Ch1, noop).unwrap();
        assert_eq!(
            d.register(Gptmr::Gptmr3, TimerChannel::Ch1, noop),
            Err(BoardError::TimerChannelTaken)
        );
        // Same channel index on another block is a different channel
        d.register(Gptmr::Gptmr2, TimerChannel::Ch1, noop).unwrap();
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn test_register_rejects_when_full() {
        let mut d = TimerDispatcher::<1>::new();
        d.register(Gptmr::Gptmr0, TimerChannel::Ch0, noop).unwrap();
        assert_eq!(
            d.register(Gptmr::Gptmr0, TimerChannel::Ch2, noop),
            Err(BoardError::TimerTableFull)
        );
    }
}
