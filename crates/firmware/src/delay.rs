//! Busy-wait delays on the CPU clock.

use embedded_hal::delay::DelayNs;
use hpm_platform::ClockControl;

// Largest millisecond count whose microsecond value fits a u32.
const MAX_MS_PER_CALL: u32 = u32::MAX / 1000;

/// Spin for `us` microseconds.
pub fn delay_us<C: ClockControl>(soc: &mut C, us: u32) {
    soc.cpu_delay_us(us);
}

/// Spin for `ms` milliseconds.
pub fn delay_ms<C: ClockControl>(soc: &mut C, ms: u32) {
    let mut remaining = ms;
    while remaining > 0 {
        let step = remaining.min(MAX_MS_PER_CALL);
        soc.cpu_delay_us(step.saturating_mul(1000));
        remaining = remaining.saturating_sub(step);
    }
}

/// `embedded-hal` delay provider backed by the clock controller.
pub struct BoardDelay<'a, C: ClockControl> {
    clock: &'a mut C,
}

impl<'a, C: ClockControl> BoardDelay<'a, C> {
    /// Borrow the clock controller for delays.
    pub fn new(clock: &'a mut C) -> Self {
        Self { clock }
    }
}

impl<C: ClockControl> DelayNs for BoardDelay<'_, C> {
    fn delay_ns(&mut self, ns: u32) {
        // Microsecond resolution: round up so the wait is never short.
        self.clock.cpu_delay_us(ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        delay_us(self.clock, us);
    }

    fn delay_ms(&mut self, ms: u32) {
        delay_ms(self.clock, ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpm_platform::mocks::SimSoc;

    #[test]
    fn test_ns_round_up() {
        let mut soc = SimSoc::new();
        BoardDelay::new(&mut soc).delay_ns(1);
        assert_eq!(soc.delayed_us(), 1);
    }

    #[test]
    fn test_long_ms_delay_not_truncated() {
        let mut soc = SimSoc::new();
        delay_ms(&mut soc, u32::MAX);
        assert_eq!(soc.delayed_us(), u64::from(u32::MAX) * 1000);
    }

    #[test]
    fn test_delay_writes_no_registers() {
        let mut soc = SimSoc::new();
        let mut delay = BoardDelay::new(&mut soc);
        delay.delay_ms(5);
        delay.delay_us(7);
        assert_eq!(soc.delayed_us(), 5007);
        assert_eq!(soc.write_count(), 0);
    }
}
