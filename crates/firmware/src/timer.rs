//! Board callback timer.
//!
//! A periodic callback runs off GPTMR3 channel 1. The handler lives in a
//! [`TimerDispatcher`] that the timer interrupt walks; on hardware that
//! table is a static behind a critical section (see `hardware`).

use hpm_platform::clock_config::BOARD_CLOCK_GROUP_ID;
use hpm_platform::config::{
    BOARD_CALLBACK_TIMER, BOARD_CALLBACK_TIMER_CH, BOARD_CALLBACK_TIMER_PRIORITY,
};
use hpm_platform::timer::{reload_ticks, TimerHandler};
use hpm_platform::{BoardError, ClockControl, GptmrControl, InterruptControl, TimerDispatcher};

/// Handler slots of the board timer table, one per GPTMR3 channel.
pub const BOARD_TIMER_SLOTS: usize = 4;

/// Handler table serving the board callback timer.
pub type BoardTimerDispatcher = TimerDispatcher<BOARD_TIMER_SLOTS>;

/// Start a periodic callback every `ms` milliseconds.
///
/// `cb` is registered before the timer interrupt is enabled, so the first
/// reload always finds it. Returns the reload value programmed. If
/// registration fails no register is written.
pub fn timer_create<S, const N: usize>(
    soc: &mut S,
    dispatcher: &mut TimerDispatcher<N>,
    ms: u32,
    cb: TimerHandler,
) -> Result<u32, BoardError>
where
    S: ClockControl + GptmrControl + InterruptControl,
{
    let tmr = BOARD_CALLBACK_TIMER;
    let ch = BOARD_CALLBACK_TIMER_CH;
    dispatcher.register(tmr, ch, cb)?;

    let mut config = soc.channel_default_config(tmr);
    soc.add_to_group(tmr.clock(), BOARD_CLOCK_GROUP_ID);
    let freq = soc.frequency(tmr.clock());
    config.reload = reload_ticks(freq, ms);

    soc.channel_config(tmr, ch, &config, false);
    soc.enable_irq(tmr, ch.reload_mask());
    soc.enable_irq_with_priority(tmr.irq(), BOARD_CALLBACK_TIMER_PRIORITY);
    soc.start_counter(tmr, ch);

    info!("board timer: {} ms period, reload {}", ms, config.reload);
    Ok(config.reload)
}

/// Body of the board timer ISR.
///
/// Returns the number of callbacks run.
pub fn timer_isr<G: GptmrControl, const N: usize>(soc: &mut G, dispatcher: &TimerDispatcher<N>) -> usize {
    dispatcher.dispatch(soc, BOARD_CALLBACK_TIMER)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};
    use hpm_platform::mocks::{Op, SimSoc};
    use hpm_platform::{ClockName, Gptmr, Irq, TimerChannel};

    static TICKS: AtomicU32 = AtomicU32::new(0);

    fn tick() {
        TICKS.fetch_add(1, Ordering::SeqCst);
    }

    fn noop() {}

    #[test]
    fn test_timer_programming_order() {
        let mut soc = SimSoc::new();
        let mut table = BoardTimerDispatcher::new();
        let reload = timer_create(&mut soc, &mut table, 10, noop).unwrap();
        // gptmr3 at reset: 24 MHz
        assert_eq!(reload, 240_000);
        let cfg = hpm_platform::ChannelConfig { reload, ..Default::default() };
        assert_eq!(
            soc.ops(),
            &[
                Op::AddToGroup(ClockName::Gptmr3, 0),
                Op::GptmrChannelConfig(Gptmr::Gptmr3, TimerChannel::Ch1, cfg, false),
                Op::GptmrEnableIrq(Gptmr::Gptmr3, 0x10),
                Op::EnableIrq(Irq(17), 1),
                Op::GptmrStartCounter(Gptmr::Gptmr3, TimerChannel::Ch1),
            ]
        );
        assert!(soc.channel_running(Gptmr::Gptmr3, TimerChannel::Ch1));
    }

    #[test]
    fn test_second_create_rejected_without_writes() {
        let mut soc = SimSoc::new();
        let mut table = BoardTimerDispatcher::new();
        timer_create(&mut soc, &mut table, 1, noop).unwrap();
        soc.clear_ops();
        assert_eq!(
            timer_create(&mut soc, &mut table, 1, noop),
            Err(BoardError::TimerChannelTaken)
        );
        assert_eq!(soc.write_count(), 0);
    }

    #[test]
    fn test_isr_runs_callback_once_per_reload() {
        let mut soc = SimSoc::new();
        let mut table = BoardTimerDispatcher::new();
        timer_create(&mut soc, &mut table, 1, tick).unwrap();
        let before = TICKS.load(Ordering::SeqCst);

        assert_eq!(timer_isr(&mut soc, &table), 0);
        soc.raise_reload(Gptmr::Gptmr3, BOARD_CALLBACK_TIMER_CH);
        assert_eq!(timer_isr(&mut soc, &table), 1);
        assert_eq!(soc.timer_status(Gptmr::Gptmr3), 0);
        // Flag already cleared: a spurious entry runs nothing
        assert_eq!(timer_isr(&mut soc, &table), 0);
        assert_eq!(TICKS.load(Ordering::SeqCst).wrapping_sub(before), 1);
    }
}
