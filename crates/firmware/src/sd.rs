//! SD card clocking and card detect.

use hpm_platform::clock_config::SDXC_CLOCK;
use hpm_platform::sdxc::sdxc_divider_for;
use hpm_platform::{BoardError, ClockControl, Hertz, Sdxc, SdxcControl};

/// Set the card clock for a requested bus frequency.
///
/// The controller clock is reprogrammed to 200 MHz with the card clock
/// gated, the divider is chosen from the speed tiers, and the card clock is
/// ungated again. Returns the card clock actually produced.
pub fn sd_configure_clock<S: ClockControl + SdxcControl>(
    soc: &mut S,
    sdxc: Sdxc,
    freq: Hertz,
) -> Hertz {
    let clock = match sdxc {
        Sdxc::Sdxc0 => sdxc.clock(),
    };

    soc.enable_sd_clock(sdxc, false);
    soc.set_source_divider(clock, SDXC_CLOCK.source, SDXC_CLOCK.divider);
    soc.enable_freq_selection(sdxc);
    soc.set_clock_divider(sdxc, sdxc_divider_for(freq));
    soc.enable_sd_clock(sdxc, true);

    let actual = soc.frequency(clock).div(soc.clock_divider(sdxc));
    debug!("sd clock requested {} Hz, running {} Hz", freq.raw(), actual.raw());
    actual
}

/// True when a card sits in the slot.
pub fn sd_detect_card<S: SdxcControl>(soc: &S, sdxc: Sdxc) -> bool {
    soc.is_card_inserted(sdxc)
}

/// The card slot has a fixed 3.3 V supply; UHS-I signalling is unavailable.
pub fn sd_switch_pins_to_1v8(_sdxc: Sdxc) -> Result<(), BoardError> {
    Err(BoardError::NotSupported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpm_platform::mocks::{Op, SimSoc};
    use hpm_platform::{ClockName, ClockSource};

    #[test]
    fn test_identification_clock() {
        let mut soc = SimSoc::new();
        let actual = sd_configure_clock(&mut soc, Sdxc::Sdxc0, Hertz::khz(400));
        assert_eq!(actual, Hertz(333_333));
        assert!(soc.sd_clock_enabled());
    }

    #[test]
    fn test_card_clock_gated_while_reprogrammed() {
        let mut soc = SimSoc::new();
        sd_configure_clock(&mut soc, Sdxc::Sdxc0, Hertz::mhz(50));
        assert_eq!(
            soc.ops(),
            &[
                Op::SdxcEnableClock(Sdxc::Sdxc0, false),
                Op::SetSourceDivider(ClockName::Sdxc0, ClockSource::Pll0Clk0, 2),
                Op::SdxcEnableFreqSelection(Sdxc::Sdxc0),
                Op::SdxcSetDivider(Sdxc::Sdxc0, 4),
                Op::SdxcEnableClock(Sdxc::Sdxc0, true),
            ]
        );
    }

    #[test]
    fn test_out_of_range_falls_back() {
        let mut soc = SimSoc::new();
        let actual = sd_configure_clock(&mut soc, Sdxc::Sdxc0, Hertz::mhz(300));
        assert_eq!(actual, Hertz::mhz(25));
    }

    #[test]
    fn test_detect_and_1v8() {
        let mut soc = SimSoc::new();
        assert!(!sd_detect_card(&soc, Sdxc::Sdxc0));
        soc.set_card_inserted(true);
        assert!(sd_detect_card(&soc, Sdxc::Sdxc0));
        assert_eq!(sd_switch_pins_to_1v8(Sdxc::Sdxc0), Err(BoardError::NotSupported));
    }
}
