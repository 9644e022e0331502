//! SD/SDXC card-clock divider selection.
//!
//! `sdxc0` runs from the 200 MHz `pll0_clk0 / 2` source; the controller's
//! own divider then picks the card clock for the bus speed mode.
//!
//! | Requested       | Divider | Card clock | Mode                         |
//! |-----------------|---------|------------|------------------------------|
//! | <= 400 kHz      | 600     | 333 kHz    | identification               |
//! | <= 25 MHz       | 8       | 25 MHz     | SDR12 / default speed        |
//! | <= 50 MHz       | 4       | 50 MHz     | SDR25 / high speed / DDR50   |
//! | <= 100 MHz      | 2       | 100 MHz    | SDR50                        |
//! | <= 208 MHz      | 1       | 200 MHz    | SDR104 / HS200 / HS400       |
//! | otherwise       | 8       | 25 MHz     | unsupported, fall back       |

use crate::clock::Hertz;
use crate::peripheral::Sdxc;

/// Upper bound of one divider tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdxcDividerTier {
    /// Largest requested frequency served by this tier.
    pub max: Hertz,
    /// Controller divider programmed.
    pub divider: u32,
}

/// Divider tiers in ascending order of `max`.
pub const SDXC_DIVIDER_TIERS: [SdxcDividerTier; 5] = [
    SdxcDividerTier { max: Hertz(400_000), divider: 600 },
    SdxcDividerTier { max: Hertz(25_000_000), divider: 8 },
    SdxcDividerTier { max: Hertz(50_000_000), divider: 4 },
    SdxcDividerTier { max: Hertz(100_000_000), divider: 2 },
    SdxcDividerTier { max: Hertz(208_000_000), divider: 1 },
];

/// Divider used above the last tier.
pub const SDXC_FALLBACK_DIVIDER: u32 = 8;

/// Controller divider for a requested card clock.
pub fn sdxc_divider_for(requested: Hertz) -> u32 {
    SDXC_DIVIDER_TIERS
        .iter()
        .find(|t| requested <= t.max)
        .map_or(SDXC_FALLBACK_DIVIDER, |t| t.divider)
}

/// SDXC controller seam (`hpm_sdxc_drv`).
pub trait SdxcControl {
    /// Gate (`false`) or ungate (`true`) the card clock.
    fn enable_sd_clock(&mut self, sdxc: Sdxc, enable: bool);

    /// Switch the divider into frequency-select mode.
    fn enable_freq_selection(&mut self, sdxc: Sdxc);

    /// Program the card-clock divider.
    fn set_clock_divider(&mut self, sdxc: Sdxc, divider: u32);

    /// Divider the controller is currently applying.
    fn clock_divider(&self, sdxc: Sdxc) -> u32;

    /// Card-detect state.
    fn is_card_inserted(&self, sdxc: Sdxc) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        let cases = [
            (400_000, 600),
            (400_001, 8),
            (25_000_000, 8),
            (50_000_000, 4),
            (100_000_000, 2),
            (208_000_000, 1),
            (208_000_001, 8),
            (300_000_000, 8),
            (0, 600),
        ];
        for (hz, div) in cases {
            assert_eq!(sdxc_divider_for(Hertz(hz)), div, "{hz} Hz");
        }
    }

    #[test]
    fn test_tiers_ascending() {
        for pair in SDXC_DIVIDER_TIERS.windows(2) {
            assert!(pair[0].max < pair[1].max);
            assert!(pair[0].divider > pair[1].divider);
        }
    }
}
