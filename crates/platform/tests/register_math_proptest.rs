//! Property-based tests for the register-value math.
//! Verifies the encodings hold for every valid input, not just the board values.

// Test file: unwrap/panic/indexing/arithmetic are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
)]

use hpm_platform::pmp::{board_pmp_entries, napot_addr, NapotRegion};
use hpm_platform::sdxc::{sdxc_divider_for, SDXC_DIVIDER_TIERS, SDXC_FALLBACK_DIVIDER};
use hpm_platform::timer::reload_ticks;
use hpm_platform::{Hertz, NoncacheableRegion, PmpError};

proptest::proptest! {
    /// A NAPOT address decodes back to the region it was built from:
    /// trailing ones give the size, the rest gives the base.
    #[test]
    fn napot_addr_decodes_back(shift in 3u32..=31, slot in 0u32..=u32::MAX) {
        let size = 1u32 << shift;
        let base = slot & !(size - 1);
        let addr = napot_addr(base, size);
        let ones = addr.trailing_ones();
        assert_eq!(ones, shift - 3);
        assert_eq!(size, 8u32 << ones);
        assert_eq!((addr << 2) & !(size - 1), base);
    }

    /// NapotRegion::new never panics and only accepts aligned powers of two >= 8.
    #[test]
    fn napot_region_validation(base in 0u32..=u32::MAX, size in 0u32..=u32::MAX) {
        match NapotRegion::new(base, size) {
            Ok(region) => {
                assert!(size.is_power_of_two() && size >= 8);
                assert_eq!(base % size, 0);
                assert_eq!(region.addr(), napot_addr(base, size));
            }
            Err(PmpError::SizeZero) => assert_eq!(size, 0),
            Err(PmpError::SizeTooSmall) => assert!(size > 0 && size < 8),
            Err(PmpError::SizeNotPowerOfTwo) => assert!(!size.is_power_of_two()),
            Err(PmpError::AddressMisaligned) => assert_ne!(base % size, 0),
            Err(PmpError::RegionInverted) => panic!("not produced by NapotRegion::new"),
        }
    }

    /// Boot entries always cover all of memory with the window last.
    #[test]
    fn board_entries_window_is_last(shift in 3u32..=20, slot in 0x0100_0000u32..0x0200_0000) {
        let size = 1u32 << shift;
        let start = slot & !(size - 1);
        let entries = board_pmp_entries(NoncacheableRegion::new(start, start + size))
            .unwrap()
            .unwrap();
        assert_eq!(entries[0].pmp_addr, 0x0FFF_FFFF);
        assert_eq!(entries[1].pmp_addr, 0x2FFF_FFFF);
        assert_eq!(entries[2].pma_addr, napot_addr(start, size));
    }

    /// An inverted linker window is always rejected.
    #[test]
    fn inverted_window_rejected(start in 1u32..=u32::MAX, back in 1u32..=u32::MAX) {
        let end = start.saturating_sub(back);
        if end < start {
            assert_eq!(
                board_pmp_entries(NoncacheableRegion::new(start, end)),
                Err(PmpError::RegionInverted)
            );
        }
    }

    /// Within the tiers a faster request never gets a larger divider.
    #[test]
    fn sdxc_divider_monotone(a in 0u32..=208_000_000, b in 0u32..=208_000_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (d_lo, d_hi) = (sdxc_divider_for(Hertz(lo)), sdxc_divider_for(Hertz(hi)));
        assert!(d_hi >= 1);
        assert!(d_hi <= d_lo, "{} Hz -> /{}, {} Hz -> /{}", lo, d_lo, hi, d_hi);
    }

    /// Requests above the fastest tier fall back to default speed.
    #[test]
    fn sdxc_above_tiers_falls_back(hz in 208_000_001u32..=u32::MAX) {
        assert_eq!(sdxc_divider_for(Hertz(hz)), SDXC_FALLBACK_DIVIDER);
    }

    /// Reload ticks never wrap: saturation at u32::MAX, monotone in `ms`.
    #[test]
    fn reload_ticks_monotone(freq in 0u32..=u32::MAX, a in 0u32..=u32::MAX, b in 0u32..=u32::MAX) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        assert!(reload_ticks(Hertz(freq), lo) <= reload_ticks(Hertz(freq), hi));
        let exact = u64::from(freq / 1000) * u64::from(hi);
        assert_eq!(u64::from(reload_ticks(Hertz(freq), hi)), exact.min(u64::from(u32::MAX)));
    }
}

#[test]
fn sdxc_tier_edges() {
    for tier in SDXC_DIVIDER_TIERS {
        assert_eq!(sdxc_divider_for(tier.max), tier.divider);
    }
}
