//! PMP/PMA region encoding for the HPM6360 (Andes D45 core).
//!
//! # Purpose
//!
//! The D45 caches every access by default. DMA descriptors and buffers
//! live in the linker's `.noncacheable` section, which must be marked
//! non-cacheable in the Andes PMA (physical memory attribute) unit before
//! any peripheral touches it. PMA entries only take effect where a PMP
//! entry grants access, so the board installs three entries:
//!
//! | # | Range                 | PMP  | PMA                                  |
//! |---|-----------------------|------|--------------------------------------|
//! | 0 | `[0, 2 GiB)`          | RWX  | unused                               |
//! | 1 | `[2 GiB, 4 GiB)`      | RWX  | unused                               |
//! | 2 | `.noncacheable`       | RWX  | memory, non-cacheable, bufferable, AMO |
//!
//! # NAPOT encoding
//!
//! A naturally aligned power-of-two region of `size` bytes at `base` is
//! written to `pmpaddrN` (and `pmaaddrN`) as
//! `(base | ((size - 1) >> 1)) >> 2`. Size must be a power of two of at
//! least 8 bytes and `base % size == 0`.
//!
//! # Config bytes
//!
//! - `pmpcfg`: `R | W<<1 | X<<2 | A<<3 | L<<7`
//! - `pmacfg`: `ETYP | MTYP<<2 | NAMO<<6`

use thiserror_no_std::Error;

/// PMP/PMA region validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PmpError {
    /// Region size is zero.
    #[error("region size is zero")]
    SizeZero,
    /// Region size is below the 8-byte NAPOT minimum.
    #[error("region smaller than 8 bytes")]
    SizeTooSmall,
    /// Region size is not a power of two.
    #[error("region size is not a power of two")]
    SizeNotPowerOfTwo,
    /// Base address is not aligned to the region size.
    #[error("region base not aligned to its size")]
    AddressMisaligned,
    /// The linker region ends before it starts.
    #[error("region end precedes start")]
    RegionInverted,
}

/// Address-matching mode (`A` field of `pmpcfg`, `ETYP` of `pmacfg`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AddressMatch {
    /// Entry disabled.
    Off = 0,
    /// Top of range.
    Tor = 1,
    /// Naturally aligned four-byte region.
    Na4 = 2,
    /// Naturally aligned power-of-two region.
    Napot = 3,
}

/// Andes PMA memory type (`MTYP`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MemType {
    /// Device, non-bufferable.
    DeviceNonBuf = 0,
    /// Device, bufferable.
    DeviceBuf = 1,
    /// Memory, non-cacheable, non-bufferable.
    MemNonCacheNonBuf = 2,
    /// Memory, non-cacheable, bufferable.
    MemNonCacheBuf = 3,
}

/// Encoded `pmpcfg` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PmpCfg(pub u8);

impl PmpCfg {
    /// Read, write, execute; NAPOT; unlocked.
    pub const RWX_NAPOT: Self = Self::new(true, true, true, AddressMatch::Napot, false);

    /// Encode a `pmpcfg` byte.
    pub const fn new(read: bool, write: bool, exec: bool, matching: AddressMatch, locked: bool) -> Self {
        let mut v = matching as u8;
        v <<= 3;
        if read {
            v |= 1;
        }
        if write {
            v |= 1 << 1;
        }
        if exec {
            v |= 1 << 2;
        }
        if locked {
            v |= 1 << 7;
        }
        Self(v)
    }
}

/// Encoded `pmacfg` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PmaCfg(pub u8);

impl PmaCfg {
    /// Unused entry.
    pub const OFF: Self = Self(0);

    /// NAPOT memory, non-cacheable, bufferable, atomics enabled.
    pub const NONCACHEABLE_BUF: Self = Self::new(AddressMatch::Napot, MemType::MemNonCacheBuf, true);

    /// Encode a `pmacfg` byte. `NAMO` is the inverse of `amo_enabled`.
    pub const fn new(matching: AddressMatch, mem: MemType, amo_enabled: bool) -> Self {
        let mut v = (matching as u8) | ((mem as u8) << 2);
        if !amo_enabled {
            v |= 1 << 6;
        }
        Self(v)
    }
}

/// NAPOT address-register value for a region.
///
/// Callers validate `size` first; see [`NapotRegion::new`].
pub const fn napot_addr(base: u32, size: u32) -> u32 {
    (base | (size.wrapping_sub(1) >> 1)) >> 2
}

/// A validated naturally aligned power-of-two region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NapotRegion {
    base: u32,
    size: u32,
}

impl NapotRegion {
    /// The lower half of the 32-bit address space.
    pub const LOW_2G: Self = Self { base: 0, size: 0x8000_0000 };
    /// The upper half of the 32-bit address space.
    pub const HIGH_2G: Self = Self { base: 0x8000_0000, size: 0x8000_0000 };

    /// Create a region, validating size and alignment.
    ///
    /// # Errors
    ///
    /// - [`PmpError::SizeZero`] if `size == 0`
    /// - [`PmpError::SizeTooSmall`] if `size < 8`
    /// - [`PmpError::SizeNotPowerOfTwo`] if `size` is not a power of two
    /// - [`PmpError::AddressMisaligned`] if `base % size != 0`
    pub fn new(base: u32, size: u32) -> Result<Self, PmpError> {
        if size == 0 {
            return Err(PmpError::SizeZero);
        }
        if size < 8 {
            return Err(PmpError::SizeTooSmall);
        }
        if !size.is_power_of_two() {
            return Err(PmpError::SizeNotPowerOfTwo);
        }
        if !base.is_multiple_of(size) {
            return Err(PmpError::AddressMisaligned);
        }
        Ok(Self { base, size })
    }

    /// Base address.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Size in bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Encoded address-register value.
    pub fn addr(&self) -> u32 {
        napot_addr(self.base, self.size)
    }
}

/// One PMP entry with its paired PMA entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PmpEntry {
    /// `pmpcfg` byte.
    pub pmp_cfg: PmpCfg,
    /// `pmpaddr` value.
    pub pmp_addr: u32,
    /// `pmacfg` byte.
    pub pma_cfg: PmaCfg,
    /// `pmaaddr` value.
    pub pma_addr: u32,
}

impl PmpEntry {
    /// RWX PMP entry over `region`, no PMA attribute.
    pub fn rwx(region: NapotRegion) -> Self {
        Self {
            pmp_cfg: PmpCfg::RWX_NAPOT,
            pmp_addr: region.addr(),
            pma_cfg: PmaCfg::OFF,
            pma_addr: 0,
        }
    }

    /// RWX PMP entry over `region` with the PMA marking it non-cacheable.
    pub fn rwx_noncacheable(region: NapotRegion) -> Self {
        Self {
            pma_cfg: PmaCfg::NONCACHEABLE_BUF,
            pma_addr: region.addr(),
            ..Self::rwx(region)
        }
    }
}

/// `[__noncacheable_start__, __noncacheable_end__)` as laid out by the linker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoncacheableRegion {
    /// First byte.
    pub start: u32,
    /// One past the last byte.
    pub end: u32,
}

impl NoncacheableRegion {
    /// Region from linker bounds.
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    pub fn len(&self) -> Result<u32, PmpError> {
        self.end.checked_sub(self.start).ok_or(PmpError::RegionInverted)
    }

    /// True when the linker placed nothing in the section.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The three boot entries for `region`, or `None` when the region is empty.
///
/// An empty region installs nothing at all, including the two broad entries.
///
/// # Errors
///
/// Any [`PmpError`] from validating `region` as a NAPOT region.
pub fn board_pmp_entries(region: NoncacheableRegion) -> Result<Option<[PmpEntry; 3]>, PmpError> {
    let len = region.len()?;
    if len == 0 {
        return Ok(None);
    }
    let nc = NapotRegion::new(region.start, len)?;
    Ok(Some([
        PmpEntry::rwx(NapotRegion::LOW_2G),
        PmpEntry::rwx(NapotRegion::HIGH_2G),
        PmpEntry::rwx_noncacheable(nc),
    ]))
}

/// PMP/PMA programming seam (`hpm_pmp_drv`).
pub trait PmpControl {
    /// Program `entries` into PMP/PMA slots `0..entries.len()` in one batch.
    fn pmp_config(&mut self, entries: &[PmpEntry]);
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_napot_broad_halves() {
        assert_eq!(napot_addr(0x0000_0000, 0x8000_0000), 0x0FFF_FFFF);
        assert_eq!(napot_addr(0x8000_0000, 0x8000_0000), 0x2FFF_FFFF);
    }

    #[test]
    fn test_napot_small_region() {
        // 256 KiB at 0x0108_0000: (0x0108_0000 | 0x1_FFFF) >> 2
        assert_eq!(napot_addr(0x0108_0000, 0x4_0000), 0x0042_7FFF);
    }

    #[test]
    fn test_pmp_cfg_rwx_napot_byte() {
        assert_eq!(PmpCfg::RWX_NAPOT.0, 0x1F);
        assert_eq!(PmpCfg::new(true, false, false, AddressMatch::Tor, true).0, 0x89);
    }

    #[test]
    fn test_pma_cfg_noncacheable_byte() {
        // ETYP=3, MTYP=3, NAMO=0
        assert_eq!(PmaCfg::NONCACHEABLE_BUF.0, 0x0F);
        assert_eq!(PmaCfg::new(AddressMatch::Napot, MemType::MemNonCacheBuf, false).0, 0x4F);
    }

    #[test]
    fn test_region_validation() {
        assert_eq!(NapotRegion::new(0, 0), Err(PmpError::SizeZero));
        assert_eq!(NapotRegion::new(0, 4), Err(PmpError::SizeTooSmall));
        assert_eq!(NapotRegion::new(0, 0x3000), Err(PmpError::SizeNotPowerOfTwo));
        assert_eq!(NapotRegion::new(0x1000, 0x4000), Err(PmpError::AddressMisaligned));
        assert!(NapotRegion::new(0x4000, 0x4000).is_ok());
    }

    #[test]
    fn test_empty_region_installs_nothing() {
        let r = NoncacheableRegion::new(0x0108_0000, 0x0108_0000);
        assert_eq!(board_pmp_entries(r), Ok(None));
    }

    #[test]
    fn test_inverted_region_rejected() {
        let r = NoncacheableRegion::new(0x0110_0000, 0x0108_0000);
        assert_eq!(board_pmp_entries(r), Err(PmpError::RegionInverted));
    }

    #[test]
    fn test_third_entry_matches_region() {
        let r = NoncacheableRegion::new(0x0108_0000, 0x010C_0000);
        let entries = board_pmp_entries(r).unwrap().unwrap();
        assert_eq!(entries[0].pmp_addr, 0x0FFF_FFFF);
        assert_eq!(entries[0].pma_cfg, PmaCfg::OFF);
        assert_eq!(entries[1].pmp_addr, 0x2FFF_FFFF);
        assert_eq!(entries[2].pmp_addr, napot_addr(0x0108_0000, 0x4_0000));
        assert_eq!(entries[2].pma_addr, entries[2].pmp_addr);
        assert_eq!(entries[2].pmp_cfg, PmpCfg::RWX_NAPOT);
        assert_eq!(entries[2].pma_cfg, PmaCfg::NONCACHEABLE_BUF);
    }

    #[test]
    fn test_unaligned_region_rejected() {
        // 256 KiB region starting on a 128 KiB boundary
        let r = NoncacheableRegion::new(0x0102_0000, 0x0106_0000);
        assert_eq!(board_pmp_entries(r), Err(PmpError::AddressMisaligned));
    }
}
