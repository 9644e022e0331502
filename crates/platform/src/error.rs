//! Board error type.
//!
//! Every board routine reports failure through [`BoardError`]. Routines that
//! are handed a peripheral instance they do not support return
//! [`BoardError::UnsupportedInstance`] before touching any register, so a
//! caller can always tell "nothing happened" apart from "configured".

use thiserror_no_std::Error;

use crate::pmp::PmpError;
use crate::sdram::SdramConfigError;

/// Raw status code returned by a vendor driver call (`hpm_stat_t`).
///
/// Zero is success in the vendor convention; the seam traits only hand a
/// `HalStatus` back on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HalStatus(pub u32);

impl HalStatus {
    /// `status_fail`
    pub const FAIL: Self = Self(1);
    /// `status_invalid_argument`
    pub const INVALID_ARGUMENT: Self = Self(2);
}

/// Errors surfaced by board bring-up and the per-peripheral routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    /// The routine does not handle this peripheral instance on this board.
    #[error("peripheral instance not supported by this routine")]
    UnsupportedInstance,
    /// A raw register base address matched no known peripheral instance.
    #[error("unknown peripheral base address {0:#010x}")]
    UnknownInstance(u32),
    /// The board has no hardware for the requested feature.
    #[error("feature not supported on this board")]
    NotSupported,
    /// The console driver rejected its configuration.
    #[error("console initialisation failed")]
    Console,
    /// The build selects no console.
    #[error("no console configured")]
    ConsoleAbsent,
    /// The non-cacheable region cannot be expressed as a NAPOT entry.
    #[error("invalid PMP region: {0}")]
    Pmp(PmpError),
    /// The SDRAM configuration failed validation.
    #[error("invalid SDRAM configuration: {0}")]
    Sdram(SdramConfigError),
    /// The DRAM controller rejected the SDRAM configuration.
    #[error("DRAM controller returned status {0}")]
    Dram(u32),
    /// Every slot of the timer handler table is taken.
    #[error("timer handler table full")]
    TimerTableFull,
    /// The timer channel already has a handler registered.
    #[error("timer channel already has a handler")]
    TimerChannelTaken,
}

impl From<PmpError> for BoardError {
    fn from(e: PmpError) -> Self {
        Self::Pmp(e)
    }
}

impl From<SdramConfigError> for BoardError {
    fn from(e: SdramConfigError) -> Self {
        Self::Sdram(e)
    }
}

impl BoardError {
    /// Short static label, for log sinks that avoid `Debug`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedInstance => "unsupported instance",
            Self::UnknownInstance(_) => "unknown instance",
            Self::NotSupported => "not supported",
            Self::Console => "console init failed",
            Self::ConsoleAbsent => "no console",
            Self::Pmp(_) => "invalid PMP region",
            Self::Sdram(_) => "invalid SDRAM config",
            Self::Dram(_) => "DRAM controller error",
            Self::TimerTableFull => "timer table full",
            Self::TimerChannelTaken => "timer channel taken",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pmp_error_converts_with_context() {
        let e: BoardError = PmpError::SizeNotPowerOfTwo.into();
        assert_eq!(e, BoardError::Pmp(PmpError::SizeNotPowerOfTwo));
        assert_eq!(e.as_str(), "invalid PMP region");
    }

    #[test]
    fn test_unknown_instance_display_shows_address() {
        let msg = BoardError::UnknownInstance(0xF004_8000).to_string();
        assert!(msg.contains("0xf0048000"), "got: {msg}");
    }
}
