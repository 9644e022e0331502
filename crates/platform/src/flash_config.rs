//! XPI NOR flash configuration option words for execute-in-place boot.
//!
//! The boot ROM reads four words from the `.nor_cfg_option` section of an
//! XIP image and uses them to probe and configure the serial NOR flash
//! before jumping to the application.
//!
//! # Word layout
//!
//! ```text
//! option[0]  [31:16] tag 0xFCF9   [15:4] reserved   [3:0] words that follow
//! option[1]  [31:28] probe type   [27:24] pads after POR   [23:20] pads after config
//!            [19:16] QE sequence  [15:8] dummy cycles      [7:4] misc   [3:0] frequency
//! option[2]  [19:16] IO voltage   [15:12] pin group        [11:8] connection
//!            [7:0] drive strength                 (read only if word count > 1)
//! option[3]  [7:0] flash size                     (read only if word count > 2,
//!                                                  for flash without JESD216)
//! ```
//!
//! The HPM6300EVK flash supports SFDP, so the board needs only `option[1]`:
//! SFDP SDR probe, SPI pads, auto dummy cycles, 133 MHz.

use thiserror_no_std::Error;

/// `option[0]` tag.
pub const XPI_NOR_CFG_OPTION_TAG: u32 = 0xFCF9;

/// Option decoding error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashOptionError {
    /// `option[0]` does not carry the 0xFCF9 tag.
    #[error("missing 0xFCF9 option tag")]
    BadTag,
    /// Word count is zero or above three.
    #[error("option word count out of range")]
    WordCount,
    /// A field holds a value with no meaning. The `field` string names it.
    #[error("invalid value in field {field}")]
    Field {
        /// Name of the offending field.
        field: &'static str,
    },
}

macro_rules! option_field {
    ($(#[$meta:meta])* $name:ident : $field:literal { $($(#[$vm:meta])* $variant:ident = $val:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub enum $name {
            $($(#[$vm])* $variant = $val,)+
        }

        impl $name {
            const fn bits(self) -> u32 {
                self as u32
            }

            fn from_bits(bits: u32) -> Result<Self, FlashOptionError> {
                match bits {
                    $($val => Ok(Self::$variant),)+
                    _ => Err(FlashOptionError::Field { field: $field }),
                }
            }
        }
    };
}

option_field! {
    /// How the boot ROM discovers the flash.
    FlashProbeType: "probe_type" {
        /// SFDP, single data rate.
        SfdpSdr = 0,
        /// SFDP, double data rate.
        SfdpDdr = 1,
        /// 1-4-4 read (0xEB), 24-bit address.
        Read144 = 2,
        /// 1-2-2 read (0xBB), 24-bit address.
        Read122 = 3,
        /// HyperFLASH at 1.8 V.
        HyperFlash1v8 = 4,
        /// HyperFLASH at 3 V.
        HyperFlash3v = 5,
        /// OctaBus DDR.
        OctaBusDdr = 6,
        /// Xccela DDR.
        XccelaDdr = 8,
        /// EcoXiP DDR.
        EcoXipDdr = 10,
    }
}

option_field! {
    /// Command pad width.
    CommandPads: "command_pads" {
        /// Single.
        Spi = 0,
        /// Dual.
        Dpi = 1,
        /// Quad.
        Qpi = 2,
        /// Octal.
        Opi = 3,
    }
}

option_field! {
    /// Quad-enable sequence, for SFDP 1.0 devices.
    QuadEnable: "quad_enable" {
        /// Nothing to do.
        NotNeeded = 0,
        /// QE is bit 6 of status register 1.
        Sr1Bit6 = 1,
        /// QE is bit 1 of status register 2.
        Sr2Bit1 = 2,
        /// QE is bit 7 of status register 2.
        Sr2Bit7 = 3,
        /// QE is bit 1 of status register 2, written with 0x31.
        Sr2Bit1Via31 = 4,
    }
}

option_field! {
    /// Read strobe options.
    FlashMisc: "misc" {
        /// None.
        NotUsed = 0,
        /// Stay in SPI mode.
        SpiMode = 1,
        /// Internal loopback strobe.
        InternalLoopback = 2,
        /// External DQS strobe.
        ExternalDqs = 3,
    }
}

option_field! {
    /// Flash clock.
    FlashFrequency: "frequency" {
        /// 30 MHz.
        Mhz30 = 1,
        /// 50 MHz.
        Mhz50 = 2,
        /// 66 MHz.
        Mhz66 = 3,
        /// 80 MHz.
        Mhz80 = 4,
        /// 100 MHz.
        Mhz100 = 5,
        /// 120 MHz.
        Mhz120 = 6,
        /// 133 MHz.
        Mhz133 = 7,
        /// 166 MHz.
        Mhz166 = 8,
    }
}

option_field! {
    /// Pad supply of the flash bank.
    IoVoltage: "io_voltage" {
        /// 3.3 V.
        V3 = 0,
        /// 1.8 V.
        V1_8 = 1,
    }
}

option_field! {
    /// XPI pin group.
    XpiPinGroup: "pin_group" {
        /// First group.
        First = 0,
        /// Second group.
        Second = 1,
    }
}

option_field! {
    /// Which chip selects carry flash.
    FlashConnection: "connection" {
        /// Port A, CS0.
        CaCs0 = 0,
        /// Port B, CS0.
        CbCs0 = 1,
        /// One flash on each port.
        CaCs0CbCs0 = 2,
    }
}

option_field! {
    /// Flash size, for devices without JESD216 tables.
    FlashSize: "flash_size" {
        /// 4 MiB.
        Mb4 = 0,
        /// 8 MiB.
        Mb8 = 1,
        /// 16 MiB.
        Mb16 = 2,
    }
}

/// `option[2]` contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashPort {
    /// Pad supply.
    pub io_voltage: IoVoltage,
    /// Pin group.
    pub pin_group: XpiPinGroup,
    /// Chip-select wiring.
    pub connection: FlashConnection,
    /// Pad drive strength; 0 keeps the default.
    pub drive_strength: u8,
}

impl FlashPort {
    /// Port A CS0 at 3.3 V, default drive: what an absent `option[2]` means.
    pub const DEFAULT: Self = Self {
        io_voltage: IoVoltage::V3,
        pin_group: XpiPinGroup::First,
        connection: FlashConnection::CaCs0,
        drive_strength: 0,
    };
}

/// Decoded XPI NOR configuration option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct XpiNorCfgOption {
    /// Probe method.
    pub probe: FlashProbeType,
    /// Command pads right after power-on reset.
    pub pads_after_por: CommandPads,
    /// Command pads once configured.
    pub pads_after_config: CommandPads,
    /// Quad-enable sequence.
    pub quad_enable: QuadEnable,
    /// Dummy cycles; 0 lets the ROM probe them.
    pub dummy_cycles: u8,
    /// Strobe options.
    pub misc: FlashMisc,
    /// Flash clock.
    pub frequency: FlashFrequency,
    /// `option[2]`, when present.
    pub port: Option<FlashPort>,
    /// `option[3]`, when present.
    pub flash_size: Option<FlashSize>,
}

impl XpiNorCfgOption {
    /// The HPM6300EVK on-board flash.
    pub const fn board() -> Self {
        Self {
            probe: FlashProbeType::SfdpSdr,
            pads_after_por: CommandPads::Spi,
            pads_after_config: CommandPads::Spi,
            quad_enable: QuadEnable::NotNeeded,
            dummy_cycles: 0,
            misc: FlashMisc::NotUsed,
            frequency: FlashFrequency::Mhz133,
            port: None,
            flash_size: None,
        }
    }

    /// Number of words after `option[0]`.
    pub const fn word_count(&self) -> u32 {
        if self.flash_size.is_some() {
            3
        } else if self.port.is_some() {
            2
        } else {
            1
        }
    }

    /// Encode as the four words the boot ROM reads.
    pub const fn encode(&self) -> [u32; 4] {
        let header = (XPI_NOR_CFG_OPTION_TAG << 16) | self.word_count();
        let opt1 = (self.probe.bits() << 28)
            | (self.pads_after_por.bits() << 24)
            | (self.pads_after_config.bits() << 20)
            | (self.quad_enable.bits() << 16)
            | ((self.dummy_cycles as u32) << 8)
            | (self.misc.bits() << 4)
            | self.frequency.bits();
        let opt2 = match (self.port, self.flash_size) {
            (Some(p), _) => encode_port(p),
            (None, Some(_)) => encode_port(FlashPort::DEFAULT),
            (None, None) => 0,
        };
        let opt3 = match self.flash_size {
            Some(s) => s.bits(),
            None => 0,
        };
        [header, opt1, opt2, opt3]
    }

    /// Decode option words.
    ///
    /// # Errors
    ///
    /// [`FlashOptionError`] naming the first bad tag, count or field.
    pub fn decode(words: [u32; 4]) -> Result<Self, FlashOptionError> {
        let [header, opt1, opt2, opt3] = words;
        if header >> 16 != XPI_NOR_CFG_OPTION_TAG {
            return Err(FlashOptionError::BadTag);
        }
        let count = header & 0xF;
        if count == 0 || count > 3 {
            return Err(FlashOptionError::WordCount);
        }
        let port = if count >= 2 {
            Some(FlashPort {
                io_voltage: IoVoltage::from_bits((opt2 >> 16) & 0xF)?,
                pin_group: XpiPinGroup::from_bits((opt2 >> 12) & 0xF)?,
                connection: FlashConnection::from_bits((opt2 >> 8) & 0xF)?,
                drive_strength: low_byte(opt2),
            })
        } else {
            None
        };
        let flash_size = if count == 3 {
            Some(FlashSize::from_bits(opt3 & 0xFF)?)
        } else {
            None
        };
        Ok(Self {
            probe: FlashProbeType::from_bits(opt1 >> 28)?,
            pads_after_por: CommandPads::from_bits((opt1 >> 24) & 0xF)?,
            pads_after_config: CommandPads::from_bits((opt1 >> 20) & 0xF)?,
            quad_enable: QuadEnable::from_bits((opt1 >> 16) & 0xF)?,
            dummy_cycles: low_byte(opt1 >> 8),
            misc: FlashMisc::from_bits((opt1 >> 4) & 0xF)?,
            frequency: FlashFrequency::from_bits(opt1 & 0xF)?,
            port,
            flash_size,
        })
    }
}

const fn encode_port(p: FlashPort) -> u32 {
    (p.io_voltage.bits() << 16)
        | (p.pin_group.bits() << 12)
        | (p.connection.bits() << 8)
        | (p.drive_strength as u32)
}

#[allow(clippy::cast_possible_truncation)] // masked to 8 bits
const fn low_byte(v: u32) -> u8 {
    (v & 0xFF) as u8
}

/// Option words placed in `.nor_cfg_option` of XIP images.
pub const BOARD_NOR_CFG_OPTION: [u32; 4] = XpiNorCfgOption::board().encode();

// ─── Tests ───────────────────────────────────────────────────────────────────
