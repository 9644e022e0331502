//! Boot-image header blocks.
//!
//! The boot ROM reads the NOR configuration option from `.nor_cfg_option`
//! when the image runs in place from the XPI flash; UF2 bootloaders check
//! the family signature in `.uf2_signature`. The linker script places both
//! sections; they are only emitted when the matching feature is enabled.

#[cfg(feature = "flash-uf2")]
use hpm_platform::config::BOARD_UF2_SIGNATURE;
#[cfg(feature = "flash-xip")]
use hpm_platform::flash_config::BOARD_NOR_CFG_OPTION;

/// XPI NOR configuration option read by the boot ROM.
#[cfg(feature = "flash-xip")]
#[used]
#[cfg_attr(target_os = "none", link_section = ".nor_cfg_option")]
pub static NOR_CFG_OPTION: [u32; 4] = BOARD_NOR_CFG_OPTION;

/// UF2 family signature.
#[cfg(feature = "flash-uf2")]
#[used]
#[cfg_attr(target_os = "none", link_section = ".uf2_signature")]
pub static UF2_SIGNATURE: u32 = BOARD_UF2_SIGNATURE;

#[cfg(test)]
mod tests {
    use hpm_platform::flash_config::{XpiNorCfgOption, BOARD_NOR_CFG_OPTION};

    #[test]
    fn test_nor_option_words() {
        assert_eq!(BOARD_NOR_CFG_OPTION, [0xfcf9_0001, 0x0000_0007, 0, 0]);
        let decoded = XpiNorCfgOption::decode(BOARD_NOR_CFG_OPTION);
        assert_eq!(decoded, Ok(XpiNorCfgOption::board()));
    }

    #[cfg(feature = "flash-xip")]
    #[test]
    fn test_emitted_block_matches_board_option() {
        assert_eq!(super::NOR_CFG_OPTION, BOARD_NOR_CFG_OPTION);
    }

    #[cfg(feature = "flash-uf2")]
    #[test]
    fn test_emitted_signature() {
        assert_eq!(super::UF2_SIGNATURE, 0x0A4D_5048);
    }
}
