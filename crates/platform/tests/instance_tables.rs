//! Peripheral instance tables and the boot-image option words.

// Test file: indexing is an intentional test mechanism.
#![allow(clippy::indexing_slicing)]

use hpm_platform::flash_config::{XpiNorCfgOption, BOARD_NOR_CFG_OPTION};
use hpm_platform::{Adc, BoardError, Can, ClockName, Gptmr, I2c, Irq, Spi, Uart};

#[test]
fn every_instance_base_round_trips() {
    for &uart in Uart::ALL {
        assert_eq!(Uart::try_from(uart.base()), Ok(uart));
    }
    for &spi in Spi::ALL {
        assert_eq!(Spi::try_from(spi.base()), Ok(spi));
    }
    for &i2c in I2c::ALL {
        assert_eq!(I2c::try_from(i2c.base()), Ok(i2c));
    }
    for &can in Can::ALL {
        assert_eq!(Can::try_from(can.base()), Ok(can));
    }
    for &adc in Adc::ALL {
        assert_eq!(Adc::try_from(adc.base()), Ok(adc));
    }
    for &tmr in Gptmr::ALL {
        assert_eq!(Gptmr::try_from(tmr.base()), Ok(tmr));
    }
}

#[test]
fn off_stride_base_is_unknown() {
    assert_eq!(Uart::try_from(0xF004_0004), Err(BoardError::UnknownInstance(0xF004_0004)));
    assert_eq!(Spi::try_from(0), Err(BoardError::UnknownInstance(0)));
}

#[test]
fn instance_clock_lines() {
    assert_eq!(Uart::Uart0.clock(), ClockName::Uart0);
    assert_eq!(Spi::Spi3.clock(), ClockName::Spi3);
    assert_eq!(Can::Can1.clock(), ClockName::Can1);
    assert_eq!(Gptmr::Gptmr3.clock(), ClockName::Gptmr3);
}

#[test]
fn board_timer_irq_line() {
    assert_eq!(Gptmr::Gptmr3.irq(), Irq(17));
    assert_eq!(Gptmr::ALL.len(), 4);
}

#[test]
fn nor_option_words_decode_to_board_option() {
    assert_eq!(BOARD_NOR_CFG_OPTION[0] >> 20, 0xfcf);
    assert_eq!(XpiNorCfgOption::decode(BOARD_NOR_CFG_OPTION), Ok(XpiNorCfgOption::board()));
    assert_eq!(XpiNorCfgOption::board().encode(), BOARD_NOR_CFG_OPTION);
}
