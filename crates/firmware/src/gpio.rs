//! Board GPIO helpers: the user LED, the SPI chip select, USB0 ID.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use hpm_platform::config::{BOARD_LED_ON_LEVEL, BOARD_LED_PIN, BOARD_USB0_ID_PIN};
use hpm_platform::{BoardError, GpioControl, GpioPin, PinGroup, PinLevel, PinMux};

/// Route the LED pin and make it an output.
pub fn init_led_pins<S: PinMux + GpioControl>(soc: &mut S) {
    soc.init_pins(PinGroup::Led);
    soc.set_pin_output(BOARD_LED_PIN);
}

/// Invert the LED.
pub fn led_toggle<G: GpioControl>(soc: &mut G) {
    soc.toggle_pin(BOARD_LED_PIN);
}

/// Drive the LED pin to `level`.
pub fn led_write<G: GpioControl>(soc: &mut G, level: PinLevel) {
    soc.write_pin(BOARD_LED_PIN, level);
}

/// Drive a chip-select pad.
pub fn write_spi_cs<G: GpioControl>(soc: &mut G, pad: u32, level: PinLevel) {
    soc.write_pin(GpioPin::from_pad(pad), level);
}

/// Route the USB0 pins (ID pulled up) and read ID as a GPIO input.
pub fn init_usb_pins<S: PinMux + GpioControl>(soc: &mut S) {
    soc.init_pins(PinGroup::Usb);
    soc.set_pin_input(BOARD_USB0_ID_PIN);
}

/// Level on the USB0 ID pin. Low means an A-plug (host role).
pub fn usb_id_status<G: GpioControl>(soc: &G) -> PinLevel {
    soc.read_pin(BOARD_USB0_ID_PIN)
}

/// VBUS is hardwired on this board.
pub fn usb_vbus_ctrl(_usb_index: u8, _level: PinLevel) -> Result<(), BoardError> {
    Err(BoardError::NotSupported)
}

/// The user LED as an `embedded-hal` output pin.
///
/// `set_high`/`set_low` drive the electrical level; [`Led::on`] and
/// [`Led::off`] account for the board's on-level.
pub struct Led<'a, G: GpioControl> {
    gpio: &'a mut G,
}

impl<'a, G: GpioControl> Led<'a, G> {
    /// Borrow the GPIO controller for the LED. The pin must already be an
    /// output (see [`init_led_pins`]).
    pub fn new(gpio: &'a mut G) -> Self {
        Self { gpio }
    }

    /// Light the LED.
    pub fn on(&mut self) {
        self.gpio.write_pin(BOARD_LED_PIN, BOARD_LED_ON_LEVEL);
    }

    /// Turn the LED off.
    pub fn off(&mut self) {
        self.gpio.write_pin(BOARD_LED_PIN, BOARD_LED_ON_LEVEL.inverted());
    }

    /// True while lit.
    pub fn is_on(&self) -> bool {
        self.gpio.output_level(BOARD_LED_PIN) == BOARD_LED_ON_LEVEL
    }
}

impl<G: GpioControl> ErrorType for Led<'_, G> {
    type Error = Infallible;
}

impl<G: GpioControl> OutputPin for Led<'_, G> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.gpio.write_pin(BOARD_LED_PIN, PinLevel::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.gpio.write_pin(BOARD_LED_PIN, PinLevel::High);
        Ok(())
    }
}

impl<G: GpioControl> StatefulOutputPin for Led<'_, G> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.gpio.output_level(BOARD_LED_PIN) == PinLevel::High)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.gpio.output_level(BOARD_LED_PIN) == PinLevel::Low)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.gpio.toggle_pin(BOARD_LED_PIN);
        Ok(())
    }
}
