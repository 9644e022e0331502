//! Pin-mux routines.
//!
//! Thin wrappers that pick the board pin table for an instance. Routines
//! that also need a GPIO set up (SPI with a GPIO chip select) do that right
//! after routing the pins.

use hpm_platform::config::{BOARD_SPI_CS_ACTIVE_LEVEL, BOARD_SPI_CS_PAD};
use hpm_platform::{
    Can, Dac, Enet, GpioControl, GpioPin, I2c, PinGroup, PinMux, Sdxc, Spi, Uart,
};

/// UART TX/RX.
pub fn init_uart_pins<P: PinMux>(soc: &mut P, uart: Uart) {
    soc.init_pins(PinGroup::Uart(uart));
}

/// SPI with the controller driving CS.
pub fn init_spi_pins<P: PinMux>(soc: &mut P, spi: Spi) {
    soc.init_pins(PinGroup::Spi(spi));
}

/// SPI with CS as a GPIO, left deasserted.
pub fn init_spi_pins_with_gpio_as_cs<S: PinMux + GpioControl>(soc: &mut S, spi: Spi) {
    soc.init_pins(PinGroup::SpiWithGpioCs(spi));
    soc.set_pin_output_with_initial(
        GpioPin::from_pad(BOARD_SPI_CS_PAD),
        BOARD_SPI_CS_ACTIVE_LEVEL.inverted(),
    );
}

/// I2C SCL/SDA.
pub fn init_i2c<P: PinMux>(soc: &mut P, i2c: I2c) {
    soc.init_pins(PinGroup::I2c(i2c));
}

/// Hand the I2C lines to GPIO so a stuck slave can be clocked free.
pub fn i2c_bus_clear<P: PinMux>(soc: &mut P, i2c: I2c) {
    soc.init_pins(PinGroup::I2cAsGpio(i2c));
}

/// CAN TX/RX.
pub fn init_can<P: PinMux>(soc: &mut P, can: Can) {
    soc.init_pins(PinGroup::Can(can));
}

/// GPIO header pins.
pub fn init_gpio_pins<P: PinMux>(soc: &mut P) {
    soc.init_pins(PinGroup::Gpio);
}

/// SD card bus, data lines on the SDXC function.
pub fn init_sd_pins<P: PinMux>(soc: &mut P, sdxc: Sdxc) {
    soc.init_pins(PinGroup::Sdxc { sdxc, as_gpio: false });
}

/// RMII pins.
pub fn init_enet_pins<P: PinMux>(soc: &mut P, enet: Enet) {
    soc.init_pins(PinGroup::Enet(enet));
}

/// ADC16 analog inputs.
pub fn init_adc16_pins<P: PinMux>(soc: &mut P) {
    soc.init_pins(PinGroup::Adc);
}

/// DAC output.
pub fn init_dac_pins<P: PinMux>(soc: &mut P, dac: Dac) {
    soc.init_pins(PinGroup::Dac(dac));
}

/// SDRAM bus.
pub fn init_sdram_pins<P: PinMux>(soc: &mut P) {
    soc.init_pins(PinGroup::Sdram);
}
