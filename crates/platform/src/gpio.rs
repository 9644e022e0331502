//! GPIO pin addressing and the GPIO controller seam.
//!
//! Pads are numbered `port * 32 + pin` (`IOC_PAD_PA07` = 7, `IOC_PAD_PB00`
//! = 32). The GPIO controller addresses a pin by `(port, pin)`, so a pad
//! number splits as `port = pad >> 5`, `pin = pad & 0x1F`.

/// Logic level of a GPIO pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinLevel {
    /// Driven or read low.
    Low,
    /// Driven or read high.
    High,
}

impl PinLevel {
    /// The other level.
    pub const fn inverted(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }

    /// Register bit value (0 or 1).
    pub const fn bit(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }
}

impl From<bool> for PinLevel {
    fn from(high: bool) -> Self {
        if high {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<embedded_hal::digital::PinState> for PinLevel {
    fn from(s: embedded_hal::digital::PinState) -> Self {
        match s {
            embedded_hal::digital::PinState::Low => Self::Low,
            embedded_hal::digital::PinState::High => Self::High,
        }
    }
}

/// A GPIO pin as `(port, pin)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioPin {
    /// Port index (PA = 0, PB = 1, ...).
    pub port: u8,
    /// Pin within the port (0..=31).
    pub pin: u8,
}

impl GpioPin {
    /// Pin from a pad number.
    #[allow(clippy::cast_possible_truncation)] // pad >> 5 and pad & 0x1F fit u8 for every pad (< 8192)
    pub const fn from_pad(pad: u32) -> Self {
        Self {
            port: (pad >> 5) as u8,
            pin: (pad & 0x1F) as u8,
        }
    }

    /// Pad number of the pin.
    pub const fn pad(self) -> u32 {
        ((self.port as u32) << 5) | (self.pin as u32)
    }
}

/// GPIO controller seam (`hpm_gpio_drv`).
pub trait GpioControl {
    /// Configure `pin` as an output, level unchanged.
    fn set_pin_output(&mut self, pin: GpioPin);

    /// Configure `pin` as an output driving `initial`.
    fn set_pin_output_with_initial(&mut self, pin: GpioPin, initial: PinLevel);

    /// Configure `pin` as an input.
    fn set_pin_input(&mut self, pin: GpioPin);

    /// Drive `pin` to `level`.
    fn write_pin(&mut self, pin: GpioPin, level: PinLevel);

    /// Invert the driven level of `pin`.
    fn toggle_pin(&mut self, pin: GpioPin);

    /// Sample the input level of `pin`.
    fn read_pin(&self, pin: GpioPin) -> PinLevel;

    /// Level `pin` is currently driving.
    fn output_level(&self, pin: GpioPin) -> PinLevel;
}
