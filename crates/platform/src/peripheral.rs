//! Peripheral instances of the HPM6360 and the pin-mux seam.
//!
//! Each instance type is a closed enum resolved once at the call site. The
//! register base and clock line of every instance come from a lookup table,
//! so board routines match on the enum instead of comparing pointers. Raw
//! base addresses (as handed over by C callers or device trees) convert with
//! `TryFrom<u32>`, which rejects addresses that match no instance.
//!
//! # Memory map (APB peripherals)
//!
//! | Block   | First base    | Stride   | Count |
//! |---------|---------------|----------|-------|
//! | GPTMR   | `0xF000_0000` | `0x4000` | 4     |
//! | I2C     | `0xF002_0000` | `0x4000` | 4     |
//! | SPI     | `0xF003_0000` | `0x4000` | 4     |
//! | UART    | `0xF004_0000` | `0x4000` | 8     |
//! | CAN     | `0xF008_0000` | `0x4000` | 2     |
//! | ADC16   | `0xF010_0000` | `0x4000` | 3     |
//! | DAC     | `0xF011_0000` | -        | 1     |
//! | ENET    | `0xF200_0000` | -        | 1     |
//! | SDXC    | `0xF203_0000` | -        | 1     |

use crate::clock::ClockName;
use crate::error::BoardError;
use crate::interrupt::Irq;

macro_rules! peripheral_instances {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $base:literal, $clock:ident;)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[allow(missing_docs)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Every instance, in index order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Register block base address.
            pub const fn base(self) -> u32 {
                match self {
                    $(Self::$variant => $base,)+
                }
            }

            /// Functional clock of the instance.
            pub const fn clock(self) -> ClockName {
                match self {
                    $(Self::$variant => ClockName::$clock,)+
                }
            }
        }

        impl TryFrom<u32> for $name {
            type Error = BoardError;

            fn try_from(base: u32) -> Result<Self, Self::Error> {
                match base {
                    $($base => Ok(Self::$variant),)+
                    _ => Err(BoardError::UnknownInstance(base)),
                }
            }
        }
    };
}

peripheral_instances! {
    /// UART controllers.
    Uart {
        Uart0 => 0xF004_0000, Uart0;
        Uart1 => 0xF004_4000, Uart1;
        Uart2 => 0xF004_8000, Uart2;
        Uart3 => 0xF004_C000, Uart3;
        Uart4 => 0xF005_0000, Uart4;
        Uart5 => 0xF005_4000, Uart5;
        Uart6 => 0xF005_8000, Uart6;
        Uart7 => 0xF005_C000, Uart7;
    }
}

peripheral_instances! {
    /// SPI controllers.
    Spi {
        Spi0 => 0xF003_0000, Spi0;
        Spi1 => 0xF003_4000, Spi1;
        Spi2 => 0xF003_8000, Spi2;
        Spi3 => 0xF003_C000, Spi3;
    }
}

peripheral_instances! {
    /// I2C controllers.
    I2c {
        I2c0 => 0xF002_0000, I2c0;
        I2c1 => 0xF002_4000, I2c1;
        I2c2 => 0xF002_8000, I2c2;
        I2c3 => 0xF002_C000, I2c3;
    }
}

peripheral_instances! {
    /// CAN controllers.
    Can {
        Can0 => 0xF008_0000, Can0;
        Can1 => 0xF008_4000, Can1;
    }
}

peripheral_instances! {
    /// 16-bit ADCs.
    Adc {
        Adc0 => 0xF010_0000, Adc0;
        Adc1 => 0xF010_4000, Adc1;
        Adc2 => 0xF010_8000, Adc2;
    }
}

peripheral_instances! {
    /// DAC.
    Dac {
        Dac0 => 0xF011_0000, Dac0;
    }
}

peripheral_instances! {
    /// Ethernet MAC.
    Enet {
        Enet0 => 0xF200_0000, Eth0;
    }
}

peripheral_instances! {
    /// SD/eMMC host controller.
    Sdxc {
        Sdxc0 => 0xF203_0000, Sdxc0;
    }
}

peripheral_instances! {
    /// General-purpose timers.
    Gptmr {
        Gptmr0 => 0xF000_0000, Gptmr0;
        Gptmr1 => 0xF000_4000, Gptmr1;
        Gptmr2 => 0xF000_8000, Gptmr2;
        Gptmr3 => 0xF000_C000, Gptmr3;
    }
}

impl Gptmr {
    /// External interrupt source of the timer.
    pub const fn irq(self) -> Irq {
        match self {
            Self::Gptmr0 => Irq(14),
            Self::Gptmr1 => Irq(15),
            Self::Gptmr2 => Irq(16),
            Self::Gptmr3 => Irq(17),
        }
    }

    /// Dense index (0..=3).
    pub const fn index(self) -> usize {
        match self {
            Self::Gptmr0 => 0,
            Self::Gptmr1 => 1,
            Self::Gptmr2 => 2,
            Self::Gptmr3 => 3,
        }
    }
}

/// A pin-mux table of the board, per peripheral instance where it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinGroup {
    /// UART TX/RX.
    Uart(Uart),
    /// SPI SCLK/MOSI/MISO/CS.
    Spi(Spi),
    /// SPI SCLK/MOSI/MISO with CS as a plain GPIO.
    SpiWithGpioCs(Spi),
    /// I2C SCL/SDA.
    I2c(I2c),
    /// I2C SCL/SDA as GPIO, used to clock out a stuck bus.
    I2cAsGpio(I2c),
    /// CAN TX/RX.
    Can(Can),
    /// SD card bus. `as_gpio` selects GPIO function for the data lines.
    Sdxc {
        /// Controller.
        sdxc: Sdxc,
        /// Route data lines as GPIO instead of SDXC.
        as_gpio: bool,
    },
    /// RMII pins of the Ethernet MAC.
    Enet(Enet),
    /// Analog inputs of all ADCs.
    Adc,
    /// DAC output.
    Dac(Dac),
    /// Board GPIO header pins.
    Gpio,
    /// SDRAM bus.
    Sdram,
    /// User LED.
    Led,
    /// USB0 ID (with pull-up) and VBUS pins.
    Usb,
}

/// Pin-mux seam (`pinmux.c` tables of the board).
pub trait PinMux {
    /// Route every pin of `group` to its function.
    fn init_pins(&mut self, group: PinGroup);
}

// ─── Tests ───────────────────────────────────────────────────────────────────
