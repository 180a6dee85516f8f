//! GPIO pins used by a bus instance.

use crate::ral::{self, Static};

/// Pin configuration, the combined CNF and MODE nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum Mode {
    /// Floating input.
    InputFloating = 0b0100,
    /// General purpose push-pull output, 10 MHz.
    OutputPushPull10MHz = 0b0001,
    /// Alternate function push-pull output, 50 MHz.
    AlternatePushPull50MHz = 0b1011,
}

/// One pin of a GPIO port.
#[derive(Clone, Copy)]
pub struct Pin {
    port: Static<ral::gpio::RegisterBlock>,
    index: u8,
}

// Safety: a pin is a port address and a number. Writes go through the
// atomic set / reset registers, or through configuration registers that
// are only changed during init.
unsafe impl Send for Pin {}
unsafe impl Sync for Pin {}

impl Pin {
    /// Describe pin `index` of the port at `port`.
    ///
    /// # Safety
    ///
    /// `port` must point to a GPIO port register block. The pin must not be
    /// used by anything else.
    ///
    /// # Panics
    ///
    /// Panics if `index` isn't a valid pin number.
    pub const unsafe fn new(port: *const (), index: u8) -> Self {
        assert!(index < 16);
        Self {
            port: Static(port.cast()),
            index,
        }
    }

    /// Returns the pin number within its port.
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Configure the pin.
    pub fn set_mode(&self, mode: Mode) {
        let shift = u32::from(self.index % ral::gpio::PINS_PER_CR) * ral::gpio::BITS_PER_PIN;
        let update = |cr: u32| (cr & !(0b1111 << shift)) | ((mode as u32) << shift);
        if self.index < ral::gpio::PINS_PER_CR {
            ral::modify_reg!(ral::gpio, self.port, CRL, update);
        } else {
            ral::modify_reg!(ral::gpio, self.port, CRH, update);
        }
    }

    /// Drive the pin high.
    pub fn set_high(&self) {
        ral::write_reg!(ral::gpio, self.port, BSRR, 1 << self.index);
    }

    /// Drive the pin low.
    pub fn set_low(&self) {
        ral::write_reg!(ral::gpio, self.port, BRR, 1 << self.index);
    }
}

/// The four pins of a bus instance.
#[derive(Clone, Copy)]
pub struct Pins {
    /// Chip select, driven by software. Idles high.
    pub csn: Pin,
    /// Serial clock.
    pub sck: Pin,
    /// Data in.
    pub miso: Pin,
    /// Data out.
    pub mosi: Pin,
}
