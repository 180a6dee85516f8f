//! Static association of each SPI peripheral with its DMA channels,
//! clocks, and remaps.
//!
//! The bindings are configuration data. They're fixed at compile time, and
//! [`priorities_distinct`] can check a board's set of bindings in a `const`
//! context:
//!
//! ```
//! use stm32f1_spi::binding::{self, Binding, Remap};
//!
//! const FLASH: Binding = Binding::SPI1.with_remap(Remap::SPI1_PB3_PB5);
//! const RADIO: Binding = Binding::SPI2;
//!
//! const _: () = assert!(binding::priorities_distinct(&[FLASH, RADIO]));
//! ```

use crate::ral::{self, Static};

/// One of the SPI peripherals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Instance {
    Spi1,
    Spi2,
    Spi3,
}

impl Instance {
    /// Number of SPI peripherals.
    pub const COUNT: usize = 3;

    /// Position of this instance in tables indexed by instance.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One of the DMA controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Controller {
    Dma1,
    Dma2,
}

/// The DMA channel priority level, the PL field of CCR.
///
/// Each bus instance programs its priority into both of its channels.
/// Instances that share a controller must use different priorities;
/// equal priorities across SPI peripherals have been seen to hang the
/// controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum Priority {
    Low = 0,
    Medium = 1,
    High = 2,
    VeryHigh = 3,
}

impl Priority {
    pub(crate) const fn bits(self) -> u32 {
        self as u32
    }
}

/// Which peripheral clock enable register holds an instance's enable bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Clock {
    /// Bit `n` of APB1ENR.
    Apb1(u32),
    /// Bit `n` of APB2ENR.
    Apb2(u32),
}

/// Bits to set in AFIO MAPR once the pins are in alternate function mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Remap(u32);

impl Remap {
    /// No remap.
    pub const NONE: Remap = Remap(0);
    /// SPI1 on PB3..PB5. Disables JTAG and SWD, which also share those pins.
    pub const SPI1_PB3_PB5: Remap = Remap(
        (ral::afio::MAPR::SWJ_CFG::RW::AllDisabled << ral::afio::MAPR::SWJ_CFG::offset)
            | ral::afio::MAPR::SPI1_REMAP::mask,
    );
    /// SPI3 on PC10..PC12.
    pub const SPI3_PC10_PC12: Remap = Remap(ral::afio::MAPR::SPI3_REMAP::mask);

    /// The raw MAPR bits.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// The hardware a bus instance is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Binding {
    /// The SPI peripheral.
    pub instance: Instance,
    /// The controller that serves both DMA channels.
    pub controller: Controller,
    /// Zero-based receive channel.
    pub rx_channel: usize,
    /// Zero-based transmit channel.
    pub tx_channel: usize,
    /// DMA priority for both channels.
    pub priority: Priority,
    /// Peripheral clock enable.
    pub clock: Clock,
    /// Pin remap, applied during init.
    pub remap: Remap,
}

impl Binding {
    /// SPI1 on DMA1 channels 2 (receive) and 3 (transmit).
    pub const SPI1: Binding = Binding {
        instance: Instance::Spi1,
        controller: Controller::Dma1,
        rx_channel: 1,
        tx_channel: 2,
        priority: Priority::Medium,
        clock: Clock::Apb2(ral::rcc::APB2ENR::SPI1EN::offset),
        remap: Remap::NONE,
    };
    /// SPI2 on DMA1 channels 4 (receive) and 5 (transmit).
    pub const SPI2: Binding = Binding {
        instance: Instance::Spi2,
        controller: Controller::Dma1,
        rx_channel: 3,
        tx_channel: 4,
        priority: Priority::High,
        clock: Clock::Apb1(ral::rcc::APB1ENR::SPI2EN::offset),
        remap: Remap::NONE,
    };
    /// SPI3 on DMA2 channels 1 (receive) and 2 (transmit).
    pub const SPI3: Binding = Binding {
        instance: Instance::Spi3,
        controller: Controller::Dma2,
        rx_channel: 0,
        tx_channel: 1,
        priority: Priority::VeryHigh,
        clock: Clock::Apb1(ral::rcc::APB1ENR::SPI3EN::offset),
        remap: Remap::NONE,
    };

    /// Replace the DMA priority.
    pub const fn with_priority(self, priority: Priority) -> Self {
        Self { priority, ..self }
    }

    /// Replace the pin remap.
    pub const fn with_remap(self, remap: Remap) -> Self {
        Self { remap, ..self }
    }

    /// Returns `true` if both bindings use the same controller and priority.
    pub const fn collides_with(&self, other: &Binding) -> bool {
        self.controller as u8 == other.controller as u8
            && self.priority as u32 == other.priority as u32
    }
}

/// The default bindings, indexed by [`Instance::index`].
pub const BINDINGS: [Binding; Instance::COUNT] = [Binding::SPI1, Binding::SPI2, Binding::SPI3];

const _: () = assert!(priorities_distinct(&BINDINGS));

/// Returns `true` if no two bindings on the same DMA controller share a
/// priority.
pub const fn priorities_distinct(bindings: &[Binding]) -> bool {
    let mut i = 0;
    while i < bindings.len() {
        let mut j = i + 1;
        while j < bindings.len() {
            if bindings[i].collides_with(&bindings[j]) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// The system blocks touched while bringing up a bus: clock control and
/// alternate function remapping.
pub struct Platform {
    pub(crate) rcc: Static<ral::rcc::RegisterBlock>,
    pub(crate) afio: Static<ral::afio::RegisterBlock>,
}

impl Platform {
    /// # Safety
    ///
    /// `rcc` and `afio` must point to the RCC and AFIO register blocks. Bus
    /// initialization modifies both; don't race it with other writers.
    pub const unsafe fn new(rcc: *const (), afio: *const ()) -> Self {
        Self {
            rcc: Static(rcc.cast()),
            afio: Static(afio.cast()),
        }
    }

    pub(crate) fn enable_clock(&self, clock: Clock) {
        match clock {
            Clock::Apb1(bit) => ral::modify_reg!(ral::rcc, self.rcc, APB1ENR, |r| r | (1 << bit)),
            Clock::Apb2(bit) => ral::modify_reg!(ral::rcc, self.rcc, APB2ENR, |r| r | (1 << bit)),
        }
    }

    pub(crate) fn apply_remap(&self, remap: Remap) {
        if remap != Remap::NONE {
            ral::modify_reg!(ral::afio, self.afio, MAPR, |r| r | remap.bits());
        }
    }
}
