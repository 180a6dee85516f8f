//! The DMA controller driver.
//!
//! This is the small slice of a DMA abstraction that the SPI bus depends on:
//!
//! - a [`Dma`] object for each controller, placed in a static.
//! - [`Channel`] handles that expose the configuration, count, and address
//!   registers of one channel.
//! - per-channel [`Handler`] registration, and [`Dma::on_interrupt`] to
//!   demultiplex a channel interrupt to its handler.
//!
//! [`Spi`](crate::Spi) leases two channels per bus. The remaining channels
//! are free for other drivers, which use the same handles and read back
//! channel state through the `Channel` getters.
//!
//! ```no_run
//! use stm32f1_spi::{dma::Dma, ral};
//!
//! // Safety: DMA1 is a seven channel controller at this address.
//! static DMA1: Dma<7> = unsafe { Dma::new(ral::dma::DMA1) };
//!
//! // From the DMA1_Channel2 interrupt handler:
//! DMA1.on_interrupt(1);
//! ```

mod channel;

pub use channel::Channel;

use crate::interrupt::{self, SharedSlot};
use crate::ral::{self, Static};

/// Interrupt flags of one channel, captured when its interrupt fired.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(u32);

impl Status {
    pub(crate) const fn new(flags: u32) -> Self {
        Self(flags & 0b1111)
    }
    /// The channel finished its transfer.
    pub const fn is_complete(self) -> bool {
        self.0 & ral::dma::ISR::TCIF != 0
    }
    /// The channel moved half of its transfer.
    pub const fn is_half(self) -> bool {
        self.0 & ral::dma::ISR::HTIF != 0
    }
    /// The channel hit a bus error. The hardware disables the channel.
    pub const fn is_error(self) -> bool {
        self.0 & ral::dma::ISR::TEIF != 0
    }
    /// The raw flag group, GIF in bit 0.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl core::fmt::Debug for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Status")
            .field("complete", &self.is_complete())
            .field("half", &self.is_half())
            .field("error", &self.is_error())
            .finish()
    }
}

/// A channel interrupt handler.
///
/// The handler runs in interrupt context with the parameter supplied at
/// registration and the channel's [`Status`].
#[derive(Clone, Copy)]
pub struct Handler {
    callback: fn(*const (), Status),
    param: *const (),
}

// Safety: the parameter is opaque. It's only dereferenced by the callback
// it was registered with.
unsafe impl Send for Handler {}

impl Handler {
    /// Pair a callback with the parameter it receives.
    pub const fn new(callback: fn(*const (), Status), param: *const ()) -> Self {
        Self { callback, param }
    }
}

const NO_HANDLER: SharedSlot<Handler> = interrupt::empty_slot();

/// A DMA controller driver.
///
/// `CHANNELS` is the number of channels the controller implements: seven
/// for DMA1, five for DMA2. It bounds channel allocation.
pub struct Dma<const CHANNELS: usize> {
    controller: Static<ral::dma::RegisterBlock>,
    handlers: [SharedSlot<Handler>; CHANNELS],
}

// Safety: OK to allocate a DMA driver in a static context.
unsafe impl<const CHANNELS: usize> Sync for Dma<CHANNELS> {}

impl<const CHANNELS: usize> Dma<CHANNELS> {
    /// Create the DMA driver.
    ///
    /// This can evaluate at compile time.
    ///
    /// # Safety
    ///
    /// `controller` must point to the start of a DMA controller register
    /// block, and `CHANNELS` must not exceed the number of channels that
    /// controller implements.
    pub const unsafe fn new(controller: *const ()) -> Self {
        assert!(CHANNELS <= 7);
        Self {
            controller: Static(controller.cast()),
            handlers: [NO_HANDLER; CHANNELS],
        }
    }

    /// Creates the DMA channel described by `index`.
    ///
    /// `index` is zero based: DMA1 channel 2 is index 1.
    ///
    /// # Safety
    ///
    /// This will create a handle that may alias global, mutable state. You should only create
    /// one channel per index. If there are multiple channels for the same index, you're
    /// responsible for ensuring synchronized access.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than or equal to the maximum number of channels.
    pub unsafe fn channel(&'static self, index: usize) -> Channel {
        assert!(index < CHANNELS);
        Channel::new(index, self.controller, &self.handlers[index])
    }

    /// Handle the interrupt of channel `index`.
    ///
    /// Call this from the channel's interrupt vector. It captures and
    /// clears the channel's flags, then runs the registered handler, if
    /// any.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than or equal to the maximum number of channels.
    pub fn on_interrupt(&self, index: usize) {
        assert!(index < CHANNELS);
        let shift = index as u32 * ral::dma::FLAGS_PER_CHANNEL;
        let status = Status::new(ral::read_reg!(ral::dma, self.controller, ISR) >> shift);
        ral::write_reg!(ral::dma, self.controller, IFCR, 0b1111 << shift);

        trace!("DMA channel {} interrupt {:?}", index, status);
        if let Some(handler) = interrupt::load(&self.handlers[index]) {
            (handler.callback)(handler.param, status);
        }
    }
}
