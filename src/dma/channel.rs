//! DMA channel handle

use crate::interrupt::{self, SharedSlot};
use crate::ral::{self, Static};

use super::Handler;

/// A DMA channel
///
/// You should rely on your bus driver to allocate `Channel`s. If you're designing
/// the driver, use [`Dma`](super::Dma) to create channels.
///
/// The `Channel` stores memory addresses independent of the memory lifetime. You must make
/// sure that the channel's state is valid before enabling a transfer!
pub struct Channel {
    /// Our channel number, expected to be between [0, 7)
    index: usize,
    /// Reference to the DMA registers
    registers: Static<ral::dma::RegisterBlock>,
    /// This channel's interrupt handler.
    handler: &'static SharedSlot<Handler>,
}

impl Channel {
    pub(super) fn new(
        index: usize,
        registers: Static<ral::dma::RegisterBlock>,
        handler: &'static SharedSlot<Handler>,
    ) -> Self {
        Self {
            index,
            registers,
            handler,
        }
    }

    /// Returns the zero-based channel number.
    pub fn channel(&self) -> usize {
        self.index
    }

    pub(crate) fn registers(&self) -> &ral::dma::ChannelRegisterBlock {
        &self.registers.CH[self.index]
    }

    /// Install the handler that [`Dma::on_interrupt`](super::Dma::on_interrupt)
    /// runs for this channel.
    ///
    /// Install it before enabling any interrupt on the channel.
    pub fn set_handler(&self, handler: Option<Handler>) {
        interrupt::store(self.handler, handler);
    }

    /// Set the address of the peripheral data register.
    pub fn set_peripheral_address(&self, address: u32) {
        ral::write_reg!(ral::dma, self.registers(), CPAR, address);
    }

    /// Returns the peripheral address.
    pub fn peripheral_address(&self) -> u32 {
        ral::read_reg!(ral::dma, self.registers(), CPAR)
    }

    /// Set the memory address of the next transfer.
    pub fn set_memory_address(&self, address: u32) {
        ral::write_reg!(ral::dma, self.registers(), CMAR, address);
    }

    /// Returns the memory address.
    pub fn memory_address(&self) -> u32 {
        ral::read_reg!(ral::dma, self.registers(), CMAR)
    }

    /// Set the number of transfer units. Only the low 16 bits are used.
    pub fn set_transfer_count(&self, count: u16) {
        ral::write_reg!(ral::dma, self.registers(), CNDTR, count as u32);
    }

    /// Returns the number of units left to transfer.
    pub fn transfer_count(&self) -> u16 {
        ral::read_reg!(ral::dma, self.registers(), CNDTR) as u16
    }

    /// Returns the raw channel configuration.
    pub fn configuration(&self) -> u32 {
        ral::read_reg!(ral::dma, self.registers(), CCR)
    }

    /// Returns `true` if the channel is enabled.
    pub fn is_enabled(&self) -> bool {
        ral::read_reg!(ral::dma, self.registers(), CCR, EN == 1)
    }

    /// Zero the configuration, which stops the channel and disarms its
    /// interrupts.
    pub fn reset(&self) {
        ral::write_reg!(ral::dma, self.registers(), CCR, 0);
    }
}
