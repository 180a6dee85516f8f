//! Tearing down a finished DMA transfer.
//!
//! The completion interrupt runs these steps in order:
//!
//! 1. if the receiver overran, read the data register once to clear it.
//! 2. stop the transmit channel, then the receive channel.
//! 3. turn off the peripheral's DMA requests.
//! 4. notify the owner of the transfer.
//!
//! The overrun read must come before any register write. A transmit-only
//! transfer always overruns, and a bus left overrun fails its next
//! transfer.

/// The register steps of a transfer teardown.
pub(crate) trait Teardown {
    /// Returns `true` if the receiver overran.
    fn overrun(&self) -> bool;
    /// Read and drop the data register.
    fn discard(&self);
    /// Zero the transmit channel configuration.
    fn stop_tx(&self);
    /// Zero the receive channel configuration.
    fn stop_rx(&self);
    /// Clear the peripheral's transmit and receive DMA requests.
    fn disable_requests(&self);
    /// Run the completion callback, if there is one.
    fn notify(&self);
}

pub(crate) fn teardown<T: Teardown + ?Sized>(bus: &T) {
    if bus.overrun() {
        bus.discard();
    }
    bus.stop_tx();
    bus.stop_rx();
    bus.disable_requests();
    bus.notify();
}
