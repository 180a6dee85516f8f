//! The SPI bus instance.
//!
//! A [`Spi`] drives one SPI peripheral as a bus master. It offers CPU
//! polled transfers, which block until the data is exchanged, and DMA
//! transfers, which return as soon as both channels are armed and finish
//! in the receive channel's interrupt.
//!
//! # Contract
//!
//! At most one transfer may be outstanding per bus. The driver doesn't
//! lock; starting a transfer while a DMA transfer is in flight is a caller
//! error, and the hardware behavior is undefined. Wait for the completion
//! callback, or poll [`Spi::dma_in_progress`], before starting the next one.
//!
//! Blocking transfers poll without a timeout. If the peripheral never
//! answers, they never return. [`Spi::try_transfer`] is the bounded
//! alternative.
//!
//! DMA transfers that never complete aren't detected here. Supervise them
//! with a watchdog or timeout at a higher layer.

use core::cell::UnsafeCell;

use crate::binding::{Binding, Instance, Platform, Priority};
use crate::dma::{Channel, Dma, Handler, Status};
use crate::gpio::{Mode, Pins};
use crate::interrupt::{self, Completion, SharedSlot};
use crate::ral::{self, Static};
use crate::table::Transaction;
use crate::teardown::{teardown, Teardown};

/// An SPI bus master.
///
/// Construct it once, move it into `'static` storage, then call
/// [`init`](Spi::init). The bus is never torn down.
pub struct Spi {
    binding: Binding,
    registers: Static<ral::spi::RegisterBlock>,
    pins: Pins,
    rx: Channel,
    tx: Channel,
    completion: SharedSlot<Completion>,
    /// Receive target of transmit-only DMA transfers.
    sink: UnsafeCell<u8>,
}

// Safety: the foreground and the DMA interrupt share a bus. Registers are
// volatile cells, and the completion slot is guarded by a critical section.
// The sink is only written by the DMA controller.
unsafe impl Sync for Spi {}

impl Spi {
    /// Create a bus for the peripheral at `registers`, leasing the DMA
    /// channels named by `binding` from `dma`.
    ///
    /// # Safety
    ///
    /// `registers` must point to the SPI register block of
    /// `binding.instance`, and `dma` must be the controller named by
    /// `binding.controller`. The register block, the pins, and both DMA
    /// channels must not be used by anything else. Create at most one
    /// `Spi` per peripheral.
    pub unsafe fn new<const CHANNELS: usize>(
        binding: Binding,
        registers: *const (),
        pins: Pins,
        dma: &'static Dma<CHANNELS>,
    ) -> Self {
        Self {
            binding,
            registers: Static(registers.cast()),
            pins,
            rx: dma.channel(binding.rx_channel),
            tx: dma.channel(binding.tx_channel),
            completion: interrupt::empty_slot(),
            sink: UnsafeCell::new(0),
        }
    }

    /// Returns the peripheral this bus drives.
    pub fn instance(&self) -> Instance {
        self.binding.instance
    }

    /// Returns the hardware binding.
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Returns the DMA priority of both channels.
    pub fn priority(&self) -> Priority {
        self.binding.priority
    }

    /// Bring up the peripheral.
    ///
    /// Enables the peripheral clock, routes both DMA channel interrupts to
    /// this bus, configures the pins, applies the binding's remap, and
    /// enables the peripheral as a master with slave select output.
    ///
    /// Call this once during boot, before unmasking the DMA channel
    /// interrupts.
    pub fn init(&'static self, platform: &Platform) {
        platform.enable_clock(self.binding.clock);

        let handler = Handler::new(Self::on_dma_event, self as *const Self as *const ());
        self.rx.set_handler(Some(handler));
        self.tx.set_handler(Some(handler));

        self.pins.csn.set_high();
        self.pins.csn.set_mode(Mode::OutputPushPull10MHz);
        self.pins.sck.set_mode(Mode::AlternatePushPull50MHz);
        self.pins.miso.set_mode(Mode::InputFloating);
        self.pins.mosi.set_mode(Mode::AlternatePushPull50MHz);

        // Remaps only take once the clock is on and the pins are already
        // in alternate function mode.
        platform.apply_remap(self.binding.remap);

        let data = self.data_register_address();
        self.rx.set_peripheral_address(data);
        self.tx.set_peripheral_address(data);
        self.rx.reset();
        self.tx.reset();

        let spi = &*self.registers;
        ral::write_reg!(ral::spi, spi, CR1, MSTR: Master);
        ral::write_reg!(ral::spi, spi, CR2, SSOE: 1);
        ral::modify_reg!(ral::spi, spi, CR1, SPE: 1);

        debug!(
            "{:?} ready, DMA channels {}/{}, {:?}",
            self.binding.instance,
            self.binding.rx_channel,
            self.binding.tx_channel,
            self.binding.priority
        );
    }

    fn data_register_address(&self) -> u32 {
        &self.registers.DR as *const _ as usize as u32
    }

    /// Install, replace, or remove the completion callback.
    ///
    /// Only change the callback while the bus is idle.
    pub fn set_completion(&self, completion: Option<Completion>) {
        interrupt::store(&self.completion, completion);
    }

    /// Assert chip select.
    pub fn begin(&self) {
        self.pins.csn.set_low();
    }

    /// Release chip select.
    pub fn end(&self) {
        self.pins.csn.set_high();
    }

    /// Exchange one byte, blocking until the reply arrives.
    pub fn transfer(&self, byte: u8) -> u8 {
        let spi = &*self.registers;
        ral::write_reg!(ral::spi, spi, DR, byte as u32);
        while !ral::read_reg!(ral::spi, spi, SR, RXNE == 1) {}
        ral::read_reg!(ral::spi, spi, DR) as u8
    }

    /// Exchange one byte, giving up after `spins` polls of the status
    /// register.
    ///
    /// On timeout the byte may still be on the wire. Its reply, if one
    /// arrives, sits in the data register until the next read.
    pub fn try_transfer(&self, byte: u8, spins: u32) -> crate::Result<u8> {
        let spi = &*self.registers;
        ral::write_reg!(ral::spi, spi, DR, byte as u32);
        for _ in 0..spins {
            if ral::read_reg!(ral::spi, spi, SR, RXNE == 1) {
                return Ok(ral::read_reg!(ral::spi, spi, DR) as u8);
            }
        }
        warn!("{:?} timed out after {} polls", self.binding.instance, spins);
        Err(crate::Error::Timeout)
    }

    /// Exchange a block of bytes, blocking until done.
    ///
    /// `tx[i]` is sent and its reply lands in `rx[i]`. The exchange covers
    /// the shorter of the two slices.
    pub fn transfer_block(&self, tx: &[u8], rx: &mut [u8]) {
        for (out, inp) in tx.iter().zip(rx.iter_mut()) {
            *inp = self.transfer(*out);
        }
    }

    /// Exchange a block of bytes in place, blocking until done.
    ///
    /// Each byte is sent before its slot is overwritten by the reply.
    pub fn transfer_in_place(&self, buffer: &mut [u8]) {
        for byte in buffer.iter_mut() {
            *byte = self.transfer(*byte);
        }
    }

    /// Run a length-prefixed command table. See [`crate::table`].
    pub fn transfer_table(&self, table: &[u8]) {
        crate::table::transfer_table(self, table)
    }

    /// Start a full duplex DMA transfer of `len` bytes.
    ///
    /// Only the receive channel raises the completion interrupt. In a full
    /// duplex exchange the last byte is received after it's sent, so the
    /// receive channel is always the last to finish.
    ///
    /// # Safety
    ///
    /// `tx` must be valid for `len` reads and `rx` for `len` writes until the
    /// transfer completes. They may point to the same buffer. No other
    /// transfer may be in flight on this bus. `len` must fit in 16 bits;
    /// in release builds a longer `len` is truncated to its low 16 bits.
    pub unsafe fn transfer_dma(&self, tx: *const u8, rx: *mut u8, len: usize) {
        debug_assert!(len <= u16::MAX as usize);
        let pl = self.binding.priority.bits();

        self.rx.set_transfer_count(len as u16);
        self.rx.set_memory_address(rx as usize as u32);
        ral::write_reg!(
            ral::dma,
            self.rx.registers(),
            CCR,
            PL: pl,
            MINC: 1,
            DIR: FromPeripheral,
            TEIE: 1,
            HTIE: 0,
            TCIE: 1,
            EN: 1
        );

        self.arm_tx(tx, len, pl);
        self.enable_requests();
    }

    /// Start a transmit-only DMA transfer of `len` bytes.
    ///
    /// The receive channel still runs, discarding into a single byte, and it
    /// carries the completion interrupt. Arming only the transmit channel
    /// sometimes never raised completion after a preceding receive. Both
    /// channels also share a priority. Neither measure has been proven to
    /// prevent the intermittent DMA hangs.
    ///
    /// # Safety
    ///
    /// `tx` must be valid for `len` reads until the transfer completes. No
    /// other transfer may be in flight on this bus. `len` must fit in 16
    /// bits; in release builds a longer `len` is truncated to its low 16
    /// bits.
    pub unsafe fn tx_dma(&self, tx: *const u8, len: usize) {
        debug_assert!(len <= u16::MAX as usize);
        let pl = self.binding.priority.bits();

        self.rx.set_transfer_count(len as u16);
        self.rx.set_memory_address(self.sink.get() as usize as u32);
        ral::write_reg!(
            ral::dma,
            self.rx.registers(),
            CCR,
            PL: pl,
            MINC: 0,
            DIR: FromPeripheral,
            TEIE: 1,
            TCIE: 1,
            EN: 1
        );

        self.arm_tx(tx, len, pl);
        self.enable_requests();
    }

    fn arm_tx(&self, tx: *const u8, len: usize, pl: u32) {
        self.tx.set_transfer_count(len as u16);
        self.tx.set_memory_address(tx as usize as u32);
        ral::write_reg!(
            ral::dma,
            self.tx.registers(),
            CCR,
            PL: pl,
            MINC: 1,
            DIR: FromMemory,
            TEIE: 1,
            TCIE: 0,
            EN: 1
        );
    }

    fn enable_requests(&self) {
        memory_barrier();
        let spi = &*self.registers;
        ral::modify_reg!(ral::spi, spi, CR2, RXDMAEN: 1, TXDMAEN: 1);
        trace!("{:?} DMA armed", self.binding.instance);
    }

    /// Returns `true` while a DMA transfer is in flight.
    pub fn dma_in_progress(&self) -> bool {
        let spi = &*self.registers;
        let (rx, tx) = ral::read_reg!(ral::spi, spi, CR2, RXDMAEN, TXDMAEN);
        rx != 0 || tx != 0
    }

    /// DMA channel handler. `param` is the `&'static Spi` from `init`.
    ///
    /// Only completion and error interrupts are ever enabled, so this never
    /// sees a half transfer.
    fn on_dma_event(param: *const (), status: Status) {
        // Safety: registered by init, which requires a 'static bus.
        let spi = unsafe { &*(param as *const Spi) };
        spi.complete(status);
    }

    fn complete(&self, status: Status) {
        if status.is_error() {
            warn!(
                "{:?} DMA transfer error {:?}, {} bytes left",
                self.binding.instance,
                status,
                self.rx.transfer_count()
            );
        }
        teardown(self);
    }
}

impl Teardown for Spi {
    fn overrun(&self) -> bool {
        let spi = &*self.registers;
        ral::read_reg!(ral::spi, spi, SR, OVR == 1)
    }
    fn discard(&self) {
        let spi = &*self.registers;
        let _ = ral::read_reg!(ral::spi, spi, DR);
    }
    fn stop_tx(&self) {
        self.tx.reset();
    }
    fn stop_rx(&self) {
        self.rx.reset();
    }
    fn disable_requests(&self) {
        let spi = &*self.registers;
        ral::modify_reg!(ral::spi, spi, CR2, RXDMAEN: 0, TXDMAEN: 0);
    }
    fn notify(&self) {
        if let Some(completion) = interrupt::load(&self.completion) {
            completion.invoke();
        }
    }
}

impl Transaction for Spi {
    fn begin(&self) {
        Spi::begin(self)
    }
    fn end(&self) {
        Spi::end(self)
    }
    fn transfer(&self, byte: u8) -> u8 {
        Spi::transfer(self, byte)
    }
}

/// Make buffer writes visible to the DMA controller before it starts.
fn memory_barrier() {
    cfg_if::cfg_if! {
        if #[cfg(all(target_arch = "arm", target_os = "none"))] {
            cortex_m::asm::dsb();
        } else {
            core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
        }
    }
}
