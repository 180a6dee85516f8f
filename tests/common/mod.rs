//! Register blocks backed by RAM.
//!
//! Writes stick and reads return the last write, which makes the SPI data
//! register a loopback: the byte sent is the byte received.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use stm32f1_spi::{
    binding::{Binding, Platform},
    dma::Dma,
    gpio::{Pin, Pins},
    Completion, Spi,
};

/// A zeroed, leaked block of 32-bit registers.
#[derive(Clone, Copy)]
pub struct Mem(*mut u32);

impl Mem {
    pub fn new(words: usize) -> Self {
        let block: &'static mut [u32] = Box::leak(vec![0u32; words].into_boxed_slice());
        Mem(block.as_mut_ptr())
    }
    pub fn ptr(self) -> *const () {
        self.0 as *const ()
    }
    pub fn read(self, word: usize) -> u32 {
        unsafe { self.0.add(word).read_volatile() }
    }
    pub fn write(self, word: usize, value: u32) {
        unsafe { self.0.add(word).write_volatile(value) }
    }
    pub fn address_of(self, word: usize) -> u32 {
        unsafe { self.0.add(word) as usize as u32 }
    }
}

pub mod spi {
    pub const CR1: usize = 0;
    pub const CR2: usize = 1;
    pub const SR: usize = 2;
    pub const DR: usize = 3;
    pub const WORDS: usize = 9;

    pub const MSTR: u32 = 1 << 2;
    pub const SPE: u32 = 1 << 6;
    pub const RXDMAEN: u32 = 1 << 0;
    pub const TXDMAEN: u32 = 1 << 1;
    pub const SSOE: u32 = 1 << 2;
    pub const RXNE: u32 = 1 << 0;
    pub const OVR: u32 = 1 << 6;
}

pub mod dma {
    pub const ISR: usize = 0;
    pub const IFCR: usize = 1;
    pub const WORDS: usize = 2 + 7 * 5;

    pub fn ccr(channel: usize) -> usize {
        2 + 5 * channel
    }
    pub fn cndtr(channel: usize) -> usize {
        3 + 5 * channel
    }
    pub fn cpar(channel: usize) -> usize {
        4 + 5 * channel
    }
    pub fn cmar(channel: usize) -> usize {
        5 + 5 * channel
    }

    pub const EN: u32 = 1 << 0;
    pub const TCIE: u32 = 1 << 1;
    pub const HTIE: u32 = 1 << 2;
    pub const TEIE: u32 = 1 << 3;
    pub const DIR: u32 = 1 << 4;
    pub const MINC: u32 = 1 << 7;
    pub fn pl(priority: u32) -> u32 {
        priority << 12
    }

    pub const GIF: u32 = 1 << 0;
    pub const TCIF: u32 = 1 << 1;
    pub const HTIF: u32 = 1 << 2;
    pub const TEIF: u32 = 1 << 3;
}

pub mod gpio {
    pub const CRL: usize = 0;
    pub const CRH: usize = 1;
    pub const BSRR: usize = 4;
    pub const BRR: usize = 5;
    pub const WORDS: usize = 7;

    pub const CSN: u8 = 4;
    pub const SCK: u8 = 5;
    pub const MISO: u8 = 6;
    pub const MOSI: u8 = 7;
}

pub mod rcc {
    pub const APB2ENR: usize = 6;
    pub const APB1ENR: usize = 7;
    pub const WORDS: usize = 10;
}

pub mod afio {
    pub const MAPR: usize = 1;
    pub const WORDS: usize = 8;
}

pub fn dma_controller(mem: Mem) -> &'static Dma<7> {
    Box::leak(Box::new(unsafe { Dma::new(mem.ptr()) }))
}

/// One bus, with its own registers and DMA controller.
pub struct Board {
    pub spi: &'static Spi,
    pub dma: &'static Dma<7>,
    pub binding: Binding,
    pub spi_regs: Mem,
    pub dma_regs: Mem,
    pub gpio: Mem,
    pub rcc: Mem,
    pub afio: Mem,
}

impl Board {
    /// A bus that hasn't been initialized.
    pub fn new(binding: Binding) -> Self {
        let dma_regs = Mem::new(dma::WORDS);
        Self::with_dma(binding, dma_regs, dma_controller(dma_regs))
    }

    /// A bus on a DMA controller that other buses may share.
    pub fn with_dma(binding: Binding, dma_regs: Mem, dma: &'static Dma<7>) -> Self {
        let spi_regs = Mem::new(spi::WORDS);
        let port = Mem::new(gpio::WORDS);
        let pins = unsafe {
            Pins {
                csn: Pin::new(port.ptr(), gpio::CSN),
                sck: Pin::new(port.ptr(), gpio::SCK),
                miso: Pin::new(port.ptr(), gpio::MISO),
                mosi: Pin::new(port.ptr(), gpio::MOSI),
            }
        };
        let spi = Box::leak(Box::new(unsafe { Spi::new(binding, spi_regs.ptr(), pins, dma) }));
        Self {
            spi,
            dma,
            binding,
            spi_regs,
            dma_regs,
            gpio: port,
            rcc: Mem::new(rcc::WORDS),
            afio: Mem::new(afio::WORDS),
        }
    }

    /// A bus that's been initialized, with a peripheral that always has a
    /// byte ready.
    pub fn ready(binding: Binding) -> Self {
        let board = Self::new(binding);
        board.init();
        board.spi_regs.write(spi::SR, spi::RXNE);
        board
    }

    pub fn init(&self) {
        let platform = unsafe { Platform::new(self.rcc.ptr(), self.afio.ptr()) };
        self.spi.init(&platform);
    }

    pub fn rx_ccr(&self) -> u32 {
        self.dma_regs.read(dma::ccr(self.binding.rx_channel))
    }

    pub fn tx_ccr(&self) -> u32 {
        self.dma_regs.read(dma::ccr(self.binding.tx_channel))
    }

    /// Raise the interrupt of `channel` with `flags`, as the hardware would.
    pub fn fire(&self, channel: usize, flags: u32) {
        self.dma_regs.write(dma::ISR, flags << (4 * channel));
        self.dma.on_interrupt(channel);
    }

    /// Raise the receive channel's transfer complete interrupt.
    pub fn complete(&self) {
        self.fire(self.binding.rx_channel, dma::TCIF | dma::GIF);
    }
}

/// A completion callback that counts its invocations in the `AtomicUsize`
/// it's handed.
pub fn counting_completion() -> (Completion, &'static AtomicUsize) {
    fn bump(param: *mut ()) {
        let count = unsafe { &*(param as *const AtomicUsize) };
        count.fetch_add(1, Ordering::SeqCst);
    }
    let count: &'static AtomicUsize = Box::leak(Box::new(AtomicUsize::new(0)));
    let completion = Completion::new(bump, count as *const AtomicUsize as *mut ());
    (completion, count)
}
