//! SPI master driver for STM32F1 processors, with blocking and DMA
//! transfers.
//!
//! `stm32f1-spi` provides
//!
//! - a [`Spi`] bus instance per SPI peripheral, with CPU polled transfers
//!   and DMA transfers that complete in the DMA interrupt.
//! - a minimal [`dma`] driver that leases channels to each bus and routes
//!   channel interrupts back to it.
//! - [`table`]-driven command streams, one chip select transaction per
//!   frame.
//!
//! There's no operating system underneath. A bus is shared by the
//! foreground loop, which starts transfers, and by the DMA interrupt,
//! which finishes them and runs the bus' [`Completion`] callback.
//!
//! # Getting started
//!
//! Allocate the DMA controllers in statics, construct each bus once, and
//! keep it in `'static` storage. Then initialize it and unmask its DMA
//! interrupts.
//!
//! ```no_run
//! use stm32f1_spi::{
//!     binding::{Binding, Platform},
//!     dma::Dma,
//!     gpio::{Pin, Pins},
//!     ral, Completion, Registry, Spi,
//! };
//!
//! // Safety: DMA1 is a seven channel controller at this address.
//! static DMA1: Dma<7> = unsafe { Dma::new(ral::dma::DMA1) };
//! static BUSES: Registry = Registry::new();
//!
//! fn on_flash_done(_: *mut ()) {
//!     // Wake the task that's waiting on the flash.
//! }
//!
//! # fn leak(spi: Spi) -> &'static Spi { unimplemented!() }
//! // Safety: these pins belong to SPI2 on this board.
//! let pins = unsafe {
//!     Pins {
//!         csn: Pin::new(ral::gpio::GPIOB, 12),
//!         sck: Pin::new(ral::gpio::GPIOB, 13),
//!         miso: Pin::new(ral::gpio::GPIOB, 14),
//!         mosi: Pin::new(ral::gpio::GPIOB, 15),
//!     }
//! };
//! // Safety: only one SPI2 bus, and nothing else uses DMA1 channels 4 and 5.
//! let spi: &'static Spi = leak(unsafe { Spi::new(Binding::SPI2, ral::spi::SPI2, pins, &DMA1) });
//! BUSES.register(spi).unwrap();
//!
//! // Safety: nothing else touches RCC or AFIO during boot.
//! let platform = unsafe { Platform::new(ral::rcc::RCC, ral::afio::AFIO) };
//! spi.init(&platform);
//! spi.set_completion(Some(Completion::new(on_flash_done, core::ptr::null_mut())));
//!
//! spi.transfer_table(&[1, 0x06, 0]);
//! static COMMAND: [u8; 4] = [0x03, 0x00, 0x10, 0x00];
//! // Safety: COMMAND is static and nothing else is in flight.
//! unsafe { spi.tx_dma(COMMAND.as_ptr(), COMMAND.len()) };
//!
//! // In the DMA1_Channel4 interrupt:
//! DMA1.on_interrupt(3);
//! // In the DMA1_Channel5 interrupt:
//! DMA1.on_interrupt(4);
//! ```
//!
//! # Features
//!
//! - `defmt`: log through `defmt`, and implement `defmt::Format` on public
//!   types.
//! - `log`: log through the `log` facade.
//!
//! You'll need a `critical-section` implementation. On a single core
//! Cortex-M, that's `cortex-m`'s `critical-section-single-core` feature.
//!
//! ### License
//!
//! Licensed under either of
//!
//! - [Apache License, Version 2.0](http://www.apache.org/licenses/LICENSE-2.0)
//! - [MIT License](http://opensource.org/licenses/MIT)
//!
//! at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted
//! for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
//! dual licensed as above, without any additional terms or conditions.

#![no_std]

mod fmt;

pub mod binding;
pub mod dma;
mod error;
pub mod gpio;
mod interrupt;
pub mod ral;
mod registry;
mod spi;
pub mod table;
mod teardown;

pub use binding::{Binding, Instance, Priority};
pub use error::Error;
pub use interrupt::Completion;
pub use registry::Registry;
pub use spi::Spi;

/// A driver result
pub type Result<T> = core::result::Result<T, Error>;
