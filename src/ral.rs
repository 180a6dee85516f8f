//! A RAL-like module for the handful of STM32F1 register blocks this
//! driver touches.
//!
//! We only describe the registers and fields we actually program. Each
//! register block is a `#[repr(C)]` struct of register cells, so that a
//! pointer to the peripheral's base address (or, in tests, to zeroed
//! memory) can be used directly. Field modules follow the RAL layout, so
//! the `read_reg!` / `write_reg!` / `modify_reg!` macros apply.

#![allow(
    non_snake_case, // Compatibility with RAL
    non_upper_case_globals, // Field offsets, masks, and values
    unused, // Not every field is programmed
)]

pub mod afio;
pub mod dma;
pub mod gpio;
pub mod rcc;
pub mod spi;

pub use ral_registers::{modify_reg, read_reg, write_reg};
use ral_registers::{RORegister, RWRegister, WORegister};

//
// Helper types for static memory
//
// Similar to the RAL's `Instance` type, but more copy.
//

pub(crate) struct Static<T>(pub(crate) *const T);
impl<T> core::ops::Deref for Static<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        // Safety: pointer points to static memory (peripheral memory)
        unsafe { &*self.0 }
    }
}
impl<T> Clone for Static<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Static<T> {}
