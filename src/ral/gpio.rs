//! GPIO port register block

use super::{RWRegister, WORegister};

/// GPIOA base address.
pub const GPIOA: *const () = 0x4001_0800 as *const ();
/// GPIOB base address.
pub const GPIOB: *const () = 0x4001_0C00 as *const ();
/// GPIOC base address.
pub const GPIOC: *const () = 0x4001_1000 as *const ();
/// GPIOD base address.
pub const GPIOD: *const () = 0x4001_1400 as *const ();

/// GPIO port registers.
#[repr(C)]
pub struct RegisterBlock {
    /// Port configuration register low (pins 0..8)
    pub CRL: RWRegister<u32>,
    /// Port configuration register high (pins 8..16)
    pub CRH: RWRegister<u32>,
    /// Port input data register
    pub IDR: RWRegister<u32>,
    /// Port output data register
    pub ODR: RWRegister<u32>,
    /// Port bit set/reset register
    pub BSRR: WORegister<u32>,
    /// Port bit reset register
    pub BRR: WORegister<u32>,
    /// Port configuration lock register
    pub LCKR: RWRegister<u32>,
}

const _: () = assert!(core::mem::offset_of!(RegisterBlock, BSRR) == 0x10);

/// Number of configuration bits per pin in CRL / CRH.
pub const BITS_PER_PIN: u32 = 4;
/// Number of pins described by one configuration register.
pub const PINS_PER_CR: u8 = 8;
