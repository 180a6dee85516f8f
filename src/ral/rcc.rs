//! Reset and clock control. Only the peripheral clock enables are used.

use super::RWRegister;

/// RCC base address.
pub const RCC: *const () = 0x4002_1000 as *const ();

/// RCC registers.
#[repr(C)]
pub struct RegisterBlock {
    pub CR: RWRegister<u32>,
    pub CFGR: RWRegister<u32>,
    pub CIR: RWRegister<u32>,
    pub APB2RSTR: RWRegister<u32>,
    pub APB1RSTR: RWRegister<u32>,
    /// AHB peripheral clock enable register
    pub AHBENR: RWRegister<u32>,
    /// APB2 peripheral clock enable register
    pub APB2ENR: RWRegister<u32>,
    /// APB1 peripheral clock enable register
    pub APB1ENR: RWRegister<u32>,
    pub BDCR: RWRegister<u32>,
    pub CSR: RWRegister<u32>,
}

const _: () = assert!(core::mem::offset_of!(RegisterBlock, APB2ENR) == 0x18);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, APB1ENR) == 0x1C);

pub mod APB2ENR {
    /// SPI1 clock enable
    pub mod SPI1EN {
        pub const offset: u32 = 12;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}

pub mod APB1ENR {
    /// SPI2 clock enable
    pub mod SPI2EN {
        pub const offset: u32 = 14;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// SPI3 clock enable
    pub mod SPI3EN {
        pub const offset: u32 = 15;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}
