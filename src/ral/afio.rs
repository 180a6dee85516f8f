//! Alternate function I/O

use super::RWRegister;

/// AFIO base address.
pub const AFIO: *const () = 0x4001_0000 as *const ();

/// AFIO registers.
#[repr(C)]
pub struct RegisterBlock {
    /// Event control register
    pub EVCR: RWRegister<u32>,
    /// Remap and debug I/O configuration register
    pub MAPR: RWRegister<u32>,
    /// External interrupt configuration registers
    pub EXTICR: [RWRegister<u32>; 4],
    _reserved: [u32; 1],
    /// Remap and debug I/O configuration register 2
    pub MAPR2: RWRegister<u32>,
}

const _: () = assert!(core::mem::offset_of!(RegisterBlock, MAPR2) == 0x1C);

pub mod MAPR {
    /// SPI1 remap (NSS/PA15, SCK/PB3, MISO/PB4, MOSI/PB5)
    pub mod SPI1_REMAP {
        pub const offset: u32 = 0;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Serial wire JTAG configuration
    pub mod SWJ_CFG {
        pub const offset: u32 = 24;
        pub const mask: u32 = 0b111 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {
            /// JTAG-DP and SW-DP both disabled
            pub const AllDisabled: u32 = 0b100;
        }
    }
    /// SPI3 remap (NSS/PA4, SCK/PC10, MISO/PC11, MOSI/PC12)
    pub mod SPI3_REMAP {
        pub const offset: u32 = 28;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}
