//! SPI register block and fields

use super::{RORegister, RWRegister};

/// SPI1 base address.
pub const SPI1: *const () = 0x4001_3000 as *const ();
/// SPI2 base address.
pub const SPI2: *const () = 0x4000_3800 as *const ();
/// SPI3 base address.
pub const SPI3: *const () = 0x4000_3C00 as *const ();

/// SPI registers.
#[repr(C)]
pub struct RegisterBlock {
    /// Control register 1
    pub CR1: RWRegister<u32>,
    /// Control register 2
    pub CR2: RWRegister<u32>,
    /// Status register
    pub SR: RWRegister<u32>,
    /// Data register
    pub DR: RWRegister<u32>,
    /// CRC polynomial register
    pub CRCPR: RWRegister<u32>,
    /// RX CRC register
    pub RXCRCR: RORegister<u32>,
    /// TX CRC register
    pub TXCRCR: RORegister<u32>,
    /// I2S configuration register
    pub I2SCFGR: RWRegister<u32>,
    /// I2S prescaler register
    pub I2SPR: RWRegister<u32>,
}

const _: () = assert!(core::mem::offset_of!(RegisterBlock, DR) == 0x0C);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, I2SPR) == 0x20);

pub mod CR1 {
    /// Master selection
    pub mod MSTR {
        pub const offset: u32 = 2;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {
            pub const Slave: u32 = 0;
            pub const Master: u32 = 1;
        }
    }
    /// Baud rate control
    pub mod BR {
        pub const offset: u32 = 3;
        pub const mask: u32 = 0b111 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// SPI enable
    pub mod SPE {
        pub const offset: u32 = 6;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}

pub mod CR2 {
    /// Rx buffer DMA enable
    pub mod RXDMAEN {
        pub const offset: u32 = 0;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Tx buffer DMA enable
    pub mod TXDMAEN {
        pub const offset: u32 = 1;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// SS output enable
    pub mod SSOE {
        pub const offset: u32 = 2;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}

pub mod SR {
    /// Receive buffer not empty
    pub mod RXNE {
        pub const offset: u32 = 0;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Transmit buffer empty
    pub mod TXE {
        pub const offset: u32 = 1;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Overrun flag. Cleared by reading DR, then SR.
    pub mod OVR {
        pub const offset: u32 = 6;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Busy flag
    pub mod BSY {
        pub const offset: u32 = 7;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}
