//! DMA register blocks and fields

use super::{RORegister, RWRegister, WORegister};

/// DMA1 base address.
pub const DMA1: *const () = 0x4002_0000 as *const ();
/// DMA2 base address.
pub const DMA2: *const () = 0x4002_0400 as *const ();

/// DMA controller registers.
///
/// DMA1 implements all seven channel clusters. DMA2 implements only the
/// first five; the remainder is reserved memory.
#[repr(C)]
pub struct RegisterBlock {
    /// Interrupt status register
    pub ISR: RORegister<u32>,
    /// Interrupt flag clear register
    pub IFCR: WORegister<u32>,
    /// Per-channel registers
    pub CH: [ChannelRegisterBlock; 7],
}

/// Registers for a single DMA channel.
#[repr(C)]
pub struct ChannelRegisterBlock {
    /// Channel configuration register
    pub CCR: RWRegister<u32>,
    /// Channel number of data register
    pub CNDTR: RWRegister<u32>,
    /// Channel peripheral address register
    pub CPAR: RWRegister<u32>,
    /// Channel memory address register
    pub CMAR: RWRegister<u32>,
    _reserved: [u32; 1],
}

const _: () = assert!(core::mem::offset_of!(RegisterBlock, CH) == 0x08);
const _: () = assert!(core::mem::size_of::<ChannelRegisterBlock>() == 0x14);

/// Width of one channel's flag group in ISR / IFCR.
pub const FLAGS_PER_CHANNEL: u32 = 4;

/// Channel flag bits, relative to the channel's flag group.
pub mod ISR {
    /// Global interrupt flag
    pub const GIF: u32 = 1 << 0;
    /// Transfer complete flag
    pub const TCIF: u32 = 1 << 1;
    /// Half transfer flag
    pub const HTIF: u32 = 1 << 2;
    /// Transfer error flag
    pub const TEIF: u32 = 1 << 3;
}

pub mod CCR {
    /// Channel enable
    pub mod EN {
        pub const offset: u32 = 0;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Transfer complete interrupt enable
    pub mod TCIE {
        pub const offset: u32 = 1;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Half transfer interrupt enable
    pub mod HTIE {
        pub const offset: u32 = 2;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Transfer error interrupt enable
    pub mod TEIE {
        pub const offset: u32 = 3;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Data transfer direction
    pub mod DIR {
        pub const offset: u32 = 4;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {
            /// Read from peripheral
            pub const FromPeripheral: u32 = 0;
            /// Read from memory
            pub const FromMemory: u32 = 1;
        }
    }
    /// Circular mode
    pub mod CIRC {
        pub const offset: u32 = 5;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Peripheral increment mode
    pub mod PINC {
        pub const offset: u32 = 6;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Memory increment mode
    pub mod MINC {
        pub const offset: u32 = 7;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Peripheral size
    pub mod PSIZE {
        pub const offset: u32 = 8;
        pub const mask: u32 = 0b11 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {
            pub const Bits8: u32 = 0b00;
            pub const Bits16: u32 = 0b01;
            pub const Bits32: u32 = 0b10;
        }
    }
    /// Memory size
    pub mod MSIZE {
        pub const offset: u32 = 10;
        pub const mask: u32 = 0b11 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {
            pub const Bits8: u32 = 0b00;
            pub const Bits16: u32 = 0b01;
            pub const Bits32: u32 = 0b10;
        }
    }
    /// Channel priority level
    pub mod PL {
        pub const offset: u32 = 12;
        pub const mask: u32 = 0b11 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
    /// Memory to memory mode
    pub mod MEM2MEM {
        pub const offset: u32 = 14;
        pub const mask: u32 = 1 << offset;
        pub mod R {}
        pub mod W {}
        pub mod RW {}
    }
}
