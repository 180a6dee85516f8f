//! Table-driven command streams.
//!
//! A table is a run of frames. Each frame is a length byte followed by
//! that many payload bytes, and the table ends at the first zero length
//! byte. Every frame is sent as its own chip select transaction, while the
//! table as a whole reads as one command sequence:
//!
//! ```text
//! [2, 0x11, 0x22, 3, 0x01, 0x02, 0x03, 0]
//!  \__frame 0__/  \_____frame 1_____/  end
//! ```

/// A bus that can bracket byte exchanges in a chip select transaction.
pub trait Transaction {
    /// Assert chip select.
    fn begin(&self);
    /// Release chip select.
    fn end(&self);
    /// Exchange one byte, blocking until the reply arrives.
    fn transfer(&self, byte: u8) -> u8;
}

/// Send every frame of `table` on `bus`, discarding the replies.
///
/// Stops at the first zero length byte, and never reads past it. A slice
/// that runs out before its terminator is treated as terminated; a final
/// frame cut short sends the bytes that are there.
pub fn transfer_table<T: Transaction + ?Sized>(bus: &T, table: &[u8]) {
    let mut rest = table;
    while let Some((&len, tail)) = rest.split_first() {
        if len == 0 {
            break;
        }
        let (payload, tail) = tail.split_at(usize::from(len).min(tail.len()));

        bus.begin();
        for &byte in payload {
            bus.transfer(byte);
        }
        bus.end();

        rest = tail;
    }
}
