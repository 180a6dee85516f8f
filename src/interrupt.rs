//! State shared between the foreground and interrupt handlers.

use core::cell::Cell;
use critical_section::Mutex;

/// A completion callback and its opaque parameter.
///
/// The callback runs in the DMA interrupt. It should hand off to
/// foreground work (post an event, set a flag) and return quickly. It may
/// start the next DMA transfer, since the bus is idle by the time it runs.
#[derive(Clone, Copy)]
pub struct Completion {
    callback: fn(*mut ()),
    param: *mut (),
}

// Safety: the parameter is opaque to the driver. It's only ever handed
// back to the callback that the owner paired it with.
unsafe impl Send for Completion {}

impl Completion {
    /// Pair a callback with the parameter it receives.
    pub const fn new(callback: fn(*mut ()), param: *mut ()) -> Self {
        Self { callback, param }
    }

    pub(crate) fn invoke(self) {
        (self.callback)(self.param)
    }
}

impl core::fmt::Debug for Completion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Completion")
            .field("param", &self.param)
            .finish_non_exhaustive()
    }
}

/// A slot that's written in the foreground and read from an interrupt.
///
/// Owners set it while the peripheral is idle. The critical section only
/// spans the copy in or out; it doesn't serialize transfers.
pub(crate) type SharedSlot<T> = Mutex<Cell<Option<T>>>;

pub(crate) const fn empty_slot<T>() -> SharedSlot<T> {
    Mutex::new(Cell::new(None))
}

pub(crate) fn load<T: Copy>(slot: &SharedSlot<T>) -> Option<T> {
    critical_section::with(|cs| slot.borrow(cs).get())
}

pub(crate) fn store<T: Copy>(slot: &SharedSlot<T>, value: Option<T>) {
    critical_section::with(|cs| slot.borrow(cs).set(value))
}
