//! A fixed table of bus instances, one slot per SPI peripheral.

use crate::binding::Instance;
use crate::interrupt::{self, SharedSlot};
use crate::spi::Spi;
use crate::{Error, Result};

const EMPTY: SharedSlot<&'static Spi> = interrupt::empty_slot();

/// Bus instances by peripheral.
///
/// Registration checks the one-bus-per-peripheral rule and the distinct
/// priority rule for buses that share a DMA controller. Buses are never
/// removed.
///
/// ```no_run
/// use stm32f1_spi::Registry;
///
/// static BUSES: Registry = Registry::new();
/// ```
pub struct Registry {
    slots: [SharedSlot<&'static Spi>; Instance::COUNT],
}

impl Registry {
    /// An empty registry.
    pub const fn new() -> Self {
        Self {
            slots: [EMPTY; Instance::COUNT],
        }
    }

    /// Record `spi` under its peripheral.
    pub fn register(&self, spi: &'static Spi) -> Result<()> {
        critical_section::with(|cs| {
            let instance = spi.instance();
            if self.slots[instance.index()].borrow(cs).get().is_some() {
                return Err(Error::AlreadyRegistered(instance));
            }
            let binding = spi.binding();
            for slot in &self.slots {
                if let Some(other) = slot.borrow(cs).get() {
                    if binding.collides_with(other.binding()) {
                        return Err(Error::PriorityConflict {
                            controller: binding.controller,
                            priority: binding.priority,
                        });
                    }
                }
            }
            self.slots[instance.index()].borrow(cs).set(Some(spi));
            Ok(())
        })
    }

    /// Returns the bus registered for `instance`.
    pub fn get(&self, instance: Instance) -> Option<&'static Spi> {
        interrupt::load(&self.slots[instance.index()])
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
