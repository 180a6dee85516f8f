//! Driver errors

use crate::binding::{Controller, Instance, Priority};

/// Errors from the fallible parts of the driver.
///
/// The transfer paths themselves don't fail. They either finish or they
/// hang; see the crate documentation. These errors come from the bounded
/// transfer variant and from configuration checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The peripheral didn't produce a byte within the polling budget.
    Timeout,
    /// A bus instance was already registered for this peripheral.
    AlreadyRegistered(Instance),
    /// Another instance on the same DMA controller already uses this
    /// priority.
    PriorityConflict {
        /// The shared DMA controller.
        controller: Controller,
        /// The contested priority.
        priority: Priority,
    },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Timeout => f.write_str("SPI transfer timed out"),
            Error::AlreadyRegistered(instance) => {
                write!(f, "{instance:?} already has a registered bus")
            }
            Error::PriorityConflict {
                controller,
                priority,
            } => write!(f, "{priority:?} already used on {controller:?}"),
        }
    }
}
