//! Shared cell holding the most recent reading.
//!
//! The sensor loop publishes into it and any number of consumers (a display
//! refresh, an HTTP handler) copy the current value out. Both sides go through
//! the same blocking mutex, so a consumer sees either the previous sample or
//! the new one, never a mix of the two.

use core::cell::Cell;

use embassy_sync::blocking_mutex::{Mutex, raw::RawMutex};

use crate::Reading;

/// A published reading with its position in the publish order.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub reading: Reading,
    /// Starts at 1 and increases by one per [`LatestReading::publish`].
    pub sequence: u32,
}

#[derive(Clone, Copy)]
struct Slot {
    sequence: u32,
    reading: Option<Reading>,
}

/// Holder for the latest validated [`Reading`].
///
/// Pick the raw mutex for the sharing you need:
/// `CriticalSectionRawMutex` when a consumer runs in an interrupt or on another
/// core, `NoopRawMutex` or `ThreadModeRawMutex` when everything runs in one
/// context.
///
/// ```
/// use dht11_sensor::LatestReading;
/// use embassy_sync::blocking_mutex::raw::NoopRawMutex;
///
/// let latest = LatestReading::<NoopRawMutex>::new();
/// assert!(latest.latest().is_none());
/// ```
pub struct LatestReading<M: RawMutex> {
    slot: Mutex<M, Cell<Slot>>,
}

impl<M: RawMutex> LatestReading<M> {
    /// Creates an empty cell. Usable in a `static`.
    pub const fn new() -> Self {
        LatestReading {
            slot: Mutex::new(Cell::new(Slot {
                sequence: 0,
                reading: None,
            })),
        }
    }

    /// Replaces the stored reading and returns its sequence number.
    pub fn publish(&self, reading: Reading) -> u32 {
        self.slot.lock(|slot| {
            let mut next = slot.get();
            next.sequence = next.sequence.wrapping_add(1);
            next.reading = Some(reading);
            slot.set(next);
            next.sequence
        })
    }

    /// Copies out the latest sample, if anything has been published.
    pub fn latest(&self) -> Option<Sample> {
        self.slot.lock(|slot| {
            let Slot { sequence, reading } = slot.get();
            reading.map(|reading| Sample { reading, sequence })
        })
    }

    /// Forgets the stored reading. Sequence numbers keep counting.
    pub fn clear(&self) {
        self.slot.lock(|slot| {
            let mut next = slot.get();
            next.reading = None;
            slot.set(next);
        })
    }
}

impl<M: RawMutex> Default for LatestReading<M> {
    fn default() -> Self {
        Self::new()
    }
}
