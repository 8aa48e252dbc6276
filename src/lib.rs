//! DHT11 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the DHT11 temperature
//! and humidity sensor, built on top of the [`embedded-hal`] traits.
//!
//! The DHT11 talks over a single self-clocked wire: the host wakes it with a
//! long low pulse, the sensor answers with a fixed handshake and then sends
//! 40 bits whose values are encoded in the width of each high pulse. The
//! driver times those pulses by busy-waiting on a microsecond clock, and every
//! wait has a deadline, so a read always ends in a [`Reading`] or a
//! [`DhtError`].
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Deadline-bounded waits on a caller-supplied [`Monotonic`] clock
//! - [`LatestReading`] cell for handing readings to a display or web handler
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access, plus the crate's
//!   [`IoLine`] for switching direction (or [`OpenDrain`] for open-drain pins)
//! - [`DelayNs`] for the start signal
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and emits protocol trace events
//!
//! # Example
//!
//! ```no_run
//! # use dht11_sensor::{Dht11, DhtError, IoLine, Monotonic};
//! # use embedded_hal::delay::DelayNs;
//! # fn poll<L: IoLine, C: Monotonic, D: DelayNs>(line: L, clock: C, delay: D) {
//! let mut dht = Dht11::new(line, clock, delay);
//! match dht.read() {
//!     Ok(reading) => {
//!         let _ = (reading.temperature, reading.relative_humidity);
//!     }
//!     Err(DhtError::Timeout | DhtError::ChecksumMismatch) => { /* try again later */ }
//!     Err(DhtError::PinError(_)) => {}
//! }
//! # }
//! ```
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod clock;
pub mod dht11;
pub mod error;
pub mod latest;
pub mod line;
pub mod timing;

#[cfg(test)]
mod sim;

pub use clock::Monotonic;
pub use dht11::{Dht11, Reading};
pub use error::DhtError;
pub use latest::{LatestReading, Sample};
pub use line::{Drivable, IoLine, OpenDrain, Readable};
pub use timing::Timing;
