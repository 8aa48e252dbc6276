use core::fmt;

/// Possible errors from the DHT11 driver.
///
/// A read either produces a validated [`Reading`](crate::Reading) or exactly one
/// of these. None of them is fatal: the caller logs, skips, and tries again on
/// its own schedule.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// The sensor did not produce an expected edge before its deadline.
    Timeout,
    /// A full frame was received but its checksum byte did not match.
    ChecksumMismatch,
    /// Error from the GPIO pin (input/output).
    PinError(E),
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}

impl<E: fmt::Debug> fmt::Display for DhtError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timed out waiting for the sensor"),
            Self::ChecksumMismatch => f.write_str("frame checksum mismatch"),
            Self::PinError(e) => write!(f, "pin error: {e:?}"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for DhtError<E> {}
