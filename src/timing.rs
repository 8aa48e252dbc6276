/// Protocol timing used by [`Dht11`](crate::Dht11).
///
/// The defaults follow the DHT11 datasheet. Every wait on the sensor has a
/// deadline measured on the [`Monotonic`](crate::Monotonic) clock, so a read
/// always terminates.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// How long the start signal holds the line low. The sensor ignores
    /// anything shorter than 18 ms.
    pub start_low_ms: u32,
    /// How long the line is driven high before it is released (20-40 µs).
    pub start_high_us: u32,
    /// Deadline for the whole response handshake, counted from release.
    pub handshake_timeout_us: u32,
    /// Deadline for each edge while acquiring data bits.
    pub bit_timeout_us: u32,
    /// High pulses at least this long decode as 1.
    ///
    /// A 0 is ~26-28 µs high and a 1 is ~70 µs high.
    pub one_threshold_us: u32,
}

impl Timing {
    pub const DEFAULT: Timing = Timing {
        start_low_ms: 18,
        start_high_us: 30,
        // 20-40 µs until the sensor answers, then 80 µs low and 80 µs high
        handshake_timeout_us: 1_000,
        // longest legal phase is the ~70 µs high of a 1
        bit_timeout_us: 200,
        one_threshold_us: 70,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}
