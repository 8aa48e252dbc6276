use embedded_hal::delay::DelayNs;

use crate::clock::{Monotonic, elapsed_us};
use crate::error::DhtError;
use crate::line::{Drivable, IoLine, Readable};
use crate::timing::Timing;

/// Bytes per frame: humidity, humidity tenths, temperature, temperature
/// tenths, checksum.
const FRAME_LEN: usize = 5;

/// Driver for the DHT11 temperature and humidity sensor.
///
/// The driver owns its line, clock and delay for its whole lifetime and keeps
/// no state between reads. Spacing reads apart (the sensor wants at least a
/// second, better two) is up to the caller.
pub struct Dht11<L, C, D> {
    line: L,
    clock: C,
    delay: D,
    timing: Timing,
}

/// Reading returned by the DHT11 sensor.
///
/// Both values carry the sensor's native resolution of one decimal place.
/// They are passed through as decoded, without range checks.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

impl Reading {
    /// Temperature in degrees Fahrenheit.
    pub fn temperature_fahrenheit(&self) -> f32 {
        self.temperature * 9.0 / 5.0 + 32.0
    }

    /// Converts the 4 data bytes of a frame into a `Reading`.
    fn from_data(data: [u8; 4]) -> Reading {
        let [hum_int, hum_dec, temp_int, temp_dec] = data;

        Reading {
            temperature: decimal(temp_int, temp_dec),
            relative_humidity: decimal(hum_int, hum_dec),
        }
    }
}

fn decimal(integral: u8, tenths: u8) -> f32 {
    f32::from(integral) + f32::from(tenths) / 10.0
}

/// Additive checksum over the data bytes, truncated to 8 bits.
fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
}

impl<L, C, D> Dht11<L, C, D>
where
    L: IoLine,
    C: Monotonic,
    D: DelayNs,
{
    /// Creates a new instance of the DHT11 driver with [`Timing::DEFAULT`].
    ///
    /// No I/O happens until the first [`read`](Self::read).
    ///
    /// # Arguments
    ///
    /// * `line` - The GPIO line connected to the DHT11 data pin.
    /// * `clock` - A microsecond clock for pulse timing and deadlines.
    /// * `delay` - A delay provider for the millisecond-long start signal.
    pub fn new(line: L, clock: C, delay: D) -> Self {
        Self::with_timing(line, clock, delay, Timing::DEFAULT)
    }

    /// Like [`new`](Self::new), with custom protocol timing.
    pub fn with_timing(line: L, clock: C, delay: D, timing: Timing) -> Self {
        Dht11 {
            line,
            clock,
            delay,
            timing,
        }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Gives back the line, clock and delay.
    pub fn release(self) -> (L, C, D) {
        (self.line, self.clock, self.delay)
    }

    /// Reads a temperature and humidity measurement from the DHT11 sensor.
    ///
    /// Sends the start signal, waits for the sensor's response, reads the
    /// 40-bit frame, validates the checksum and decodes the result. Takes
    /// about 22 ms, almost all of it the start signal. Every wait has a
    /// deadline, so a silent or stalled sensor ends in `Timeout`.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` if the frame arrived and its checksum is valid.
    /// * `Err(DhtError::Timeout)` if an expected edge never came.
    /// * `Err(DhtError::ChecksumMismatch)` if the frame is corrupt.
    pub fn read(&mut self) -> Result<Reading, DhtError<L::Error>> {
        let mut rx = self.start()?;
        rx.await_response()?;

        let mut frame = [0; FRAME_LEN];
        for b in frame.iter_mut() {
            *b = rx.read_byte()?;
        }
        trace!("dht11: frame {}", frame);

        let (data, sum) = frame.split_at(4);
        if checksum(data) != sum[0] {
            debug!("dht11: checksum mismatch in {}", frame);
            return Err(DhtError::ChecksumMismatch);
        }

        let [hum_int, hum_dec, temp_int, temp_dec, _] = frame;
        Ok(Reading::from_data([hum_int, hum_dec, temp_int, temp_dec]))
    }

    /// Sends the start signal and hands the line over to the sensor.
    ///
    /// Holds the line low long enough to wake the sensor, drives it high
    /// briefly, then releases it.
    fn start(&mut self) -> Result<Receiver<'_, L, C>, DhtError<L::Error>> {
        let Self {
            line,
            clock,
            delay,
            timing,
        } = self;

        let mut line = Drivable::claim(line)?;
        line.set_low()?;
        delay.delay_ms(timing.start_low_ms);
        line.set_high()?;
        spin_for(clock, timing.start_high_us);
        let line = line.release()?;

        let edge_at = clock.now_us();
        Ok(Receiver {
            line,
            clock,
            timing: *timing,
            edge_at,
        })
    }
}

/// Busy-waits for `us` microseconds.
fn spin_for<C: Monotonic>(clock: &mut C, us: u32) {
    let from = clock.now_us();
    while elapsed_us(from, clock.now_us()) < us {
        core::hint::spin_loop();
    }
}

/// The listening half of a read, alive from line release to the last bit.
struct Receiver<'a, L: IoLine, C> {
    line: Readable<'a, L>,
    clock: &'a mut C,
    timing: Timing,
    /// Timestamp of the last edge seen. Deadlines count from here.
    edge_at: u32,
}

impl<L: IoLine, C: Monotonic> Receiver<'_, L, C> {
    /// Waits for the sensor's response: ~80us low, ~80us high, then low
    /// again as the first data bit starts.
    ///
    /// All three phases share one deadline counted from line release.
    fn await_response(&mut self) -> Result<(), DhtError<L::Error>> {
        let released_at = self.edge_at;
        let budget = self.timing.handshake_timeout_us;

        self.wait_for(false, released_at, budget)?;
        self.wait_for(true, released_at, budget)?;
        let data_at = self.wait_for(false, released_at, budget)?;
        trace!(
            "dht11: response after {=u32} us",
            elapsed_us(released_at, data_at)
        );

        self.edge_at = data_at;
        Ok(())
    }

    /// Reads one byte (8 bits, MSB first) from the sensor.
    fn read_byte(&mut self) -> Result<u8, DhtError<L::Error>> {
        let mut byte: u8 = 0;

        for _ in 0..8 {
            byte = (byte << 1) | u8::from(self.read_bit()?);
        }

        Ok(byte)
    }

    /// Reads a single bit from the sensor.
    ///
    /// Each bit is a ~50us low followed by a high whose length carries the
    /// value: ~26-28us for 0, ~70us for 1.
    fn read_bit(&mut self) -> Result<bool, DhtError<L::Error>> {
        let budget = self.timing.bit_timeout_us;

        let rose_at = self.wait_for(true, self.edge_at, budget)?;
        let fell_at = self.wait_for(false, rose_at, budget)?;
        self.edge_at = fell_at;

        Ok(elapsed_us(rose_at, fell_at) >= self.timing.one_threshold_us)
    }

    /// Polls the line until it reads `high`, returning the timestamp at which
    /// the level was seen.
    ///
    /// # Errors
    ///
    /// Returns `DhtError::Timeout` once `budget_us` have passed since `since`.
    fn wait_for(
        &mut self,
        high: bool,
        since: u32,
        budget_us: u32,
    ) -> Result<u32, DhtError<L::Error>> {
        loop {
            let level = self.line.is_high()?;
            let now = self.clock.now_us();
            if level == high {
                return Ok(now);
            }
            if elapsed_us(since, now) >= budget_us {
                debug!("dht11: timeout waiting for high={=bool}", high);
                return Err(DhtError::Timeout);
            }
        }
    }
}
