//! Waveform-level DHT11 simulator for host tests.
//!
//! The line, clock and delay share one virtual bus. Time only moves when the
//! driver reads the clock (1us per read) or delays, so pulse widths measured
//! by the driver are exact. When the host releases the line, the sensor plays
//! its scripted waveform from that instant; outside it the pull-up keeps the
//! line high.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::clock::Monotonic;
use crate::line::IoLine;

#[derive(Clone, Copy, Debug)]
pub struct Pulse {
    pub high: bool,
    pub us: u32,
}

impl Pulse {
    pub fn high(us: u32) -> Self {
        Pulse { high: true, us }
    }

    pub fn low(us: u32) -> Self {
        Pulse { high: false, us }
    }
}

#[derive(Debug, Default)]
pub struct Bus {
    pub now: u32,
    pub waveform: Vec<Pulse>,
    /// Last start signal seen, as driven by the host.
    pub start_low_us: Option<u32>,
    pub start_high_us: Option<u32>,
    output: bool,
    driven_high: bool,
    low_at: Option<u32>,
    high_at: Option<u32>,
    released_at: Option<u32>,
}

impl Bus {
    fn level(&self) -> bool {
        if self.output {
            return self.driven_high;
        }
        let Some(released_at) = self.released_at else {
            return true;
        };

        let offset = u64::from(self.now.wrapping_sub(released_at));
        let mut end = 0u64;
        for pulse in &self.waveform {
            end += u64::from(pulse.us);
            if offset < end {
                return pulse.high;
            }
        }
        true
    }
}

pub type Shared = Rc<RefCell<Bus>>;

pub struct SimLine(Shared);
pub struct SimClock(Shared);
pub struct SimDelay(Shared);

/// A sensor that answers every start signal with `waveform`.
pub fn sensor(waveform: Vec<Pulse>) -> (SimLine, SimClock, SimDelay, Shared) {
    let bus = Rc::new(RefCell::new(Bus {
        waveform,
        ..Bus::default()
    }));
    (
        SimLine(bus.clone()),
        SimClock(bus.clone()),
        SimDelay(bus.clone()),
        bus,
    )
}

/// Response and frame with nominal bit widths: 27us for 0, 70us for 1.
pub fn frame(bytes: [u8; 5]) -> Vec<Pulse> {
    frame_with(bytes, |_, bit| if bit { 70 } else { 27 })
}

/// Response and frame, with the high width of each bit picked by
/// `width(index, bit)`.
pub fn frame_with(bytes: [u8; 5], width: impl Fn(usize, bool) -> u32) -> Vec<Pulse> {
    let mut waveform = vec![Pulse::high(25), Pulse::low(80), Pulse::high(80)];
    for (index, bit) in bits(bytes).enumerate() {
        waveform.push(Pulse::low(50));
        waveform.push(Pulse::high(width(index, bit)));
    }
    waveform.push(Pulse::low(50));
    waveform
}

fn bits(bytes: [u8; 5]) -> impl Iterator<Item = bool> {
    bytes
        .into_iter()
        .flat_map(|byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
}

impl ErrorType for SimLine {
    type Error = Infallible;
}

impl InputPin for SimLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.borrow().level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.borrow().level())
    }
}

impl OutputPin for SimLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut bus = self.0.borrow_mut();
        assert!(bus.output, "write while the line is an input");
        bus.driven_high = false;
        bus.low_at = Some(bus.now);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut bus = self.0.borrow_mut();
        assert!(bus.output, "write while the line is an input");
        bus.driven_high = true;
        if let Some(low_at) = bus.low_at.take() {
            bus.start_low_us = Some(bus.now.wrapping_sub(low_at));
        }
        bus.high_at = Some(bus.now);
        Ok(())
    }
}

impl IoLine for SimLine {
    fn set_as_output(&mut self) -> Result<(), Self::Error> {
        let mut bus = self.0.borrow_mut();
        bus.output = true;
        bus.released_at = None;
        Ok(())
    }

    fn set_as_input(&mut self) -> Result<(), Self::Error> {
        let mut bus = self.0.borrow_mut();
        bus.output = false;
        if let Some(high_at) = bus.high_at.take() {
            bus.start_high_us = Some(bus.now.wrapping_sub(high_at));
        }
        bus.released_at = Some(bus.now);
        Ok(())
    }
}

impl Monotonic for SimClock {
    fn now_us(&mut self) -> u32 {
        let mut bus = self.0.borrow_mut();
        bus.now = bus.now.wrapping_add(1);
        bus.now
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        let mut bus = self.0.borrow_mut();
        bus.now = bus.now.wrapping_add(ns.div_ceil(1_000));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_layout() {
        let waveform = frame([0x80, 0, 0, 0, 0x01]);
        // response + 40 bits + trailing low
        assert_eq!(waveform.len(), 3 + 80 + 1);
        assert_eq!(waveform[4].us, 70);
        assert_eq!(waveform[6].us, 27);
        assert_eq!(waveform[3 + 79].us, 70);
    }

    #[test]
    fn test_line_plays_waveform_after_release() {
        let (mut line, mut clock, _, _) = sensor(vec![Pulse::high(2), Pulse::low(3)]);
        line.set_as_output().unwrap();
        line.set_low().unwrap();
        assert!(line.is_low().unwrap());
        line.set_as_input().unwrap();

        let levels: Vec<bool> = (0..7)
            .map(|_| {
                let level = line.is_high().unwrap();
                clock.now_us();
                level
            })
            .collect();
        assert_eq!(levels, [true, true, false, false, false, true, true]);
    }
}
