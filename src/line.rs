//! Bidirectional data line.
//!
//! The DHT11 shares one wire for both directions: the host drives it to send
//! the start signal, then lets go so the sensor can answer. [`IoLine`] is the
//! platform capability for that, and [`Drivable`] / [`Readable`] are the two
//! states the driver holds it in. Each state only exposes the operations that
//! are legal in it, and switching between them consumes the old state.

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// A pin whose direction can be switched at runtime.
///
/// `embedded-hal` 1.0 has no trait for this, so platform bindings implement it
/// for their flexible GPIO type. Open-drain pins with an external pull-up can
/// use [`OpenDrain`] instead.
pub trait IoLine: InputPin + OutputPin {
    /// Configures the pin to drive the line.
    fn set_as_output(&mut self) -> Result<(), Self::Error>;

    /// Configures the pin as a high-impedance input.
    fn set_as_input(&mut self) -> Result<(), Self::Error>;
}

impl<T: IoLine + ?Sized> IoLine for &mut T {
    fn set_as_output(&mut self) -> Result<(), Self::Error> {
        T::set_as_output(self)
    }

    fn set_as_input(&mut self) -> Result<(), Self::Error> {
        T::set_as_input(self)
    }
}

/// Adapter for open-drain pins that can be read and written at the same time.
///
/// Driving high on an open-drain output already releases the line to the
/// pull-up, so switching to input is a high write and switching to output
/// does nothing.
#[derive(Debug)]
pub struct OpenDrain<P>(pub P);

impl<P> OpenDrain<P> {
    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.0
    }
}

impl<P: ErrorType> ErrorType for OpenDrain<P> {
    type Error = P::Error;
}

impl<P: InputPin> InputPin for OpenDrain<P> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }
}

impl<P: OutputPin> OutputPin for OpenDrain<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }
}

impl<P: InputPin + OutputPin> IoLine for OpenDrain<P> {
    fn set_as_output(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_as_input(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }
}

/// The line while the host is driving it.
pub struct Drivable<'a, L: IoLine> {
    line: &'a mut L,
}

impl<'a, L: IoLine> Drivable<'a, L> {
    /// Switches the line to output and takes the driving role.
    pub fn claim(line: &'a mut L) -> Result<Self, L::Error> {
        line.set_as_output()?;
        Ok(Drivable { line })
    }

    pub fn set_high(&mut self) -> Result<(), L::Error> {
        self.line.set_high()
    }

    pub fn set_low(&mut self) -> Result<(), L::Error> {
        self.line.set_low()
    }

    /// Stops driving and hands the line to the sensor.
    pub fn release(self) -> Result<Readable<'a, L>, L::Error> {
        self.line.set_as_input()?;
        Ok(Readable { line: self.line })
    }
}

/// The line while the sensor owns it and the host only listens.
pub struct Readable<'a, L: IoLine> {
    line: &'a mut L,
}

impl<'a, L: IoLine> Readable<'a, L> {
    pub fn is_high(&mut self) -> Result<bool, L::Error> {
        self.line.is_high()
    }

    pub fn is_low(&mut self) -> Result<bool, L::Error> {
        self.line.is_low()
    }

    /// Takes the line back for driving.
    pub fn drive(self) -> Result<Drivable<'a, L>, L::Error> {
        Drivable::claim(self.line)
    }
}
