//! # Equipment Interface
//!
//! This module defines the demands sent to, and the data read from, the robot's equipment, along
//! with the traits a hardware (or simulated) platform must implement for the controller to drive
//! it.
//!
//! All demands are fire-and-forget: the controller assumes every read returns a value and every
//! write is accepted. Handling faulty hardware is the platform's responsibility.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod buzzer;
pub mod drive;
pub mod indicator;
pub mod sens;

// -----------------------------------------------------------------------------------------------
// EXPORTS
// -----------------------------------------------------------------------------------------------

pub use buzzer::Tone;
pub use drive::WheelDems;
pub use indicator::{IndicatorDems, Rgb, RgbParseError};
pub use sens::{LineCodeError, LineSensData};

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

/// Ambient light sensor, used only by the startup synchronisation sequence.
pub trait LightSensor {
    /// Read the ambient light level (sensor units, brighter is higher).
    fn read_light(&mut self) -> f64;
}

/// Two-channel line follower sensor.
pub trait LineSensor {
    /// Read which of the two sensors are over the black track line.
    fn read_line(&mut self) -> LineSensData;
}

/// Ultrasonic range sensor facing the vehicle ahead.
pub trait RangeSensor {
    /// Read the distance to the vehicle or obstacle ahead.
    ///
    /// Units: centimeters
    fn read_headway_cm(&mut self) -> f64;
}

/// Left and right wheel motors.
pub trait WheelDriver {
    /// Drive the wheels at the given demands.
    fn drive(&mut self, dems: &WheelDems);
}

/// The pair of RGB indicator LEDs.
pub trait Indicator {
    /// Set the colour of the left and right indicators.
    fn set_colour(&mut self, dems: &IndicatorDems);
}

/// Buzzer used for audio cues.
pub trait Buzzer {
    /// Start playing a tone. Implementations must not block for the tone's duration.
    fn tone(&mut self, tone: Tone);
}

/// A free running monotonic microsecond counter.
///
/// The counter is 32 bits wide and wraps roughly every 71 minutes, so users must only ever
/// compute differences between readings with wrapping subtraction.
pub trait MonotonicClock {
    /// Current counter value in microseconds.
    fn micros(&self) -> u32;
}

/// A complete robot platform, providing all equipment needed by the controller.
pub trait Platform:
    LightSensor + LineSensor + RangeSensor + WheelDriver + Indicator + Buzzer + MonotonicClock
{
}

impl<T> Platform for T
where
    T: LightSensor + LineSensor + RangeSensor + WheelDriver + Indicator + Buzzer + MonotonicClock
{
}
