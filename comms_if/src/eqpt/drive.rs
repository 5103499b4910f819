//! # Wheel Drive Demands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Largest magnitude of a wheel speed demand.
///
/// Units: percent of full speed
pub const MAX_WHEEL_SPEED_PCT: f64 = 100.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Speed demands for the two drive wheels.
///
/// Positive values drive forwards.
///
/// Units: percent of full speed, within [-100, 100] when built with [`WheelDems::new`].
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct WheelDems {
    pub left_pct: f64,
    pub right_pct: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl WheelDems {
    /// Create a new set of demands, clipping both speeds into [-100, 100].
    ///
    /// A NaN speed is replaced by zero.
    pub fn new(left_pct: f64, right_pct: f64) -> Self {
        Self {
            left_pct: clip_pct(left_pct),
            right_pct: clip_pct(right_pct),
        }
    }

    /// Demands to stop both wheels.
    pub fn stop() -> Self {
        Self::default()
    }

    /// Returns true if both wheels are demanded to be stationary.
    pub fn is_stopped(&self) -> bool {
        self.left_pct == 0.0 && self.right_pct == 0.0
    }

    /// Returns true if both wheel speed magnitudes are strictly below `threshold_pct`.
    pub fn both_below(&self, threshold_pct: f64) -> bool {
        self.left_pct.abs() < threshold_pct && self.right_pct.abs() < threshold_pct
    }

    /// Convert the demands to signed 8 bit motor drive values, as used by the robot's DC motor
    /// driver.
    pub fn to_motor_duty(&self) -> (i16, i16) {
        (pct_to_duty(self.left_pct), pct_to_duty(self.right_pct))
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn clip_pct(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(-MAX_WHEEL_SPEED_PCT).min(MAX_WHEEL_SPEED_PCT)
    }
}

fn pct_to_duty(pct: f64) -> i16 {
    (clip_pct(pct) / MAX_WHEEL_SPEED_PCT * 255.0) as i16
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_clips() {
        let dems = WheelDems::new(140.0, -250.0);
        assert_eq!(dems, WheelDems { left_pct: 100.0, right_pct: -100.0 });

        let dems = WheelDems::new(f64::NAN, 42.0);
        assert_eq!(dems, WheelDems { left_pct: 0.0, right_pct: 42.0 });
    }

    #[test]
    fn test_both_below() {
        assert!(WheelDems::new(-19.0, 19.0).both_below(20.0));
        assert!(!WheelDems::new(-50.0, 10.0).both_below(20.0));
        assert!(!WheelDems::new(20.0, 0.0).both_below(20.0));
        assert!(WheelDems::stop().both_below(20.0));
    }

    #[test]
    fn test_to_motor_duty() {
        assert_eq!(WheelDems::new(100.0, -100.0).to_motor_duty(), (255, -255));
        assert_eq!(WheelDems::new(50.0, 0.0).to_motor_duty(), (127, 0));
    }
}
