//! # Headway control
//!
//! Adaptive cruise part of the controller. The distance to the vehicle ahead is mapped to a speed
//! multiplier, reducing speed linearly as the gap closes and stopping outright when it gets too
//! small.
//!
//! ```text
//!  mult
//!   1 |                    ______
//!     |                  /
//!     |                /
//!   0 |=====x________/
//!     +-----+-------+------+------> distance
//!         break    min    max
//!   (===: emergency stop)
//! ```
//!
//! Braking is level triggered: it is evaluated afresh on every reading, so the robot stays stopped
//! for as long as the vehicle ahead is too close.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use crate::av_ctrl::ParamsError;
use util::maths::{clamp, lin_map};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Headway thresholds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeadwayParams {
    /// At or below this distance the robot performs an emergency stop.
    ///
    /// Units: centimeters
    pub break_cm: f64,

    /// At or below this distance the speed multiplier is zero.
    ///
    /// Units: centimeters
    pub min_cm: f64,

    /// Above this distance the speed is not restricted.
    ///
    /// Units: centimeters
    pub max_cm: f64,
}

/// Result of evaluating a headway reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadwayOutput {
    /// Multiplier to apply to the wheel speeds, in [0, 1].
    pub speed_mult: f64,

    /// If true the robot must stop immediately.
    pub emergency_stop: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for HeadwayParams {
    fn default() -> Self {
        Self {
            break_cm: 12.0,
            min_cm: 8.0,
            max_cm: 25.0,
        }
    }
}

impl HeadwayParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(self.min_cm < self.max_cm) {
            return Err(ParamsError::HeadwayMinNotBelowMax(self.min_cm, self.max_cm));
        }
        if !(self.break_cm < self.max_cm) {
            return Err(ParamsError::HeadwayBreakNotBelowMax(self.break_cm, self.max_cm));
        }

        Ok(())
    }
}

impl HeadwayOutput {
    /// Output when the vehicle ahead is too close.
    pub const STOP: HeadwayOutput = HeadwayOutput {
        speed_mult: 0.0,
        emergency_stop: true,
    };

    /// Output when there is nothing in range.
    pub const CLEAR: HeadwayOutput = HeadwayOutput {
        speed_mult: 1.0,
        emergency_stop: false,
    };
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Evaluate a headway reading.
///
/// A NaN reading cannot be trusted and results in an emergency stop.
pub fn regulate(params: &HeadwayParams, distance_cm: f64) -> HeadwayOutput {
    if distance_cm.is_nan() || distance_cm <= params.break_cm {
        HeadwayOutput::STOP
    }
    else if distance_cm <= params.max_cm {
        let ratio = lin_map((params.min_cm, params.max_cm), (0.0, 1.0), distance_cm);

        HeadwayOutput {
            speed_mult: clamp(&ratio, &0.0, &1.0),
            emergency_stop: false,
        }
    }
    else {
        HeadwayOutput::CLEAR
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> HeadwayParams {
        HeadwayParams {
            break_cm: 5.0,
            min_cm: 10.0,
            max_cm: 30.0,
        }
    }

    #[test]
    fn test_thresholds() {
        let p = params();

        assert_eq!(regulate(&p, p.break_cm), HeadwayOutput::STOP);
        assert_eq!(regulate(&p, p.break_cm - 1.0), HeadwayOutput::STOP);
        assert_eq!(regulate(&p, 0.0), HeadwayOutput::STOP);

        assert_eq!(
            regulate(&p, p.min_cm),
            HeadwayOutput { speed_mult: 0.0, emergency_stop: false }
        );
        assert_eq!(
            regulate(&p, (p.min_cm + p.max_cm) / 2.0),
            HeadwayOutput { speed_mult: 0.5, emergency_stop: false }
        );
        assert_eq!(
            regulate(&p, p.max_cm),
            HeadwayOutput { speed_mult: 1.0, emergency_stop: false }
        );
        assert_eq!(regulate(&p, p.max_cm + 1.0), HeadwayOutput::CLEAR);
        assert_eq!(regulate(&p, f64::INFINITY), HeadwayOutput::CLEAR);
    }

    #[test]
    fn test_between_break_and_min_is_floored() {
        let out = regulate(&params(), 7.5);
        assert_eq!(out, HeadwayOutput { speed_mult: 0.0, emergency_stop: false });
    }

    #[test]
    fn test_nan_stops() {
        assert_eq!(regulate(&params(), f64::NAN), HeadwayOutput::STOP);
    }

    #[test]
    fn test_multiplier_in_range() {
        let p = params();
        let mut d = -10.0;

        while d < 50.0 {
            let out = regulate(&p, d);
            assert!(out.speed_mult >= 0.0 && out.speed_mult <= 1.0);
            assert_eq!(out.emergency_stop, d <= p.break_cm);
            d += 0.25;
        }
    }

    #[test]
    fn test_break_above_min() {
        // The reference controller brakes at 12 cm with the ramp starting at 8 cm
        let p = HeadwayParams::default();
        assert!(p.validate().is_ok());

        assert_eq!(regulate(&p, 12.0), HeadwayOutput::STOP);

        let out = regulate(&p, 16.5);
        assert!(!out.emergency_stop);
        assert!((out.speed_mult - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_validate() {
        let mut p = params();
        p.min_cm = 30.0;
        assert!(p.validate().is_err());

        let mut p = params();
        p.break_cm = 40.0;
        assert!(p.validate().is_err());
    }
}
