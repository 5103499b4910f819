//! # Speed phase schedule
//!
//! Hard-coded reproduction of a trained speed policy: the robot drives normally for an initial
//! period, then at a reduced speed, then switches to a (configurable) speed-up factor. The phase
//! only depends on the mission clock.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use crate::av_ctrl::ParamsError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the phase schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhaseParams {
    /// End of the initial phase, on the mission clock.
    ///
    /// Units: seconds
    pub activation_threshold_s: f64,

    /// Start of the full phase, on the mission clock.
    ///
    /// Units: seconds
    pub speedup_threshold_s: f64,

    /// Speed multiplier during the reduced phase.
    pub reduced_speed_factor: f64,

    /// Speed multiplier during the full phase.
    pub speedup_factor: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Mission speed phase.
///
/// Phases are ordered, and only ever advance as the mission clock increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpeedPhase {
    Initial,
    Reduced,
    Full,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PhaseParams {
    fn default() -> Self {
        Self {
            activation_threshold_s: 30.0,
            speedup_threshold_s: 90.0,
            reduced_speed_factor: 0.8,
            speedup_factor: 1.0,
        }
    }
}

impl PhaseParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(self.activation_threshold_s <= self.speedup_threshold_s) {
            return Err(ParamsError::PhaseThresholdsOutOfOrder(
                self.activation_threshold_s,
                self.speedup_threshold_s
            ));
        }
        if !(self.reduced_speed_factor >= 0.0) {
            return Err(ParamsError::NegativeMultiplier(
                "reduced_speed_factor",
                self.reduced_speed_factor
            ));
        }
        if !(self.speedup_factor >= 0.0) {
            return Err(ParamsError::NegativeMultiplier("speedup_factor", self.speedup_factor));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the phase and its speed multiplier at the given mission clock time.
pub fn schedule(params: &PhaseParams, clock_s: f64) -> (SpeedPhase, f64) {
    if clock_s <= params.activation_threshold_s {
        (SpeedPhase::Initial, 1.0)
    }
    else if clock_s < params.speedup_threshold_s {
        (SpeedPhase::Reduced, params.reduced_speed_factor)
    }
    else {
        (SpeedPhase::Full, params.speedup_factor)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> PhaseParams {
        PhaseParams {
            activation_threshold_s: 30.0,
            speedup_threshold_s: 90.0,
            reduced_speed_factor: 0.8,
            speedup_factor: 1.2,
        }
    }

    #[test]
    fn test_boundaries() {
        let p = params();

        assert_eq!(schedule(&p, 0.0), (SpeedPhase::Initial, 1.0));
        assert_eq!(schedule(&p, 30.0), (SpeedPhase::Initial, 1.0));
        assert_eq!(schedule(&p, 30.001), (SpeedPhase::Reduced, 0.8));
        assert_eq!(schedule(&p, 89.999), (SpeedPhase::Reduced, 0.8));
        assert_eq!(schedule(&p, 90.0), (SpeedPhase::Full, 1.2));
        assert_eq!(schedule(&p, 1e6), (SpeedPhase::Full, 1.2));
    }

    #[test]
    fn test_monotonic() {
        let p = params();
        let mut clock = 0.0;
        let mut last = SpeedPhase::Initial;

        while clock < 120.0 {
            let (phase, _) = schedule(&p, clock);
            assert!(phase >= last);
            last = phase;
            clock += 0.37;
        }

        assert_eq!(last, SpeedPhase::Full);
    }

    #[test]
    fn test_equal_thresholds_skip_reduced() {
        let p = PhaseParams {
            activation_threshold_s: 10.0,
            speedup_threshold_s: 10.0,
            ..params()
        };

        assert_eq!(schedule(&p, 10.0).0, SpeedPhase::Initial);
        assert_eq!(schedule(&p, 10.5).0, SpeedPhase::Full);
    }

    #[test]
    fn test_validate() {
        assert!(PhaseParams::default().validate().is_ok());
        assert!(PhaseParams { speedup_threshold_s: 10.0, ..params() }.validate().is_err());
        assert!(PhaseParams { speedup_factor: -1.0, ..params() }.validate().is_err());
    }
}
